use log::{debug, info, warn};
use std::io::{self, BufReader, BufWriter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::file_serving::{error_response, handle_request};
use crate::http::{read_request, Method, ParseError};
use crate::{log_error, log_response};

/// Stops a running [`Server`] from any thread.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }
        // accept() blocks; a throwaway connection lets the loop see the flag.
        if let Err(e) = TcpStream::connect(self.wake_addr) {
            debug!("Failed to wake listener at {}: {}", self.wake_addr, e);
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    shutdown: ShutdownHandle,
}

impl Server {
    pub fn bind(config: ServerConfig) -> Result<Self, StartupError> {
        let bind_error = |source: io::Error| StartupError::Bind {
            addr: config.display_addr(),
            source,
        };

        let listener =
            TcpListener::bind((config.host.as_str(), config.port)).map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let shutdown = ShutdownHandle {
            requested: Arc::new(AtomicBool::new(false)),
            wake_addr: wake_addr(local_addr),
        };

        Ok(Self {
            listener,
            config: Arc::new(config),
            shutdown,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Accepts connections until shut down, one thread per connection.
    /// In-flight connections are not waited for.
    pub fn run(self) -> io::Result<()> {
        let port = self.local_addr()?.port();
        log_startup(&self.config, port);

        for stream in self.listener.incoming() {
            if self.shutdown.is_requested() {
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    log_error!(e, "Failed to accept connection");
                    continue;
                }
            };

            let config = Arc::clone(&self.config);
            thread::spawn(move || {
                if let Err(e) = handle_connection(stream, &config) {
                    warn!("Connection closed with error: {}", e);
                }
            });
        }

        info!("Shutting down...");
        Ok(())
    }
}

fn log_startup(config: &ServerConfig, port: u16) {
    info!("Serving {}", config.root.display());
    info!(
        "Listening on http://{}",
        config.clone().with_port(port).display_addr()
    );
    if config.spa_fallback {
        info!("SPA fallback: enabled (index.html)");
    }
    if config.cors_enabled {
        info!("CORS: enabled (* allow-all)");
    }
    if config.cache_disabled {
        info!("Cache: disabled (no-store)");
    }
}

fn wake_addr(local_addr: SocketAddr) -> SocketAddr {
    let ip = match local_addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local_addr.port())
}

fn handle_connection(client: TcpStream, config: &ServerConfig) -> io::Result<()> {
    let start_time = Instant::now();
    let peer = client
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| "-".to_string());

    let mut reader = BufReader::new(&client);
    let request = match read_request(&mut reader) {
        Ok(request) => request,
        Err(ParseError::Io(e)) => return Err(e),
        Err(e) => {
            let Some(status) = e.status() else {
                debug!("Connection from {} closed without a request", peer);
                return Ok(());
            };
            let response = error_response(status, &e.to_string(), config);
            let mut writer = BufWriter::new(&client);
            let sent = response.write_to(&mut writer, true)?;
            log_response!(peer, "-", status, sent, start_time.elapsed());
            return Ok(());
        }
    };

    let response = handle_request(&request, config);
    let status = response.status;

    let mut writer = BufWriter::new(&client);
    let sent = response.write_to(&mut writer, request.method != Method::Head)?;

    log_response!(
        peer,
        request.request_line(),
        status,
        sent,
        start_time.elapsed()
    );
    Ok(())
}
