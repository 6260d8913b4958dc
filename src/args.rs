use clap::Parser;
use std::path::PathBuf;

use crate::config::{LogLevel, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use crate::error::StartupError;

/// Tiny static file server for local testing.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Root directory to serve
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Bind host. Use 0.0.0.0 to expose
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Bind port
    #[arg(long, default_value_t = DEFAULT_PORT, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Fall back to /index.html for unmatched paths
    #[arg(long)]
    pub spa: bool,

    /// Disable CORS headers
    #[arg(long)]
    pub no_cors: bool,

    /// Allow caching (no-store headers are sent by default)
    #[arg(long)]
    pub cache: bool,

    /// Only log warnings and errors
    #[arg(long)]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::Warn
        } else {
            LogLevel::Info
        }
    }

    /// Validates the root directory and builds the server configuration.
    pub fn into_config(self) -> Result<ServerConfig, StartupError> {
        let log_level = self.log_level();
        Ok(ServerConfig::new(&self.dir)?
            .with_host(self.host)
            .with_port(self.port)
            .with_cors(!self.no_cors)
            .with_cache_disabled(!self.cache)
            .with_spa_fallback(self.spa)
            .with_log_level(log_level))
    }
}
