use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

/// Installs the global logger. Only the `--quiet` flag controls the level.
pub fn setup_logging(level: LevelFilter) {
    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            let timestamp = SystemTime::now();
            let level = record.level();

            if atty::is(atty::Stream::Stderr) {
                // Terminal output with colors
                let level_color = match level {
                    log::Level::Error => "\x1B[31m", // Red
                    log::Level::Warn => "\x1B[33m",  // Yellow
                    log::Level::Info => "\x1B[32m",  // Green
                    log::Level::Debug => "\x1B[36m", // Cyan
                    log::Level::Trace => "\x1B[35m", // Magenta
                };

                // Only include file and line for debug/trace levels
                if level >= log::Level::Debug {
                    writeln!(
                        buf,
                        "{}{:>5}\x1B[0m [{}] {} - {}:{}",
                        level_color,
                        level,
                        humantime::format_rfc3339_millis(timestamp),
                        record.args(),
                        record.file().unwrap_or("unknown"),
                        record.line().unwrap_or(0)
                    )
                } else {
                    writeln!(
                        buf,
                        "{}{:>5}\x1B[0m [{}] {}",
                        level_color,
                        level,
                        humantime::format_rfc3339_millis(timestamp),
                        record.args()
                    )
                }
            } else if level >= log::Level::Debug {
                writeln!(
                    buf,
                    "{:>5} [{}] {} - {}:{}",
                    level,
                    humantime::format_rfc3339_millis(timestamp),
                    record.args(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )
            } else {
                writeln!(
                    buf,
                    "{:>5} [{}] {}",
                    level,
                    humantime::format_rfc3339_millis(timestamp),
                    record.args()
                )
            }
        })
        .init();
}

#[macro_export]
macro_rules! log_request {
    ($request_line:expr) => {
        log::debug!("→ {}", $request_line)
    };
}

/// Access log line, one per answered request.
#[macro_export]
macro_rules! log_response {
    ($peer:expr, $request_line:expr, $status:expr, $size:expr, $duration:expr) => {
        log::info!(
            "{} \"{}\" {} {} ({:?})",
            $peer,
            $request_line,
            $status,
            $size,
            $duration
        )
    };
}

#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        log::error!("❌ {} - {}", $context, $error)
    };
}

// Trait for types that can be logged
pub trait Loggable {
    fn log_description(&self) -> String;
}

impl Loggable for str {
    fn log_description(&self) -> String {
        self.to_string()
    }
}

impl Loggable for Path {
    fn log_description(&self) -> String {
        self.display().to_string()
    }
}

pub trait LoggingExt: Loggable {
    fn log_operation<F, T, E>(&self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display;
}

impl<S: ?Sized + Loggable> LoggingExt for S {
    fn log_operation<F, T, E>(&self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        log::trace!("Starting {} on {}", operation, self.log_description());
        match f() {
            Ok(result) => {
                log::trace!("Completed {} on {}", operation, self.log_description());
                Ok(result)
            }
            Err(e) => {
                log::warn!("Failed {} on {}: {}", operation, self.log_description(), e);
                Err(e)
            }
        }
    }
}
