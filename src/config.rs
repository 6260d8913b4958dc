use log::LevelFilter;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StartupError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
        }
    }
}

/// Settings shared read-only by every connection for the life of the process.
///
/// `root` is always canonical, so confinement checks can compare canonical
/// request paths against it with `starts_with`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub root: PathBuf,
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    pub cache_disabled: bool,
    pub spa_fallback: bool,
    pub log_level: LogLevel,
}

impl ServerConfig {
    /// Builds a config rooted at `root` with the CLI defaults.
    ///
    /// Fails when `root` is missing or is not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StartupError> {
        let root = root.as_ref();
        let canonical_root = match fs::canonicalize(root) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("Failed to canonicalize {}: {}", root.display(), e);
                return Err(StartupError::RootNotFound(absolute(root)));
            }
        };

        if !canonical_root.is_dir() {
            return Err(StartupError::RootNotDirectory(canonical_root));
        }

        Ok(Self {
            root: canonical_root,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_enabled: true,
            cache_disabled: true,
            spa_fallback: false,
            log_level: LogLevel::Info,
        })
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    pub fn with_cache_disabled(mut self, disabled: bool) -> Self {
        self.cache_disabled = disabled;
        self
    }

    pub fn with_spa_fallback(mut self, enabled: bool) -> Self {
        self.spa_fallback = enabled;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// `host:port` as shown to humans, with IPv6 hosts bracketed.
    pub fn display_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
