use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised before or while the listener is running.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),
}

impl StartupError {
    /// Process exit code for this error. A bad root directory exits with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::RootNotFound(_) | StartupError::RootNotDirectory(_) => 2,
            _ => 1,
        }
    }
}
