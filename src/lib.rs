//! A small static file server for local development.
//!
//! Requests are resolved against a root directory before anything is written
//! back: an existing file, a directory's `index.html`, a generated directory
//! listing, a trailing-slash redirect, an optional SPA fallback to the root
//! `index.html`, or a 404. Every response can carry permissive CORS headers
//! and cache-busting headers.

pub mod logging;

pub mod args;
pub mod config;
pub mod error;
pub mod file_serving;
pub mod http;
pub mod mime;
pub mod server;

pub use config::ServerConfig;
pub use error::StartupError;
pub use server::{Server, ShutdownHandle};
