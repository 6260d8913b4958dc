//! Decides what a GET or HEAD request is answered with.
//!
//! Resolution runs to completion before any response byte is written, so a
//! failed probe can never leave a half-sent response behind.

use super::path_utils::{probe, translate_path, Probe};
use super::spa::{fallback_document, index_document};
use super::*;
use crate::config::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A regular file, possibly a directory's `index.html`.
    File(PathBuf),
    /// A directory without `index.html`; answered with a generated listing.
    DirectoryIndex(PathBuf),
    /// A directory requested without its trailing slash.
    Redirect(String),
    /// An unmatched route answered with the root `index.html`.
    Fallback(PathBuf),
    NotFound,
}

/// Resolves a raw request-target against `config.root`.
pub fn resolve(request_target: &str, config: &ServerConfig) -> Resolution {
    let Some(path) = translate_path(&config.root, request_target) else {
        return Resolution::NotFound;
    };
    let (raw_path, query) = split_target(request_target);

    match probe(&path) {
        Probe::File if raw_path.ends_with('/') => {
            log::debug!("Trailing slash on a file: {}", path.display());
            Resolution::NotFound
        }
        Probe::File => Resolution::File(path),
        Probe::Directory if !raw_path.ends_with('/') => {
            Resolution::Redirect(directory_location(raw_path, query))
        }
        Probe::Directory => match index_document(&config.root, &path) {
            Some(index) => Resolution::File(index),
            None => Resolution::DirectoryIndex(path),
        },
        Probe::Missing if config.spa_fallback => match fallback_document(&config.root) {
            Some(index) => {
                log::debug!("SPA fallback for {}", raw_path);
                Resolution::Fallback(index)
            }
            None => Resolution::NotFound,
        },
        Probe::Missing | Probe::Unreadable => Resolution::NotFound,
    }
}

// Leading slashes are collapsed so the Location can never become a
// scheme-relative URL pointing at another host.
fn directory_location(raw_path: &str, query: Option<&str>) -> String {
    let mut location = format!("/{}/", raw_path.trim_start_matches('/'));
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }
    location
}
