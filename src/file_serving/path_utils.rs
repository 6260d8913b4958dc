use super::*;
use crate::log_error;
use crate::logging::LoggingExt;
use std::path::Component;
use std::time::Instant;

/// What the existence probe found at a translated path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    File,
    Directory,
    Missing,
    /// Exists but could not be inspected (permission denied, symlink loop).
    Unreadable,
}

/// Percent-decodes the path part of a request-target.
pub fn decode_path(request_target: &str) -> io::Result<String> {
    let (path_without_query, _) = split_target(request_target);

    request_target.log_operation("decode_path", || {
        percent_decode_str(path_without_query)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    })
}

/// Maps a request-target onto a path under `base_dir`.
///
/// `base_dir` must be canonical. Returns `None` when the request climbs above
/// the root, resolves outside it through a symlink, or cannot be decoded.
pub fn translate_path(base_dir: &Path, request_target: &str) -> Option<PathBuf> {
    let start_time = Instant::now();
    log::debug!(
        "Translating path - base: {}, request: {}",
        base_dir.display(),
        request_target
    );

    let decoded_path = decode_path(request_target).ok()?;

    let cleaned_path = match normalize(&decoded_path) {
        Some(p) => p,
        None => {
            log::warn!("Rejected request path outside root: {}", decoded_path);
            return None;
        }
    };
    log::debug!("Cleaned path: {}", cleaned_path.display());

    let requested_path = base_dir.join(&cleaned_path);

    match fs::canonicalize(&requested_path) {
        Ok(path) => {
            log::debug!(
                "Path translation complete in {:?} - result: {}",
                start_time.elapsed(),
                path.display()
            );

            if path.starts_with(base_dir) {
                Some(path)
            } else {
                log::warn!("Path escapes base directory: {}", path.display());
                None
            }
        }
        Err(e)
            if e.kind() == io::ErrorKind::NotFound || e.kind() == io::ErrorKind::NotADirectory =>
        {
            log::debug!(
                "Using non-canonicalized path (not found): {}",
                requested_path.display()
            );
            Some(requested_path)
        }
        Err(e) => {
            log_error!(
                e,
                format!("Failed to canonicalize path: {}", requested_path.display())
            );
            None
        }
    }
}

/// Resolves `.` and `..` segments lexically. A `..` above the root, a NUL
/// byte, or a segment that is not a plain file name rejects the whole path.
fn normalize(decoded_path: &str) -> Option<PathBuf> {
    if decoded_path.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => {
                let mut components = Path::new(name).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => segments.push(name),
                    _ => return None,
                }
            }
        }
    }

    Some(segments.iter().collect())
}

/// Stats `path`, following symlinks. Errors other than "missing" are
/// reported as `Unreadable` and never surface to the client.
pub fn probe(path: &Path) -> Probe {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Probe::File,
        Ok(metadata) if metadata.is_dir() => Probe::Directory,
        Ok(_) => {
            log::debug!("Not a regular file or directory: {}", path.display());
            Probe::Missing
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound || e.kind() == io::ErrorKind::NotADirectory => {
            Probe::Missing
        }
        Err(e) => {
            log::warn!("Failed to probe {}: {}", path.display(), e);
            Probe::Unreadable
        }
    }
}
