use std::fs::File;

use super::headers::decorate_headers;
use super::listing::render_listing;
use super::path_utils::decode_path;
use super::resolve::{resolve, Resolution};
use super::*;
use crate::config::ServerConfig;
use crate::http::{Method, Request, Response, Status};
use crate::mime;

const NOT_FOUND_MESSAGE: &str = "File not found";

/// Answers one parsed request. The returned response is complete and
/// decorated; the caller only has to write it.
pub fn handle_request(request: &Request, config: &ServerConfig) -> Response {
    let mut response = match &request.method {
        // CORS preflight never touches the filesystem.
        Method::Options => Response::new(Status::NoContent),
        Method::Get | Method::Head => {
            let resolution = resolve(&request.target, config);
            log::debug!("Resolved {} to {:?}", request.target, resolution);
            respond(resolution, request)
        }
        Method::Other(method) => {
            log::warn!("Unsupported method: {}", method);
            Response::text(
                Status::NotImplemented,
                &format!("Unsupported method ({})", method),
            )
        }
    };

    decorate_headers(&mut response.headers, config);
    response
}

/// Decorated error response for requests that could not be parsed.
pub fn error_response(status: Status, message: &str, config: &ServerConfig) -> Response {
    let mut response = Response::text(status, message);
    decorate_headers(&mut response.headers, config);
    response
}

fn respond(resolution: Resolution, request: &Request) -> Response {
    match resolution {
        Resolution::File(path) | Resolution::Fallback(path) => serve_file(&path),
        Resolution::DirectoryIndex(dir) => {
            let display_path = decode_path(request.path()).unwrap_or_else(|_| "/".to_string());
            match render_listing(&dir, &display_path) {
                Ok(page) => Response::html(Status::Ok, page),
                Err(e) => {
                    log::warn!("Failed to list {}: {}", dir.display(), e);
                    Response::text(Status::NotFound, "No permission to list directory")
                }
            }
        }
        Resolution::Redirect(location) => Response::redirect(&location),
        Resolution::NotFound => Response::text(Status::NotFound, NOT_FOUND_MESSAGE),
    }
}

// Opening happens before anything is written, so a file that vanished or
// became unreadable since the probe still gets a clean 404.
fn serve_file(path: &Path) -> Response {
    match open_file(path) {
        Ok((file, len)) => Response::file(file, len, &mime::content_type(path)),
        Err(e) => {
            log::warn!("Failed to open {}: {}", path.display(), e);
            Response::text(Status::NotFound, NOT_FOUND_MESSAGE)
        }
    }
}

fn open_file(path: &Path) -> io::Result<(File, u64)> {
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    Ok((file, metadata.len()))
}
