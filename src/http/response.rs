use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};

use super::{find_header, set_header};

pub const SERVER_NAME: &str = concat!("devserve/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NoContent,
    MovedPermanently,
    BadRequest,
    NotFound,
    UriTooLong,
    HeaderFieldsTooLarge,
    NotImplemented,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NoContent => 204,
            Status::MovedPermanently => 301,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::UriTooLong => 414,
            Status::HeaderFieldsTooLarge => 431,
            Status::NotImplemented => 501,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NoContent => "No Content",
            Status::MovedPermanently => "Moved Permanently",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::UriTooLong => "URI Too Long",
            Status::HeaderFieldsTooLarge => "Request Header Fields Too Large",
            Status::NotImplemented => "Not Implemented",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

pub enum Body {
    Empty,
    Bytes(Vec<u8>),
    File { file: File, len: u64 },
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Empty => 0,
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Body::File { len, .. } => write!(f, "File({} bytes)", len),
        }
    }
}

/// A fully decided response. Nothing reaches the socket until `write_to`.
#[derive(Debug)]
pub struct Response {
    pub status: Status,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl Response {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Plain-text error or status message.
    pub fn text(status: Status, message: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(Body::Bytes(format!("{}\n", message).into_bytes()))
    }

    pub fn html(status: Status, page: String) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(Body::Bytes(page.into_bytes()))
    }

    pub fn file(file: File, len: u64, content_type: &str) -> Self {
        Self::new(Status::Ok)
            .with_header("Content-Type", content_type)
            .with_body(Body::File { file, len })
    }

    pub fn redirect(location: &str) -> Self {
        Self::new(Status::MovedPermanently)
            .with_header("Location", location)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(Body::Bytes(format!("Moved to {}\n", location).into_bytes()))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        set_header(&mut self.headers, name, value);
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Serializes the response. With `include_body` unset (HEAD) the head
    /// still advertises the full `Content-Length`. Returns body bytes written.
    pub fn write_to<W: Write>(self, writer: &mut W, include_body: bool) -> io::Result<u64> {
        let Response {
            status,
            mut headers,
            body,
        } = self;

        set_header(&mut headers, "Server", SERVER_NAME);
        if status != Status::NoContent {
            set_header(&mut headers, "Content-Length", &body.len().to_string());
        }
        set_header(&mut headers, "Connection", "close");

        let mut head = format!("HTTP/1.1 {} {}\r\n", status.code(), status.reason());
        for (name, value) in &headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        writer.write_all(head.as_bytes())?;

        let written = if include_body && status != Status::NoContent {
            match body {
                Body::Empty => 0,
                Body::Bytes(bytes) => {
                    writer.write_all(&bytes)?;
                    bytes.len() as u64
                }
                Body::File { file, len } => {
                    let copied = io::copy(&mut file.take(len), writer)?;
                    if copied != len {
                        log::warn!(
                            "File shrank while sending: {} of {} advertised bytes written",
                            copied,
                            len
                        );
                    }
                    copied
                }
            }
        } else {
            0
        };

        writer.flush()?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Seek;

    fn serialize(response: Response, include_body: bool) -> String {
        let mut out = Vec::new();
        response.write_to(&mut out, include_body).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_response_has_length_and_body() {
        let raw = serialize(Response::text(Status::NotFound, "File not found"), true);

        assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(raw.contains("Content-Type: text/plain; charset=utf-8\r\n"));
        assert!(raw.contains("Content-Length: 15\r\n"));
        assert!(raw.contains("Connection: close\r\n"));
        assert!(raw.contains(&format!("Server: {}\r\n", SERVER_NAME)));
        assert!(raw.ends_with("\r\n\r\nFile not found\n"));
    }

    #[test]
    fn head_keeps_length_but_drops_body() {
        let raw = serialize(Response::text(Status::Ok, "hello"), false);

        assert!(raw.contains("Content-Length: 6\r\n"));
        assert!(raw.ends_with("\r\n\r\n"));
    }

    #[test]
    fn no_content_has_no_length_or_body() {
        let raw = serialize(Response::new(Status::NoContent), true);

        assert!(raw.starts_with("HTTP/1.1 204 No Content\r\n"));
        assert!(!raw.contains("Content-Length"));
        assert!(raw.ends_with("\r\n\r\n"));
    }

    #[test]
    fn file_body_is_streamed() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"console.log('hi');").unwrap();
        file.rewind().unwrap();

        let response = Response::file(file, 18, "application/javascript");
        let mut out = Vec::new();
        let written = response.write_to(&mut out, true).unwrap();

        assert_eq!(written, 18);
        let raw = String::from_utf8(out).unwrap();
        assert!(raw.contains("Content-Type: application/javascript\r\n"));
        assert!(raw.ends_with("console.log('hi');"));
    }

    #[test]
    fn short_file_reports_bytes_actually_sent() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"body{}").unwrap();
        file.rewind().unwrap();

        let response = Response::file(file, 32, "text/css");
        let mut out = Vec::new();
        let written = response.write_to(&mut out, true).unwrap();

        assert_eq!(written, 6);
        let raw = String::from_utf8(out).unwrap();
        assert!(raw.contains("Content-Length: 32\r\n"));
        assert!(raw.ends_with("\r\n\r\nbody{}"));
    }

    #[test]
    fn redirect_sets_location() {
        let response = Response::redirect("/docs/");
        assert_eq!(response.status.code(), 301);
        assert_eq!(response.header("location"), Some("/docs/"));
    }
}
