use std::fmt;
use std::io::{self, BufRead, Read};
use thiserror::Error;

use super::Status;

/// Longest request or header line accepted, in bytes.
pub const MAX_LINE: u64 = 65536;
pub const MAX_HEADERS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Options,
    Other(String),
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Other(other) => other,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Raw request-target, still percent-encoded and carrying any query.
    pub target: String,
    pub version: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// The target without query or fragment, still percent-encoded.
    pub fn path(&self) -> &str {
        split_target(&self.target).0
    }

    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.target, self.version)
    }
}

/// Splits a request-target into its path and query, dropping any fragment.
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    let without_fragment = target.split('#').next().unwrap_or(target);
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_fragment, None),
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("connection closed before a request was sent")]
    Empty,

    #[error("Bad request syntax ({0})")]
    Malformed(String),

    #[error("Request line too long")]
    LineTooLong,

    #[error("Too many headers")]
    TooManyHeaders,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Status to answer with, or `None` when nothing should be written back.
    pub fn status(&self) -> Option<Status> {
        match self {
            ParseError::Empty | ParseError::Io(_) => None,
            ParseError::Malformed(_) => Some(Status::BadRequest),
            ParseError::LineTooLong => Some(Status::UriTooLong),
            ParseError::TooManyHeaders => Some(Status::HeaderFieldsTooLarge),
        }
    }
}

/// Reads the request line and headers. The body, if any, is left unread.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request, ParseError> {
    let first_line = read_line(reader)?.ok_or(ParseError::Empty)?;
    crate::log_request!(first_line);

    let parts: Vec<&str> = first_line.split_whitespace().collect();
    let (method, target, version) = match parts.as_slice() {
        [method, target, version] if version.starts_with("HTTP/") => (*method, *target, *version),
        _ => return Err(ParseError::Malformed(first_line.clone())),
    };

    let mut headers = Vec::new();
    while let Some(line) = read_line(reader)? {
        if line.is_empty() {
            break;
        }
        if headers.len() >= MAX_HEADERS {
            return Err(ParseError::TooManyHeaders);
        }
        log::trace!("Header line: {}", line);
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    Ok(Request {
        method: Method::parse(method),
        target: target.to_string(),
        version: version.to_string(),
        headers,
    })
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, ParseError> {
    let mut buf = Vec::new();
    let read = reader.by_ref().take(MAX_LINE + 1).read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }
    if buf.len() as u64 > MAX_LINE {
        return Err(ParseError::LineTooLong);
    }

    let line = String::from_utf8_lossy(&buf);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(raw: &str) -> Result<Request, ParseError> {
        read_request(&mut Cursor::new(raw.as_bytes().to_vec()))
    }

    #[test]
    fn parses_request_line_and_headers() {
        let request =
            parse("GET /app.js?v=3 HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n").unwrap();

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.target, "/app.js?v=3");
        assert_eq!(request.path(), "/app.js");
        assert_eq!(request.version, "HTTP/1.1");
        assert_eq!(
            request.headers,
            vec![
                ("Host".to_string(), "localhost".to_string()),
                ("Accept".to_string(), "*/*".to_string()),
            ]
        );
        assert_eq!(request.request_line(), "GET /app.js?v=3 HTTP/1.1");
    }

    #[test]
    fn accepts_bare_newlines_and_eof_after_headers() {
        let request = parse("HEAD / HTTP/1.0\nHost: x\n").unwrap();
        assert_eq!(request.method, Method::Head);
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn unknown_methods_are_kept() {
        let request = parse("DELETE /x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method, Method::Other("DELETE".to_string()));
        assert_eq!(request.method.to_string(), "DELETE");
    }

    #[test]
    fn empty_connection() {
        assert!(matches!(parse(""), Err(ParseError::Empty)));
        assert!(parse("").unwrap_err().status().is_none());
    }

    #[test]
    fn malformed_request_line() {
        let err = parse("GET /\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
        assert_eq!(err.status(), Some(Status::BadRequest));

        let err = parse("GET / FTP/1.0\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn overlong_request_line() {
        let raw = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(MAX_LINE as usize));
        let err = parse(&raw).unwrap_err();
        assert!(matches!(err, ParseError::LineTooLong));
        assert_eq!(err.status(), Some(Status::UriTooLong));
    }

    #[test]
    fn too_many_headers() {
        let mut raw = String::from("GET / HTTP/1.1\r\n");
        for i in 0..=MAX_HEADERS {
            raw.push_str(&format!("X-Header-{i}: {i}\r\n"));
        }
        raw.push_str("\r\n");

        let err = parse(&raw).unwrap_err();
        assert_eq!(err.status(), Some(Status::HeaderFieldsTooLarge));
    }

    #[test]
    fn split_target_drops_fragment() {
        assert_eq!(split_target("/a/b?x=1#top"), ("/a/b", Some("x=1")));
        assert_eq!(split_target("/a/b#top?x"), ("/a/b", None));
        assert_eq!(split_target("/"), ("/", None));
    }
}
