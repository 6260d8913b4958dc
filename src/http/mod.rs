//! Minimal HTTP/1.x plumbing: request parsing and response serialization.
//!
//! One request is read per connection and the connection is closed once the
//! response has been written.

pub mod request;
pub mod response;

pub use request::{read_request, split_target, Method, ParseError, Request};
pub use response::{Body, Response, Status};

/// Sets `name` to `value`, replacing an existing header of the same name.
pub fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(existing) => existing.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

pub fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
