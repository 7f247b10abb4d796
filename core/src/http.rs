//! HTTP request/response types shared by the client and its transports.
//!
//! # Design
//! Requests and responses are plain data. `NationalizeClient` builds an
//! `HttpRequest`, a `Transport` turns it into an `HttpResponse`, and the client
//! classifies the response. Hosts that want to run the I/O themselves can skip
//! the transport and call the `build_*` / `parse_*` pair directly.
//!
//! All fields use owned types so values can be moved across threads or handed
//! to a foreign HTTP stack without lifetime concerns.

/// HTTP method for a request. The prediction service only exposes `GET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Fully encoded URL including the query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Raw body bytes. Not required to be UTF-8.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
