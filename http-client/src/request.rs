//! Request model and single-buffer serialization
//!
//! The device's embedded HTTP server cannot reassemble a request whose
//! headers and body arrive in separate TCP segments, so a request is always
//! serialized into one contiguous buffer and written with a single send.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{HttpError, Result};

/// HTTP methods understood by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            other => Err(HttpError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Ordered header list with case-insensitive lookup
///
/// Order is preserved so that serialized requests are byte-for-byte
/// predictable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any existing value with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single request to the device
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request for an absolute `http://` URI
    pub fn new(method: Method, uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| HttpError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" {
            return Err(HttpError::InvalidUri {
                uri: uri.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(HttpError::InvalidUri {
                uri: uri.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    /// Create a request from a textual method, rejecting anything but GET/POST
    pub fn parse(method: &str, uri: &str) -> Result<Self> {
        Self::new(method.parse()?, uri)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(80)
    }

    /// `host:port` string suitable for `TcpStream::connect`
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }

    /// `Host` header value, carrying the port only when it is not the default
    pub fn host_header(&self) -> String {
        match self.url.port() {
            Some(port) => format!("{}:{}", self.host(), port),
            None => self.host().to_string(),
        }
    }

    /// Path and query as they appear on the request line
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// Serialize request line, headers and body into one buffer
    ///
    /// Defaults are emitted first, each skipped when the caller supplied a
    /// header of the same name. Caller headers follow.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {} HTTP/1.1\r\n", self.method, self.path_and_query());

        let body = self.body.as_deref().unwrap_or_default();
        let mut push_default = |name: &str, value: &str| {
            if !self.headers.contains(name) {
                head.push_str(&format!("{}: {}\r\n", name, value));
            }
        };

        push_default("Host", &self.host_header());
        if self.method == Method::Post {
            push_default("Content-Length", &body.len().to_string());
        }
        push_default("Connection", "close");
        push_default("Accept", "*/*");
        push_default("Accept-Encoding", "gzip, deflate");
        push_default("Accept-Language", "en-US,en;q=0.9");

        for (name, value) in self.headers.iter() {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("\r\n");

        let mut message = head.into_bytes();
        if self.method == Method::Post {
            message.extend_from_slice(body);
        }
        message
    }
}
