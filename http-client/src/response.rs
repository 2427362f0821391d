//! Response parsing

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::{HttpError, Result};
use crate::request::HeaderMap;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// A parsed response from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Declared `Content-Length`, if present and numeric
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse::<usize>().ok())
    }
}

/// Position of the first `\r\n\r\n` in `data`
pub(crate) fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

/// Split raw response bytes into a parsed head and the initial body chunk
pub fn parse_head(data: &[u8]) -> Result<(u16, HeaderMap, &[u8])> {
    let head_end = find_header_end(data)
        .ok_or_else(|| HttpError::transport("response has no header terminator", data))?;

    let head = std::str::from_utf8(&data[..head_end])
        .map_err(|_| HttpError::transport("response head is not valid text", data))?;
    let body = &data[head_end + HEADER_TERMINATOR.len()..];

    let mut lines = head.split("\r\n").filter(|l| !l.is_empty());

    let status_line = lines
        .next()
        .ok_or_else(|| HttpError::transport("empty status line", data))?;
    let status_code = status_line
        .split(' ')
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            HttpError::transport(format!("malformed status line '{}'", status_line), data)
        })?;

    let mut headers = HeaderMap::new();
    for line in lines {
        let (name, value) = line.split_once(':').ok_or_else(|| {
            HttpError::transport(format!("malformed header line '{}'", line), data)
        })?;
        headers.insert(name, value.trim());
    }

    Ok((status_code, headers, body))
}

/// Decompress a gzip body
pub fn gunzip(body: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(body);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| HttpError::transport(format!("gzip decompression failed: {}", e), body))?;
    Ok(out)
}

/// Apply the declared `Content-Encoding` to a complete body
///
/// Only `gzip` is decoded. Anything else is passed through unchanged.
pub fn decode_body(headers: &HeaderMap, body: Vec<u8>) -> Result<Vec<u8>> {
    match headers.get("Content-Encoding") {
        Some(encoding) if encoding.eq_ignore_ascii_case("gzip") => gunzip(&body),
        Some(encoding) if !encoding.eq_ignore_ascii_case("identity") => {
            tracing::warn!(encoding = %encoding, "Unsupported content encoding, passing body through");
            Ok(body)
        }
        _ => Ok(body),
    }
}
