//! Error types for the HTTP client

use thiserror::Error;

/// Errors that can occur while talking HTTP to the device
#[derive(Debug, Error)]
pub enum HttpError {
    /// Only `GET` and `POST` are spoken by the device
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request URI is not an absolute `http://` URI
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Malformed response or failed decompression
    ///
    /// `raw` carries the bytes that could not be interpreted, when available.
    #[error("Transport error: {message}")]
    Transport { message: String, raw: Vec<u8> },

    /// Socket level failure (connect, write or read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `WWW-Authenticate` value without a realm or nonce
    #[error("Malformed digest challenge: missing {0}")]
    MalformedChallenge(&'static str),
}

impl HttpError {
    pub(crate) fn transport(message: impl Into<String>, raw: &[u8]) -> Self {
        Self::Transport {
            message: message.into(),
            raw: raw.to_vec(),
        }
    }
}

/// Type alias for results that can return an HttpError
pub type Result<T> = std::result::Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_keeps_raw_bytes() {
        let err = HttpError::transport("no header terminator", b"HTTP/1.1 200");
        match err {
            HttpError::Transport { message, raw } => {
                assert_eq!(message, "no header terminator");
                assert_eq!(raw, b"HTTP/1.1 200");
            }
            _ => panic!("Expected HttpError::Transport"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = HttpError::UnsupportedMethod("PUT".to_string());
        assert_eq!(format!("{}", err), "Unsupported HTTP method: PUT");

        let err = HttpError::MalformedChallenge("nonce");
        assert_eq!(format!("{}", err), "Malformed digest challenge: missing nonce");
    }
}
