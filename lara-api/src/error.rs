use http_client::HttpError;
use thiserror::Error;

/// High-level API errors for Lara operations
///
/// Transport failures from the private HTTP client are mapped onto the
/// variants below so callers only ever match on one error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP method other than GET or POST
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Malformed absolute URI, usually a bad host in the client configuration
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Network communication error
    ///
    /// Covers connect, write and read failures as well as malformed status
    /// lines, header lines and gzip bodies. `raw` holds the offending bytes
    /// when they were available.
    #[error("Transport error: {message}")]
    Transport { message: String, raw: Vec<u8> },

    /// Response frame shorter than the layout being decoded
    #[error("Truncated {frame} response: needed {needed} bytes, got {actual}")]
    TruncatedResponse {
        frame: &'static str,
        needed: usize,
        actual: usize,
    },

    /// Digest challenge without a realm or nonce
    #[error("Malformed digest challenge: missing {0}")]
    MalformedChallenge(&'static str),

    /// Not signed in, or the device rejected the credentials
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    /// Station page outside 0..=3
    #[error("Unsupported station page {0}, expected 0..=3")]
    UnsupportedPage(u8),

    /// Parameter value outside its accepted range
    #[error("Parameter '{parameter}' value {value} is out of range [{min}, {max}]")]
    RangeError {
        parameter: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The device flagged an error inside its own response payload
    #[error("Device reported error status {0}")]
    UnknownDeviceError(u8),

    /// HTTP status other than 200 that is not an authentication failure
    #[error("Unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// A field in an outbound layout does not fit its frame
    #[error("Field '{field}' ends at byte {end} but the {frame} frame is {len} bytes")]
    FrameOverflow {
        frame: &'static str,
        field: &'static str,
        end: usize,
        len: usize,
    },

    /// Required environment variable not set
    #[error("Missing configuration: {0} is not set")]
    MissingConfig(&'static str),
}

impl ApiError {
    pub fn range_error(parameter: &'static str, value: impl Into<i64>, min: i64, max: i64) -> Self {
        Self::RangeError {
            parameter,
            value: value.into(),
            min,
            max,
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Convert from HttpError to ApiError
impl From<HttpError> for ApiError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::UnsupportedMethod(method) => ApiError::UnsupportedMethod(method),
            HttpError::InvalidUri { uri, reason } => ApiError::InvalidUri { uri, reason },
            HttpError::Transport { message, raw } => ApiError::Transport { message, raw },
            HttpError::Io(e) => ApiError::Transport {
                message: e.to_string(),
                raw: Vec::new(),
            },
            HttpError::MalformedChallenge(name) => ApiError::MalformedChallenge(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_conversion() {
        let api_error: ApiError = HttpError::UnsupportedMethod("PUT".to_string()).into();
        assert!(matches!(api_error, ApiError::UnsupportedMethod(m) if m == "PUT"));

        let api_error: ApiError = HttpError::MalformedChallenge("realm").into();
        assert!(matches!(api_error, ApiError::MalformedChallenge("realm")));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let api_error: ApiError = HttpError::Io(io).into();
        match api_error {
            ApiError::Transport { message, raw } => {
                assert!(message.contains("reset by peer"));
                assert!(raw.is_empty());
            }
            other => panic!("Expected ApiError::Transport, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::range_error("volume", 150u8, 0, 100);
        assert_eq!(
            format!("{}", err),
            "Parameter 'volume' value 150 is out of range [0, 100]"
        );

        let err = ApiError::TruncatedResponse {
            frame: "basic info",
            needed: 35,
            actual: 12,
        };
        assert_eq!(
            format!("{}", err),
            "Truncated basic info response: needed 35 bytes, got 12"
        );

        assert_eq!(
            format!("{}", ApiError::UnsupportedPage(4)),
            "Unsupported station page 4, expected 0..=3"
        );
    }
}
