//! Private HTTP client for Lara device communication
//!
//! The Lara's embedded web server only accepts a POST whose headers and body
//! arrive in the same TCP segment, and it guards its data endpoint with
//! RFC 2069 digest authentication. General purpose HTTP clients split the
//! two and speak newer digest variants, so this crate provides just enough
//! HTTP/1.1 to talk to it:
//!
//! - [`Request`] serializes to one buffer written with a single send
//! - [`RawTransport`] opens a fresh TCP connection per request and reads the
//!   response with a pluggable [`BodyReader`]
//! - [`HttpClient`] caches the device's [`DigestChallenge`] and retries once
//!   when a new one is issued
//!
//! No redirects, chunked transfer-encoding, keep-alive or TLS.

mod client;
mod digest;
mod error;
mod reader;
mod request;
mod response;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use client::HttpClient;
pub use digest::{Credentials, DigestChallenge};
pub use error::{HttpError, Result};
pub use reader::{BodyReader, EofReader, ShortReadReader, DEFAULT_CHUNK_SIZE};
pub use request::{HeaderMap, Method, Request};
pub use response::{decode_body, gunzip, parse_head, Response};
pub use transport::{RawTransport, Transport, TransportConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    fn client(mock: &MockTransport) -> HttpClient<MockTransport> {
        HttpClient::with_transport(mock.clone(), Credentials::new("admin", "secret"))
    }

    #[tokio::test]
    async fn test_no_challenge_sends_without_authorization() {
        let mock = MockTransport::new();
        mock.push_ok(b"<html></html>".to_vec());

        let mut client = client(&mock);
        let response = client.get("http://192.168.1.20/").await.unwrap();

        assert_eq!(response.status_code, 200);
        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers().contains("Authorization"));
        assert!(!client.has_challenge());
    }

    #[tokio::test]
    async fn test_challenge_triggers_exactly_one_retry() {
        let mock = MockTransport::new();
        mock.push_challenge("Lara", "nonce-1");
        mock.push_ok(vec![0, 1, 2]);

        let mut client = client(&mock);
        let response = client.post("http://192.168.1.20/data", vec![9]).await.unwrap();

        assert_eq!(response.body, vec![0, 1, 2]);
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].headers().contains("Authorization"));

        let expected = DigestChallenge::parse(r#"Digest realm="Lara", nonce="nonce-1""#)
            .unwrap()
            .authorization(&Credentials::new("admin", "secret"), "POST", "/data");
        assert_eq!(requests[1].headers().get("Authorization"), Some(expected.as_str()));
        assert_eq!(requests[1].body_bytes(), Some(&[9u8][..]));
        assert_eq!(client.challenge().unwrap().nonce, "nonce-1");
    }

    #[tokio::test]
    async fn test_second_failure_is_returned_unchanged() {
        let mock = MockTransport::new();
        mock.push_challenge("Lara", "nonce-1");
        mock.push_challenge("Lara", "nonce-2");
        mock.push_ok(Vec::new());

        let mut client = client(&mock);
        let response = client.post("http://192.168.1.20/data", vec![1]).await.unwrap();

        assert_eq!(response.status_code, 401);
        assert_eq!(mock.request_count(), 2);
        assert_eq!(mock.remaining(), 1);
    }

    #[tokio::test]
    async fn test_cached_challenge_is_reused_proactively() {
        let mock = MockTransport::new();
        mock.push_challenge("Lara", "nonce-1");
        mock.push_ok(Vec::new());
        mock.push_ok(Vec::new());

        let mut client = client(&mock);
        client.get("http://192.168.1.20/").await.unwrap();
        client.post("http://192.168.1.20/data", vec![1]).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 3);
        let third = requests[2].headers().get("Authorization").unwrap();
        assert!(third.contains(r#"nonce="nonce-1""#));
        assert!(third.contains(r#"uri="/data""#));
    }

    #[tokio::test]
    async fn test_failure_without_challenge_is_not_retried() {
        let mock = MockTransport::new();
        mock.push_response(404, &[], b"Not Found".to_vec());

        let mut client = client(&mock);
        let response = client.post("http://192.168.1.20/data", vec![1]).await.unwrap();

        assert_eq!(response.status_code, 404);
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_challenge_surfaces() {
        let mock = MockTransport::new();
        mock.push_response(401, &[("WWW-Authenticate", "Digest realm=\"Lara\"")], Vec::new());

        let mut client = client(&mock);
        let result = client.get("http://192.168.1.20/").await;

        assert!(matches!(result, Err(HttpError::MalformedChallenge("nonce"))));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_uri_sends_nothing() {
        let mock = MockTransport::new();
        let mut client = client(&mock);

        let result = client.get("lara").await;
        assert!(matches!(result, Err(HttpError::InvalidUri { .. })));
        assert_eq!(mock.request_count(), 0);
    }
}
