//! Digest-authenticated request dispatch

use crate::digest::{Credentials, DigestChallenge};
use crate::error::Result;
use crate::request::{Method, Request};
use crate::response::Response;
use crate::transport::{RawTransport, Transport};

/// HTTP client that remembers the device's digest challenge
///
/// The first challenge is usually obtained with a plain `GET /`. From then
/// on every request carries an `Authorization` header computed from the
/// cached challenge. When the device answers with a fresh
/// `WWW-Authenticate` challenge the header is recomputed and the request is
/// sent exactly once more. A second failure is returned as-is.
///
/// The cached challenge is mutable session state, so requests take
/// `&mut self` and only one can be in flight per client.
#[derive(Debug)]
pub struct HttpClient<T: Transport = RawTransport> {
    transport: T,
    credentials: Credentials,
    challenge: Option<DigestChallenge>,
}

impl HttpClient<RawTransport> {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(RawTransport::new(), credentials)
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn with_transport(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            challenge: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn challenge(&self) -> Option<&DigestChallenge> {
        self.challenge.as_ref()
    }

    pub fn has_challenge(&self) -> bool {
        self.challenge.is_some()
    }

    /// Forget the cached challenge, forcing the next request to be answered
    /// with a fresh one
    pub fn clear_challenge(&mut self) {
        self.challenge = None;
    }

    /// Send a request, authenticating with the cached or a freshly issued
    /// challenge
    pub async fn request(
        &mut self,
        method: Method,
        uri: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let mut request = Request::new(method, uri)?;
        if let Some(body) = body {
            request = request.body(body);
        }

        if let Some(challenge) = &self.challenge {
            let authorization =
                challenge.authorization(&self.credentials, method.as_str(), &request.path_and_query());
            request.headers_mut().insert("Authorization", authorization);
        }

        let response = self.transport.send(&request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let Some(www_authenticate) = response.header("WWW-Authenticate") else {
            return Ok(response);
        };

        let challenge = DigestChallenge::parse(www_authenticate)?;
        tracing::info!(
            status = response.status_code,
            realm = %challenge.realm,
            "Device issued a new digest challenge, retrying once"
        );

        let authorization =
            challenge.authorization(&self.credentials, method.as_str(), &request.path_and_query());
        request.headers_mut().insert("Authorization", authorization);
        self.challenge = Some(challenge);

        let retried = self.transport.send(&request).await?;
        tracing::debug!(status = retried.status_code, "Authenticated retry completed");

        Ok(retried)
    }

    pub async fn get(&mut self, uri: &str) -> Result<Response> {
        self.request(Method::Get, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Vec<u8>) -> Result<Response> {
        self.request(Method::Post, uri, Some(body)).await
    }
}
