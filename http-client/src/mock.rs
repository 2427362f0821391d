//! Scripted in-memory transport for tests
//!
//! [`MockTransport`] hands out pre-loaded responses in order and records
//! every request it was asked to send, so dispatch logic can be tested
//! without a device or a socket.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{HttpError, Result};
use crate::request::{HeaderMap, Request};
use crate::response::Response;
use crate::transport::Transport;

/// A transport that replays queued responses
///
/// Clones share the same queue and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<Response>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status, headers and body
    pub fn push_response(&self, status_code: u16, headers: &[(&str, &str)], body: Vec<u8>) {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(*name, *value);
        }
        self.push(Response {
            status_code,
            headers: map,
            body,
        });
    }

    /// Queue a `200 OK` with the given body
    pub fn push_ok(&self, body: Vec<u8>) {
        self.push_response(200, &[], body);
    }

    /// Queue a `401` carrying a digest challenge
    pub fn push_challenge(&self, realm: &str, nonce: &str) {
        let value = format!(r#"Digest realm="{}", nonce="{}""#, realm, nonce);
        self.push_response(401, &[("WWW-Authenticate", value.as_str())], Vec::new());
    }

    pub fn push(&self, response: Response) {
        self.lock_responses().push_back(response);
    }

    /// Every request sent so far, oldest first
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    pub fn remaining(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Response>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &Request) -> Result<Response> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        self.lock_responses().pop_front().ok_or_else(|| {
            HttpError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock transport has no response queued",
            ))
        })
    }
}
