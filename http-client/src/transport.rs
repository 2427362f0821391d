//! Raw TCP transport
//!
//! Every request opens its own connection, writes the whole serialized
//! request with one `write_all`, reads the response and drops the socket.
//! There is no pooling and no keep-alive.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::{HttpError, Result};
use crate::reader::{BodyReader, ShortReadReader, DEFAULT_CHUNK_SIZE};
use crate::request::Request;
use crate::response::{decode_body, parse_head, Response};

/// Something that can carry one request to the device and return its response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response>;
}

/// Tunables for [`RawTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Size of the buffer used by the short-read heuristic
    pub read_chunk_size: usize,
    /// Upper bound on establishing the TCP connection. `None` waits forever.
    pub connect_timeout: Option<Duration>,
    pub tcp_nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout: None,
            tcp_nodelay: true,
        }
    }
}

impl TransportConfig {
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = nodelay;
        self
    }
}

/// Single-packet HTTP/1.1 transport over a fresh TCP connection per call
#[derive(Clone)]
pub struct RawTransport {
    config: TransportConfig,
    reader: Arc<dyn BodyReader>,
}

impl RawTransport {
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Uses the short-read heuristic sized by `config.read_chunk_size`
    pub fn with_config(config: TransportConfig) -> Self {
        let reader = Arc::new(ShortReadReader::new(config.read_chunk_size));
        Self { config, reader }
    }

    /// Replace the end-of-response strategy
    pub fn with_reader(mut self, reader: Arc<dyn BodyReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn connect(&self, addr: &str) -> Result<TcpStream> {
        tracing::debug!(addr = %addr, "Connecting to device");

        let connect = TcpStream::connect(addr);
        let stream = match self.config.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect).await.map_err(|_| {
                HttpError::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("connecting to {} timed out", addr),
                ))
            })??,
            None => connect.await?,
        };

        if self.config.tcp_nodelay {
            if let Err(e) = stream.set_nodelay(true) {
                tracing::warn!(addr = %addr, error = %e, "Failed to set TCP_NODELAY (continuing anyway)");
            }
        }

        Ok(stream)
    }
}

impl Default for RawTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RawTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for RawTransport {
    async fn send(&self, request: &Request) -> Result<Response> {
        let addr = request.authority();
        let mut stream = self.connect(&addr).await?;

        let message = request.to_bytes();
        tracing::debug!(
            method = %request.method(),
            path = %request.path_and_query(),
            bytes = message.len(),
            "Sending request"
        );
        stream.write_all(&message).await?;
        stream.flush().await?;

        let data = self.reader.read_burst(&mut stream).await?;
        let (status_code, headers, initial_body) = parse_head(&data)?;
        let mut body = initial_body.to_vec();

        let declared = headers
            .get("Content-Length")
            .and_then(|v| v.trim().parse::<usize>().ok());
        if let Some(declared) = declared {
            if declared > body.len() {
                let rest = self.reader.read_burst(&mut stream).await?;
                body.extend_from_slice(&rest);
            }
        }

        let body = decode_body(&headers, body)?;

        tracing::debug!(status = status_code, body_len = body.len(), "Received response");

        Ok(Response {
            status_code,
            headers,
            body,
        })
    }
}
