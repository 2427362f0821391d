//! Client configuration

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http_client::{Credentials, TransportConfig};

use crate::codec::{TextCodec, Windows1250};
use crate::error::{ApiError, Result};

pub const ENV_HOST: &str = "LARA_HOST";
pub const ENV_USER: &str = "LARA_USER";
pub const ENV_PASSWORD: &str = "LARA_PASSWORD";

/// Connection settings for one device
#[derive(Clone)]
pub struct ClientConfig {
    /// Bare host or `host:port`
    pub host: String,
    pub username: String,
    pub password: String,
    pub transport: TransportConfig,
    pub codec: Arc<dyn TextCodec>,
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            transport: TransportConfig::default(),
            codec: Arc::new(Windows1250),
        }
    }

    /// Read `LARA_HOST`, `LARA_USER` and `LARA_PASSWORD`
    pub fn from_env() -> Result<Self> {
        let var = |name: &'static str| std::env::var(name).map_err(|_| ApiError::MissingConfig(name));
        Ok(Self::new(var(ENV_HOST)?, var(ENV_USER)?, var(ENV_PASSWORD)?))
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.with_connect_timeout(timeout);
        self
    }

    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.transport = self.transport.with_read_chunk_size(size);
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn TextCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// `http://host/`
    pub fn index_uri(&self) -> String {
        format!("http://{}/", self.host)
    }

    /// `http://host/data`
    pub fn data_uri(&self) -> String {
        format!("http://{}/data", self.host)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("transport", &self.transport)
            .field("codec", &self.codec)
            .finish()
    }
}
