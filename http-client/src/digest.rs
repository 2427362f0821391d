//! RFC 2069 digest authentication
//!
//! The device only implements the RFC 2069 scheme: no `qop`, no
//! `cnonce` and no `MD5-sess`. The response is
//! `MD5(MD5(user:realm:password):nonce:MD5(method:uri))`.

use md5::{Digest, Md5};

use crate::error::{HttpError, Result};

/// User name and password presented to the device
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Realm and nonce issued by the device in a `WWW-Authenticate` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
}

impl DigestChallenge {
    /// Parse a raw `WWW-Authenticate` value such as
    /// `Digest realm="Lara", nonce="0123abcd"`
    pub fn parse(header: &str) -> Result<Self> {
        let realm = quoted_param(header, "realm").ok_or(HttpError::MalformedChallenge("realm"))?;
        let nonce = quoted_param(header, "nonce").ok_or(HttpError::MalformedChallenge("nonce"))?;

        Ok(Self {
            realm: realm.to_string(),
            nonce: nonce.to_string(),
        })
    }

    /// Compute the value of the `Authorization` header for one request
    ///
    /// `uri` is the path and query of the request, exactly as it appears on
    /// the request line.
    pub fn authorization(&self, credentials: &Credentials, method: &str, uri: &str) -> String {
        let ha1 = hex_md5(&[&credentials.username, &self.realm, &credentials.password]);
        let ha2 = hex_md5(&[method, uri]);
        let response = hex_md5(&[&ha1, &self.nonce, &ha2]);

        format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", response="{}""#,
            credentials.username, self.realm, self.nonce, uri, response
        )
    }
}

/// Lowercase hex MD5 of the parts joined by `:`
fn hex_md5(parts: &[&str]) -> String {
    let mut h = Md5::new();
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            h.update(b":");
        }
        h.update(p.as_bytes());
    }
    hex::encode(h.finalize())
}

/// Find `name="value"` in a header value and return `value`
///
/// The name must start the header, or follow whitespace or a comma, so that
/// `nonce` is never matched inside `cnonce`.
fn quoted_param<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    let pattern = format!("{}=\"", name);
    let mut search_from = 0;

    while let Some(pos) = header[search_from..].find(&pattern) {
        let start = search_from + pos;
        let boundary = header[..start]
            .chars()
            .next_back()
            .map_or(true, |c| c == ',' || c.is_whitespace());

        let value_start = start + pattern.len();
        if boundary {
            let len = header[value_start..].find('"')?;
            return Some(&header[value_start..value_start + len]);
        }
        search_from = value_start;
    }

    None
}
