//! Request signing hook.
//!
//! The transport builds a [`SignableRequest`] for every call and, when a
//! [`RequestSigner`] is configured, lets it add authentication headers
//! before the request is sent.

use kms_client::KmsError;
use sha2::{Digest, Sha256};

use crate::credentials::Credentials;

/// A request about to be sent, as seen by a signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    /// HTTP method.
    pub method: String,
    /// Full request URL.
    pub url: String,
    /// Headers to send, in order. Signers append to this list.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: Vec<u8>,
    /// Lowercase hex SHA-256 of `body`.
    pub payload_sha256: String,
}

impl SignableRequest {
    /// Creates a request, hashing `body`.
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> Self {
        let payload_sha256 = hex_encode(&Sha256::digest(&body));
        Self {
            method: method.into(),
            url: url.into(),
            headers,
            body,
            payload_sha256,
        }
    }

    /// Returns the first value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Appends a header.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }
}

/// Adds authentication to outgoing requests.
pub trait RequestSigner: Send + Sync {
    /// Signs `request` with `credentials`, typically by adding headers.
    ///
    /// # Errors
    ///
    /// Returns a [`KmsError`] if the request cannot be signed; the call fails
    /// without being sent.
    fn sign(&self, request: &mut SignableRequest, credentials: &Credentials) -> Result<(), KmsError>;

    /// Returns the name of this signer for logging/debugging.
    fn name(&self) -> &'static str;
}

/// Encodes bytes as lowercase hexadecimal.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push(HEX_CHARS[(byte >> 4) as usize] as char);
        hex.push(HEX_CHARS[(byte & 0x0F) as usize] as char);
    }
    hex
}
