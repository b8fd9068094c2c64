//! Credentials handed to the request signer.

use kms_client::KmsError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An access key pair, optionally with a session token.
///
/// The secret and the token are erased from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl Credentials {
    /// Creates long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Adds a session token, making these temporary credentials.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// The access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The secret access key.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// The session token, if any.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Supplies credentials for each request.
pub trait CredentialsProvider: Send + Sync {
    /// Returns the credentials to sign the next request with.
    ///
    /// # Errors
    ///
    /// Returns [`KmsError::Configuration`] if no credentials are available.
    fn credentials(&self) -> Result<Credentials, KmsError>;

    /// Returns the name of this provider for logging/debugging.
    fn name(&self) -> &'static str;
}

/// A provider returning the same credentials every time.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Creates a provider for `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials, KmsError> {
        Ok(self.credentials.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
