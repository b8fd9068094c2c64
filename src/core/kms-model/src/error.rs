//! KMS error types.
//!
//! Remote rejections carry an [`ErrorKind`] from the service's closed
//! taxonomy. Everything else is a local failure and has its own variant, so
//! callers can tell "the service said no" from "this client could not ask".

use std::fmt;

use thiserror::Error;

use crate::operation::Operation;

/// Remote rejection kinds returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The resource (usually an alias) already exists.
    AlreadyExists,
    /// The service could not reach a dependency in time. Retryable.
    DependencyTimeout,
    /// The key is disabled.
    Disabled,
    /// The import token has expired.
    ExpiredImportToken,
    /// The imported key material differs from what was previously imported.
    IncorrectKeyMaterial,
    /// The alias name is malformed or reserved.
    InvalidAliasName,
    /// The ARN is malformed.
    InvalidArn,
    /// The ciphertext is corrupted or was produced under a different key or context.
    InvalidCiphertext,
    /// The grant id is unknown or malformed.
    InvalidGrantId,
    /// The grant token is unknown or malformed.
    InvalidGrantToken,
    /// The import token does not match the key.
    InvalidImportToken,
    /// The key usage does not allow the requested operation.
    InvalidKeyUsage,
    /// The pagination marker was not produced by a previous list call.
    InvalidMarker,
    /// Internal service failure. Retryable.
    KmsInternal,
    /// The key is not in a state that allows the operation.
    KmsInvalidState,
    /// The key cannot be used right now.
    KeyUnavailable,
    /// An account or request limit was exceeded.
    LimitExceeded,
    /// The key policy document is malformed.
    MalformedPolicyDocument,
    /// The key, alias or grant does not exist.
    NotFound,
    /// A tag key or value is invalid, or the tag limit was reached.
    Tag,
    /// The operation is not supported for this key.
    UnsupportedOperation,
    /// The request rate exceeded the account quota. Retryable.
    Throttling,
    /// A code this client does not know about.
    Unknown,
}

impl ErrorKind {
    /// Every known (non-[`Unknown`](ErrorKind::Unknown)) kind.
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::AlreadyExists,
        ErrorKind::DependencyTimeout,
        ErrorKind::Disabled,
        ErrorKind::ExpiredImportToken,
        ErrorKind::IncorrectKeyMaterial,
        ErrorKind::InvalidAliasName,
        ErrorKind::InvalidArn,
        ErrorKind::InvalidCiphertext,
        ErrorKind::InvalidGrantId,
        ErrorKind::InvalidGrantToken,
        ErrorKind::InvalidImportToken,
        ErrorKind::InvalidKeyUsage,
        ErrorKind::InvalidMarker,
        ErrorKind::KmsInternal,
        ErrorKind::KmsInvalidState,
        ErrorKind::KeyUnavailable,
        ErrorKind::LimitExceeded,
        ErrorKind::MalformedPolicyDocument,
        ErrorKind::NotFound,
        ErrorKind::Tag,
        ErrorKind::UnsupportedOperation,
        ErrorKind::Throttling,
    ];

    /// Wire code of the kind (`"NotFoundException"`).
    pub const fn code(self) -> &'static str {
        match self {
            Self::AlreadyExists => "AlreadyExistsException",
            Self::DependencyTimeout => "DependencyTimeoutException",
            Self::Disabled => "DisabledException",
            Self::ExpiredImportToken => "ExpiredImportTokenException",
            Self::IncorrectKeyMaterial => "IncorrectKeyMaterialException",
            Self::InvalidAliasName => "InvalidAliasNameException",
            Self::InvalidArn => "InvalidArnException",
            Self::InvalidCiphertext => "InvalidCiphertextException",
            Self::InvalidGrantId => "InvalidGrantIdException",
            Self::InvalidGrantToken => "InvalidGrantTokenException",
            Self::InvalidImportToken => "InvalidImportTokenException",
            Self::InvalidKeyUsage => "InvalidKeyUsageException",
            Self::InvalidMarker => "InvalidMarkerException",
            Self::KmsInternal => "KMSInternalException",
            Self::KmsInvalidState => "KMSInvalidStateException",
            Self::KeyUnavailable => "KeyUnavailableException",
            Self::LimitExceeded => "LimitExceededException",
            Self::MalformedPolicyDocument => "MalformedPolicyDocumentException",
            Self::NotFound => "NotFoundException",
            Self::Tag => "TagException",
            Self::UnsupportedOperation => "UnsupportedOperationException",
            Self::Throttling => "ThrottlingException",
            Self::Unknown => "UnknownError",
        }
    }

    /// Maps a wire code to its kind.
    ///
    /// Accepts fully qualified codes (`"com.amazonaws.kms#NotFoundException"`)
    /// and unknown codes map to [`ErrorKind::Unknown`].
    pub fn from_code(code: &str) -> Self {
        let code = bare_code(code);

        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.code() == code)
            .unwrap_or(Self::Unknown)
    }

    /// Returns true if a failed call with this kind is safe to retry unchanged.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::DependencyTimeout | Self::KmsInternal | Self::Throttling
        )
    }
}

/// Strips a `<namespace>#` prefix and a `:<namespace url>` suffix.
fn bare_code(code: &str) -> &str {
    let code = code.rsplit('#').next().unwrap_or(code);
    code.split(':').next().unwrap_or(code).trim()
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors surfaced by every KMS client surface.
#[derive(Debug, Clone, Error)]
pub enum KmsError {
    /// The service rejected the request.
    #[error("{code}: {message}")]
    Service {
        /// Kind of rejection.
        kind: ErrorKind,
        /// Wire code as received, kept for [`ErrorKind::Unknown`] kinds.
        code: String,
        /// Human readable message from the service.
        message: String,
        /// Request id assigned by the service, if any.
        request_id: Option<String>,
        /// HTTP status, if the call went over HTTP.
        status: Option<u16>,
    },

    /// The operation is not implemented by this client instance.
    #[error("operation not implemented: {0}")]
    Unimplemented(Operation),

    /// The request could not be delivered or the response not received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request or response could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The asynchronous client was shut down before the call was submitted.
    #[error("client is shut down")]
    Shutdown,

    /// The call was cancelled before it completed.
    #[error("call cancelled")]
    Cancelled,
}

impl KmsError {
    /// Builds a service rejection of a known kind.
    pub fn service(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Service {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
            request_id: None,
            status: None,
        }
    }

    /// Builds a service rejection from a wire code.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        Self::Service {
            kind: ErrorKind::from_code(code),
            code: bare_code(code).to_string(),
            message: message.into(),
            request_id: None,
            status: None,
        }
    }

    /// Remote rejection kind, or `None` for local failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Service { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns true if retrying the same request may succeed.
    ///
    /// Service errors defer to [`ErrorKind::is_retryable`]; transport
    /// failures are retryable; other local failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service { kind, .. } => kind.is_retryable(),
            Self::Transport(_) => true,
            _ => false,
        }
    }

    /// Returns true if the service reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.kind() == Some(ErrorKind::NotFound)
    }

    /// Returns true if this is the "not implemented by this instance" signal.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, Self::Unimplemented(_))
    }
}

impl From<serde_json::Error> for KmsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
