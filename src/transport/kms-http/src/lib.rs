//! # KMS HTTP Transport
//!
//! Sends KMS calls to the service's JSON endpoint.
//!
//! ## Wire format
//!
//! Every call is a `POST /` with `Content-Type: application/x-amz-json-1.1`,
//! an `X-Amz-Target: TrentService.<Operation>` header and the request as the
//! JSON body. Failures come back as `{"__type": ..., "message": ...}` and are
//! decoded into [`KmsError::Service`].
//!
//! Signing is pluggable through [`RequestSigner`]; no algorithm is bundled.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod signer;
pub mod transport;

use std::sync::Arc;

pub use config::ClientConfig;
pub use credentials::{Credentials, CredentialsProvider, StaticCredentials};
pub use signer::{RequestSigner, SignableRequest};
pub use transport::HttpTransport;

use kms_client::{KmsAsyncClient, KmsClient, KmsError};

/// Builds a synchronous client sending unsigned requests per `config`.
///
/// # Errors
///
/// Returns [`KmsError::Configuration`] if `config` is invalid.
pub fn build_client(config: &ClientConfig) -> Result<KmsClient, KmsError> {
    Ok(KmsClient::new(HttpTransport::new(config)?))
}

/// Builds an asynchronous client whose worker pool matches the connection
/// limit of `config`.
///
/// # Errors
///
/// Returns [`KmsError::Configuration`] if `config` is invalid or the pool
/// cannot be started.
pub fn build_async_client(config: &ClientConfig) -> Result<KmsAsyncClient, KmsError> {
    let client = build_client(config)?;
    KmsAsyncClient::with_pool_size(Arc::new(client), config.max_connections)
}
