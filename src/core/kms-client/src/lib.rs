//! # KMS Client
//!
//! Synchronous and asynchronous client surfaces for the key-management
//! service.
//!
//! ## Surfaces
//!
//! - [`Kms`]: one blocking method per operation, implemented by [`KmsClient`]
//!   over any [`Transport`]
//! - [`KmsAsync`]: the same operations returning a [`KmsFuture`], implemented
//!   by [`KmsAsyncClient`] on a bounded worker pool
//! - [`Unsupported`] and [`PartialKms`]: clients that implement none or only
//!   some of the operations
//!
//! ```
//! use kms_client::{CannedTransport, Kms, KmsClient};
//! use kms_client::kms_model::Operation;
//! use serde_json::json;
//!
//! let transport = CannedTransport::new()
//!     .respond(Operation::GenerateRandom, json!({ "Plaintext": "AQID" }));
//! let client = KmsClient::new(transport);
//!
//! assert_eq!(client.generate_random_default().unwrap().plaintext, vec![1, 2, 3]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod async_client;
pub mod client;
pub mod future;
pub mod kms;
pub mod kms_async;
pub mod transport;

pub use adapter::{PartialKms, Unsupported};
pub use async_client::{KmsAsyncClient, DEFAULT_POOL_SIZE};
pub use client::KmsClient;
pub use future::{AsyncHandler, BoxedHandler, FnHandler, KmsFuture};
pub use kms::{Dispatch, Kms, KmsCall};
pub use kms_async::{AsyncDispatch, KmsAsync};
pub use transport::{CannedTransport, Transport};

pub use kms_model;
pub use kms_model::{ErrorKind, KmsError, KmsRequest, Operation};
