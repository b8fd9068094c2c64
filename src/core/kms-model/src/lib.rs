//! # KMS Model
//!
//! Request/result types, the operation catalogue and the error taxonomy of
//! the key-management service client.
//!
//! ## Layout
//!
//! - [`Operation`]: the fixed set of remote operations
//! - [`KmsRequest`]: pairs every request type with its result type
//! - [`KmsError`] / [`ErrorKind`]: remote rejections and local failures
//! - one request and one result type per operation, grouped by area

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aliases;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod grants;
pub mod import;
pub mod keys;
pub mod operation;
pub mod policy;
pub mod tagging;
pub mod types;

pub use aliases::*;
pub use crypto::*;
pub use error::{ErrorKind, KmsError};
pub use grants::*;
pub use import::*;
pub use keys::*;
pub use operation::{Operation, TARGET_PREFIX};
pub use policy::*;
pub use tagging::*;
pub use types::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A request to a remote operation, paired with the result it produces.
pub trait KmsRequest:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    /// Result type returned by the operation.
    type Output: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static;

    /// The operation this request invokes.
    const OPERATION: Operation;
}

macro_rules! impl_kms_request {
    ($( ($variant:ident, $method:ident, $req:ident, $res:ident, [$($err:ident),* $(,)?], $doc:literal) ),* $(,)?) => {
        $(
            impl KmsRequest for $req {
                type Output = $res;
                const OPERATION: Operation = Operation::$variant;
            }
        )*
    };
}

crate::for_each_operation!(impl_kms_request);
