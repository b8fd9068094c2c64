//! Adapters for clients that implement only part of the KMS surface.
//!
//! [`Unsupported`] rejects every operation with
//! [`KmsError::Unimplemented`]. [`PartialKms`] composes handlers for a few
//! operations over a fallback that answers the rest.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use kms_model::{KmsError, KmsRequest, Operation};

use crate::future::{notify, BoxedHandler, KmsFuture};
use crate::kms::{Dispatch, Kms, KmsCall};
use crate::kms_async::AsyncDispatch;

/// A client that implements no operation.
///
/// Every call fails with [`KmsError::Unimplemented`] naming the operation,
/// without any I/O. Asynchronous calls resolve immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl Dispatch for Unsupported {
    fn dispatch<R: KmsCall>(&self, _request: R) -> Result<R::Output, KmsError> {
        Err(KmsError::Unimplemented(R::OPERATION))
    }
}

impl AsyncDispatch for Unsupported {
    fn submit<R: KmsCall>(
        &self,
        request: R,
        handler: Option<BoxedHandler<R>>,
    ) -> KmsFuture<R::Output> {
        let outcome = Err(KmsError::Unimplemented(R::OPERATION));
        notify(handler.as_ref(), &request, &outcome);
        KmsFuture::ready(outcome)
    }
}

type Handler<R> = Box<dyn Fn(R) -> Result<<R as KmsRequest>::Output, KmsError> + Send + Sync>;

/// A client assembled from per-operation closures.
///
/// Registered operations run their closure; every other operation is
/// forwarded to the fallback, which defaults to [`Unsupported`].
///
/// ```
/// use kms_client::{Kms, PartialKms};
/// use kms_client::kms_model::{DescribeKeyRequest, DescribeKeyResult, KeyMetadata};
///
/// let kms = PartialKms::new().on(|request: DescribeKeyRequest| {
///     Ok(DescribeKeyResult {
///         key_metadata: KeyMetadata {
///             key_id: request.key_id,
///             ..KeyMetadata::default()
///         },
///     })
/// });
///
/// assert_eq!(kms.describe_key(DescribeKeyRequest::new("k1")).unwrap().key_metadata.key_id, "k1");
/// assert!(kms.list_keys_default().unwrap_err().is_unimplemented());
/// ```
pub struct PartialKms {
    handlers: HashMap<Operation, Box<dyn Any + Send + Sync>>,
    fallback: Arc<dyn Kms>,
}

impl PartialKms {
    /// Creates an adapter whose unregistered operations are unimplemented.
    pub fn new() -> Self {
        Self::over(Arc::new(Unsupported))
    }

    /// Creates an adapter whose unregistered operations go to `fallback`.
    pub fn over(fallback: Arc<dyn Kms>) -> Self {
        Self {
            handlers: HashMap::new(),
            fallback,
        }
    }

    /// Handles the operation of `R` with `handler`, replacing any previous one.
    pub fn on<R, F>(mut self, handler: F) -> Self
    where
        R: KmsCall,
        F: Fn(R) -> Result<R::Output, KmsError> + Send + Sync + 'static,
    {
        let handler: Handler<R> = Box::new(handler);
        self.handlers.insert(R::OPERATION, Box::new(handler));
        self
    }

    /// Returns true if `operation` has a registered handler.
    pub fn handles(&self, operation: Operation) -> bool {
        self.handlers.contains_key(&operation)
    }
}

impl Default for PartialKms {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch for PartialKms {
    fn dispatch<R: KmsCall>(&self, request: R) -> Result<R::Output, KmsError> {
        let handler = self
            .handlers
            .get(&R::OPERATION)
            .and_then(|handler| handler.downcast_ref::<Handler<R>>());

        match handler {
            Some(handler) => handler(request),
            None => request.call(&*self.fallback),
        }
    }
}

impl fmt::Debug for PartialKms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations: Vec<_> = self.handlers.keys().copied().collect();
        operations.sort();
        f.debug_struct("PartialKms")
            .field("operations", &operations)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::client::KmsClient;
    use crate::future::FnHandler;
    use crate::kms_async::KmsAsync;
    use crate::transport::CannedTransport;
    use kms_model::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unsupported_rejects_every_operation() {
        let kms = Unsupported;

        let err = kms.describe_key(DescribeKeyRequest::new("k1")).unwrap_err();
        assert!(matches!(err, KmsError::Unimplemented(Operation::DescribeKey)));
        assert!(err.kind().is_none());
        assert!(!err.is_retryable());

        assert!(matches!(
            kms.create_key_default(),
            Err(KmsError::Unimplemented(Operation::CreateKey))
        ));
        assert!(matches!(
            kms.list_aliases_default(),
            Err(KmsError::Unimplemented(Operation::ListAliases))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_async_resolves_immediately() {
        let failures = Arc::new(AtomicUsize::new(0));
        let f = failures.clone();
        let handler = Box::new(FnHandler::new(
            |_: &EncryptRequest, _: &EncryptResult| panic!("unexpected success"),
            move |err: &KmsError| {
                assert!(err.is_unimplemented());
                f.fetch_add(1, Ordering::SeqCst);
            },
        ));

        let result = Unsupported
            .encrypt_async_with_handler(EncryptRequest::new("k1", b"x".to_vec()), handler)
            .await;

        assert!(matches!(result, Err(KmsError::Unimplemented(Operation::Encrypt))));
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert!(matches!(
            Unsupported.list_keys_default_async().wait(),
            Err(KmsError::Unimplemented(Operation::ListKeys))
        ));
    }

    #[test]
    fn test_partial_kms_runs_registered_handlers_only() {
        let kms = PartialKms::new()
            .on(|request: GenerateRandomRequest| {
                let len = request.number_of_bytes.unwrap_or(4) as usize;
                Ok(GenerateRandomResult {
                    plaintext: vec![0xab; len],
                })
            })
            .on(|_: EnableKeyRequest| Ok(EnableKeyResult {}));

        assert!(kms.handles(Operation::GenerateRandom));
        assert!(!kms.handles(Operation::Decrypt));

        assert_eq!(kms.generate_random_default().unwrap().plaintext.len(), 4);
        assert!(kms.enable_key(EnableKeyRequest::new("k1")).is_ok());
        assert!(matches!(
            kms.decrypt(DecryptRequest::new(vec![1, 2])),
            Err(KmsError::Unimplemented(Operation::Decrypt))
        ));
    }

    #[test]
    fn test_partial_kms_falls_back_to_inner_client() {
        let transport = Arc::new(
            CannedTransport::new().respond(Operation::ListKeys, json!({ "Keys": [{ "KeyId": "k1" }] })),
        );
        let client = KmsClient::from_shared(transport.clone());
        let kms = PartialKms::over(Arc::new(client))
            .on(|_: ListKeysRequest| Err(KmsError::service(ErrorKind::Throttling, "slow down")));

        let err = kms.list_keys_default().unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Throttling));
        assert_eq!(transport.call_count(), 0);

        let kms = PartialKms::over(Arc::new(KmsClient::from_shared(transport.clone())));
        assert_eq!(kms.list_keys_default().unwrap().keys[0].key_id, "k1");
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_later_registration_replaces_earlier() {
        let kms = PartialKms::new()
            .on(|_: GenerateRandomRequest| Ok(GenerateRandomResult { plaintext: vec![1] }))
            .on(|_: GenerateRandomRequest| Ok(GenerateRandomResult { plaintext: vec![2] }));

        assert_eq!(kms.generate_random_default().unwrap().plaintext, vec![2]);
    }
}
