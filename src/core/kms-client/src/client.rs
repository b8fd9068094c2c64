//! The synchronous client.

use std::fmt;
use std::sync::Arc;

use kms_model::KmsError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::kms::{Dispatch, KmsCall};
use crate::transport::Transport;

/// Synchronous KMS client.
///
/// Each call marshals the request to JSON, hands it to the [`Transport`] and
/// unmarshals the response. Errors are surfaced unchanged; the client never
/// retries or recovers.
#[derive(Clone)]
pub struct KmsClient {
    transport: Arc<dyn Transport>,
}

impl KmsClient {
    /// Creates a client over `transport`.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    /// Creates a client over a shared transport.
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        debug!(transport = transport.name(), "KMS client created");
        Self { transport }
    }

    /// The transport calls are sent through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl Dispatch for KmsClient {
    fn dispatch<R: KmsCall>(&self, request: R) -> Result<R::Output, KmsError> {
        let operation = R::OPERATION;
        let payload = serde_json::to_value(&request)?;

        debug!(operation = %operation, transport = self.transport.name(), "Sending KMS request");

        let response = self
            .transport
            .execute(operation, payload)
            .inspect_err(|err| {
                warn!(operation = %operation, error = %err, "KMS request failed");
            })?;

        // Operations without output answer with an empty body.
        let response = match response {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };

        Ok(serde_json::from_value(response)?)
    }
}

impl fmt::Debug for KmsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KmsClient")
            .field("transport", &self.transport.name())
            .finish()
    }
}
