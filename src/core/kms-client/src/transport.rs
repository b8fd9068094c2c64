//! Transport trait and an in-memory canned implementation.
//!
//! A [`Transport`] is the request-execution pipeline the client hands every
//! call to: signing, marshalling onto the wire, retries and connection
//! management all live behind it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use kms_model::{KmsError, KmsRequest, Operation};
use serde_json::Value;

/// Executes one remote operation.
pub trait Transport: Send + Sync {
    /// Sends `payload` as the input of `operation` and returns the response body.
    ///
    /// An empty response body is returned as `Value::Null`.
    fn execute(&self, operation: Operation, payload: Value) -> Result<Value, KmsError>;

    /// Returns the name of this transport for logging/debugging.
    fn name(&self) -> &'static str;
}

type Responder = Box<dyn Fn(&Value) -> Result<Value, KmsError> + Send + Sync>;

/// A [`Transport`] answering from preconfigured responses, for tests.
///
/// Operations without a configured response fail with a transport error.
/// Every call is recorded and can be inspected with [`calls`](Self::calls).
#[derive(Default)]
pub struct CannedTransport {
    responders: HashMap<Operation, Responder>,
    calls: Mutex<Vec<(Operation, Value)>>,
    delay: Option<Duration>,
}

impl CannedTransport {
    /// Creates a transport with no configured responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `operation` with `response`.
    pub fn respond(self, operation: Operation, response: Value) -> Self {
        self.respond_with(operation, move |_| Ok(response.clone()))
    }

    /// Answers the operation of `R` with the serialized `result`.
    ///
    /// # Errors
    ///
    /// Returns [`KmsError::Serialization`] if `result` cannot be serialized.
    pub fn respond_to<R: KmsRequest>(self, result: &R::Output) -> Result<Self, KmsError> {
        let response = serde_json::to_value(result)?;
        Ok(self.respond(R::OPERATION, response))
    }

    /// Fails `operation` with `error`.
    pub fn fail(self, operation: Operation, error: KmsError) -> Self {
        self.respond_with(operation, move |_| Err(error.clone()))
    }

    /// Answers `operation` by calling `responder` with the request payload.
    pub fn respond_with<F>(mut self, operation: Operation, responder: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, KmsError> + Send + Sync + 'static,
    {
        self.responders.insert(operation, Box::new(responder));
        self
    }

    /// Sleeps for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Calls received so far, in arrival order.
    pub fn calls(&self) -> Vec<(Operation, Value)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for CannedTransport {
    fn execute(&self, operation: Operation, payload: Value) -> Result<Value, KmsError> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let outcome = match self.responders.get(&operation) {
            Some(responder) => responder(&payload),
            None => Err(KmsError::Transport(format!(
                "no canned response for {operation}"
            ))),
        };

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((operation, payload));

        outcome
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

impl fmt::Debug for CannedTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations: Vec<_> = self.responders.keys().copied().collect();
        operations.sort();
        f.debug_struct("CannedTransport")
            .field("operations", &operations)
            .field("calls", &self.call_count())
            .field("delay", &self.delay)
            .finish()
    }
}
