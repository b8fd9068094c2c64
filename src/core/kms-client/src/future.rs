//! Completion types of the asynchronous surface.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use kms_model::{KmsError, KmsRequest};
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

/// Receives the outcome of an asynchronous call.
///
/// Exactly one of the two methods is called, once, when the call completes.
/// A call dropped before it starts reports [`KmsError::Cancelled`].
pub trait AsyncHandler<Req, Res>: Send + Sync {
    /// Called with the original request and its result.
    fn on_success(&self, request: &Req, result: &Res);

    /// Called with the failure.
    fn on_error(&self, error: &KmsError);
}

/// A boxed handler for the request type `R`.
pub type BoxedHandler<R> = Box<dyn AsyncHandler<R, <R as KmsRequest>::Output>>;

/// An [`AsyncHandler`] built from two closures.
pub struct FnHandler<S, E> {
    on_success: S,
    on_error: E,
}

impl<S, E> FnHandler<S, E> {
    /// Creates a handler calling `on_success` or `on_error`.
    pub fn new(on_success: S, on_error: E) -> Self {
        Self {
            on_success,
            on_error,
        }
    }
}

impl<Req, Res, S, E> AsyncHandler<Req, Res> for FnHandler<S, E>
where
    S: Fn(&Req, &Res) + Send + Sync,
    E: Fn(&KmsError) + Send + Sync,
{
    fn on_success(&self, request: &Req, result: &Res) {
        (self.on_success)(request, result);
    }

    fn on_error(&self, error: &KmsError) {
        (self.on_error)(error);
    }
}

/// Notifies `handler`, if any, of `outcome`.
pub(crate) fn notify<R: KmsRequest>(
    handler: Option<&BoxedHandler<R>>,
    request: &R,
    outcome: &Result<R::Output, KmsError>,
) {
    if let Some(handler) = handler {
        match outcome {
            Ok(result) => handler.on_success(request, result),
            Err(err) => handler.on_error(err),
        }
    }
}

/// Delivers one call's outcome to its handler and its future.
///
/// Dropping a completion that was never used (the call was discarded before
/// it ran) reports [`KmsError::Cancelled`] to the handler.
pub(crate) struct Completion<R: KmsRequest> {
    handler: Option<BoxedHandler<R>>,
    tx: Option<oneshot::Sender<Result<R::Output, KmsError>>>,
}

impl<R: KmsRequest> Completion<R> {
    pub(crate) fn new(
        handler: Option<BoxedHandler<R>>,
        tx: oneshot::Sender<Result<R::Output, KmsError>>,
    ) -> Self {
        Self {
            handler,
            tx: Some(tx),
        }
    }

    pub(crate) fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Notifies the handler, then resolves the future.
    pub(crate) fn complete(mut self, request: &R, outcome: Result<R::Output, KmsError>) {
        notify(self.handler.take().as_ref(), request, &outcome);
        self.resolve(outcome);
    }

    /// Resolves the future without notifying anyone.
    pub(crate) fn resolve(mut self, outcome: Result<R::Output, KmsError>) {
        if let Some(tx) = self.tx.take() {
            // The caller may have dropped the future.
            let _ = tx.send(outcome);
        }
    }
}

impl<R: KmsRequest> Drop for Completion<R> {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.on_error(&KmsError::Cancelled);
        }
    }
}

enum State<T> {
    Ready(Option<Result<T, KmsError>>),
    Pending {
        rx: oneshot::Receiver<Result<T, KmsError>>,
        abort: AbortHandle,
    },
}

/// The eventual result of an asynchronous call.
///
/// Await it from async code, or [`wait`](Self::wait) for it from a plain
/// thread. A call whose task is dropped before completing (cancelled, or
/// discarded by a shutdown) resolves to [`KmsError::Cancelled`].
#[must_use = "futures do nothing unless awaited; the call still runs but its result is lost"]
pub struct KmsFuture<T> {
    state: State<T>,
}

impl<T> KmsFuture<T> {
    /// A future that is already resolved.
    pub fn ready(result: Result<T, KmsError>) -> Self {
        Self {
            state: State::Ready(Some(result)),
        }
    }

    pub(crate) fn pending(rx: oneshot::Receiver<Result<T, KmsError>>, abort: AbortHandle) -> Self {
        Self {
            state: State::Pending { rx, abort },
        }
    }

    /// Requests cancellation of the call.
    ///
    /// Only a call still queued in the worker pool is prevented from running;
    /// a call already sending its request runs to completion.
    pub fn cancel(&self) {
        if let State::Pending { abort, .. } = &self.state {
            abort.abort();
        }
    }

    /// Blocks the current thread until the call completes.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context; await
    /// the future there instead.
    pub fn wait(self) -> Result<T, KmsError> {
        match self.state {
            State::Ready(result) => result.unwrap_or(Err(KmsError::Cancelled)),
            State::Pending { rx, .. } => rx.blocking_recv().unwrap_or(Err(KmsError::Cancelled)),
        }
    }
}

// The result is only ever moved out, never pinned in place.
impl<T> Unpin for KmsFuture<T> {}

impl<T> Future for KmsFuture<T> {
    type Output = Result<T, KmsError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            State::Ready(result) => Poll::Ready(result.take().unwrap_or(Err(KmsError::Cancelled))),
            State::Pending { rx, .. } => Pin::new(rx)
                .poll(cx)
                .map(|received| received.unwrap_or(Err(KmsError::Cancelled))),
        }
    }
}

impl<T> std::fmt::Debug for KmsFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Ready(Some(_)) => "ready",
            State::Ready(None) => "consumed",
            State::Pending { .. } => "pending",
        };
        f.debug_struct("KmsFuture").field("state", &state).finish()
    }
}
