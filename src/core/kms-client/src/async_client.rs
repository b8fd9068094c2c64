//! The pooled asynchronous client.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use kms_model::KmsError;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::future::{notify, BoxedHandler, Completion, KmsFuture};
use crate::kms::{Dispatch, Kms, KmsCall};
use crate::kms_async::AsyncDispatch;

/// Worker pool size used by [`KmsAsyncClient::new`].
///
/// Matches the default connection limit of the HTTP transport, so a full
/// pool never waits on a connection.
pub const DEFAULT_POOL_SIZE: usize = 50;

/// Asynchronous KMS client running blocking calls on its own worker pool.
///
/// Each submitted call runs the matching method of the wrapped [`Kms`] on a
/// pool thread. At most `pool_size` calls run at once; the rest queue. The
/// pool belongs to this client and is torn down by
/// [`shutdown`](Self::shutdown) or on drop, without waiting for queued work.
pub struct KmsAsyncClient {
    inner: Arc<dyn Kms>,
    runtime: Mutex<Option<Runtime>>,
    handle: Handle,
    closed: Arc<AtomicBool>,
    pool_size: usize,
}

impl KmsAsyncClient {
    /// Wraps `inner` with a pool of [`DEFAULT_POOL_SIZE`] workers.
    ///
    /// # Errors
    ///
    /// Returns [`KmsError::Configuration`] if the pool cannot be started.
    pub fn new(inner: impl Kms + 'static) -> Result<Self, KmsError> {
        Self::with_pool_size(Arc::new(inner), DEFAULT_POOL_SIZE)
    }

    /// Wraps `inner` with a pool of `pool_size` workers.
    ///
    /// # Errors
    ///
    /// Returns [`KmsError::Configuration`] if `pool_size` is zero or the pool
    /// cannot be started.
    pub fn with_pool_size(inner: Arc<dyn Kms>, pool_size: usize) -> Result<Self, KmsError> {
        if pool_size == 0 {
            return Err(KmsError::Configuration(
                "worker pool size must be at least 1".to_string(),
            ));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(pool_size)
            .thread_name("kms-async-worker")
            .build()
            .map_err(|e| KmsError::Configuration(format!("failed to start worker pool: {e}")))?;
        let handle = runtime.handle().clone();

        info!(pool_size, "KMS async client started");

        Ok(Self {
            inner,
            runtime: Mutex::new(Some(runtime)),
            handle,
            closed: Arc::new(AtomicBool::new(false)),
            pool_size,
        })
    }

    /// The synchronous client calls are delegated to.
    pub fn inner(&self) -> &Arc<dyn Kms> {
        &self.inner
    }

    /// Maximum number of calls running at once.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shutdown(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Stops accepting calls and tears the pool down without waiting.
    ///
    /// Later submissions fail with [`KmsError::Shutdown`]. Queued calls never
    /// run and resolve to [`KmsError::Cancelled`]. Calls already running finish
    /// on their thread and still deliver their outcome to the handler and the
    /// future. Callers that need a drain must await their futures before
    /// shutting down.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(runtime) = runtime {
            runtime.shutdown_background();
        }

        info!("KMS async client shut down");
    }
}

impl AsyncDispatch for KmsAsyncClient {
    fn submit<R: KmsCall>(
        &self,
        request: R,
        handler: Option<BoxedHandler<R>>,
    ) -> KmsFuture<R::Output> {
        if self.is_shutdown() {
            let outcome = Err(KmsError::Shutdown);
            notify(handler.as_ref(), &request, &outcome);
            return KmsFuture::ready(outcome);
        }

        debug!(operation = %R::OPERATION, "Submitting KMS call");

        let inner = Arc::clone(&self.inner);
        let closed = Arc::clone(&self.closed);
        let (tx, rx) = oneshot::channel();
        let completion = Completion::new(handler, tx);

        let task = self.handle.spawn_blocking(move || {
            // Queued past a shutdown: dropping the completion cancels the call.
            if closed.load(Ordering::Acquire) {
                return;
            }
            if completion.has_handler() {
                let outcome = request.clone().call(&*inner);
                completion.complete(&request, outcome);
            } else {
                completion.resolve(request.call(&*inner));
            }
        });

        KmsFuture::pending(rx, task.abort_handle())
    }
}

impl Dispatch for KmsAsyncClient {
    fn dispatch<R: KmsCall>(&self, request: R) -> Result<R::Output, KmsError> {
        request.call(&*self.inner)
    }
}

impl Drop for KmsAsyncClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for KmsAsyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KmsAsyncClient")
            .field("pool_size", &self.pool_size)
            .field("shutdown", &self.is_shutdown())
            .finish_non_exhaustive()
    }
}
