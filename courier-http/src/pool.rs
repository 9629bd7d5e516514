//! Fire-and-forget request queue.
//!
//! An [`AsyncPool`] owns a bounded queue and one worker thread that drains
//! it, executing requests one at a time in the order they were queued. A
//! caller only learns whether its request made it into the queue; the
//! outcome of the execution is logged by the worker and handed to the
//! optional completion hook, never returned.

use bytes::Bytes;
use std::sync::{Arc, Mutex, OnceLock};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::client::execute;
use crate::config::CompletionHook;
use crate::transport::default_transport;
use crate::{HttpRequest, PoolConfig, RequestError, ResponseEnvelope, Result, Transport};

static GLOBAL_POOL: OnceLock<AsyncPool> = OnceLock::new();
static GLOBAL_POOL_INIT: Mutex<()> = Mutex::new(());

/// Handle to a bounded request queue and its worker.
///
/// Clones share the same queue. The worker stops once every handle is
/// dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct AsyncPool {
    sender: mpsc::Sender<HttpRequest>,
    capacity: usize,
}

impl AsyncPool {
    /// Start a pool with its own worker thread.
    ///
    /// The worker runs a single-threaded runtime of its own, so it keeps
    /// going regardless of which runtime the callers use.
    pub fn start(config: PoolConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let requested = config.capacity;
        let config = config.with_capacity(requested);
        let capacity = config.capacity;

        // std panics on interior NUL in thread names.
        if config.thread_name.contains('\0') {
            return Err(RequestError::PoolStart(format!(
                "invalid thread name {:?}",
                config.thread_name
            )));
        }

        let (sender, receiver) = mpsc::channel(capacity);
        let on_complete = config.on_complete.clone();

        std::thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run_worker(receiver, transport, on_complete))
            .map_err(|e| RequestError::PoolStart(e.to_string()))?;

        debug!(capacity, thread = %config.thread_name, "Async request pool started");
        Ok(Self { sender, capacity })
    }

    /// Number of requests the queue holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue `request`, waiting at most its timeout for space.
    ///
    /// Returns the serialized [`ResponseEnvelope::accepted`] envelope as soon
    /// as the request is queued.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<Bytes> {
        let timeout = request.get_timeout();
        match tokio::time::timeout(timeout, self.sender.send(request)).await {
            Ok(Ok(())) => {
                let accepted = serde_json::to_vec(&ResponseEnvelope::accepted())?;
                Ok(Bytes::from(accepted))
            }
            Ok(Err(_)) => Err(RequestError::PoolClosed),
            Err(_) => Err(RequestError::EnqueueTimeout(timeout)),
        }
    }
}

fn run_worker(
    mut receiver: mpsc::Receiver<HttpRequest>,
    transport: Arc<dyn Transport>,
    on_complete: Option<CompletionHook>,
) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to build async request worker runtime");
            return;
        }
    };

    runtime.block_on(async move {
        while let Some(request) = receiver.recv().await {
            let result = execute(transport.as_ref(), &request).await;
            if let Err(e) = &result {
                error!(error = %e, request = ?request, "Async request failed");
            }
            if let Some(hook) = &on_complete {
                hook(&request, &result);
            }
        }
        debug!("Async request queue closed, worker exiting");
    });
}

/// Start the process-wide pool with the default transport.
///
/// Returns `false`, changing nothing, if the pool is already running. A
/// capacity of zero means [`DEFAULT_POOL_CAPACITY`](crate::DEFAULT_POOL_CAPACITY).
pub fn init_async_pool(capacity: usize) -> bool {
    init_async_pool_with(PoolConfig::new(capacity), default_transport())
}

/// Start the process-wide pool with an explicit configuration and transport.
///
/// Concurrent callers race safely: exactly one of them gets `true`. A
/// worker that fails to start is logged, leaves the pool unset and yields
/// `false`.
pub fn init_async_pool_with(config: PoolConfig, transport: Arc<dyn Transport>) -> bool {
    let _guard = GLOBAL_POOL_INIT
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if GLOBAL_POOL.get().is_some() {
        return false;
    }

    match AsyncPool::start(config, transport) {
        Ok(pool) => GLOBAL_POOL.set(pool).is_ok(),
        Err(e) => {
            error!(error = %e, "Failed to start async request pool");
            false
        }
    }
}

/// The process-wide pool, if started.
pub fn global_pool() -> Option<&'static AsyncPool> {
    GLOBAL_POOL.get()
}
