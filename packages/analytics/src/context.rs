//! Deadlines and cancellation for engine queries.
//!
//! Each store round-trip is raced against the context's deadline and
//! cancel signal. Losing the race drops the store future, which aborts the
//! underlying query instead of buffering a response nobody will read.

use std::future::Future;
use std::time::Duration;

use disease_map_database::StoreError;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::AnalyticsError;

/// Caller-owned switch that cancels every [`QueryContext`] subscribed to it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Creates a handle in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Cancels all subscribed queries. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether [`Self::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-request limits applied to every store call an operation makes.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl QueryContext {
    /// A context with no deadline and no cancel signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now, or unbounded for
    /// `None`.
    #[must_use]
    pub fn with_optional_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::new, |timeout| Self::new().with_timeout(timeout))
    }

    /// Sets the deadline to `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Subscribes to a cancel handle.
    #[must_use]
    pub fn with_cancel(mut self, handle: &CancelHandle) -> Self {
        self.cancel = Some(handle.tx.subscribe());
        self
    }

    /// The configured deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Runs one store call under this context's deadline and cancel signal.
    ///
    /// # Errors
    ///
    /// * [`AnalyticsError::Cancelled`] if the context is or becomes cancelled
    /// * [`AnalyticsError::StoreUnavailable`] if the deadline passes or the
    ///   store call fails
    pub async fn run<T, F>(&self, operation: &str, store_call: F) -> Result<T, AnalyticsError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if self.is_cancelled() {
            return Err(AnalyticsError::Cancelled);
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, store_call)
                    .await
                    .map_err(|_| {
                        log::warn!("{operation}: deadline exceeded, store query aborted");
                        AnalyticsError::StoreUnavailable {
                            message: format!("{operation} exceeded its deadline"),
                        }
                    })?
                    .map_err(AnalyticsError::from),
                None => store_call.await.map_err(AnalyticsError::from),
            }
        };

        tokio::select! {
            result = bounded => {
                if let Err(e) = &result {
                    log::debug!("{operation} failed: {e}");
                }
                result
            }
            () = wait_cancelled(self.cancel.clone()) => {
                log::debug!("{operation}: cancelled by caller");
                Err(AnalyticsError::Cancelled)
            }
        }
    }
}

/// Resolves once the handle is cancelled; never resolves without a handle
/// or after the handle is dropped uncancelled.
async fn wait_cancelled(rx: Option<watch::Receiver<bool>>) {
    if let Some(mut rx) = rx
        && rx.wait_for(|cancelled| *cancelled).await.is_ok()
    {
        return;
    }
    std::future::pending::<()>().await;
}
