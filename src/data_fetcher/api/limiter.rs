//! Global bound on simultaneous outbound requests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

use crate::error::AppError;

/// Snapshot of limiter activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterStats {
    pub limit: usize,
    pub in_flight: usize,
    pub peak_in_flight: usize,
}

/// Counting limiter shared by every request issued through one client.
///
/// Cloning is cheap; all clones share the same permits and counters.
#[derive(Debug, Clone)]
pub struct RequestLimiter {
    inner: Arc<LimiterInner>,
}

#[derive(Debug)]
struct LimiterInner {
    limit: usize,
    semaphore: Arc<Semaphore>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// Held for the duration of one request; releases its slot on drop,
/// including when the request future is cancelled.
#[derive(Debug)]
pub struct RequestPermit {
    inner: Arc<LimiterInner>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for RequestPermit {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RequestLimiter {
    /// Creates a limiter allowing `limit` simultaneous requests (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            inner: Arc::new(LimiterInner {
                limit,
                semaphore: Arc::new(Semaphore::new(limit)),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    /// Waits for a free slot. Waiters are served in FIFO order.
    pub async fn acquire(&self) -> Result<RequestPermit, AppError> {
        let permit = self
            .inner
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::config_error("Request limiter has been closed"))?;

        let now = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        trace!("Request slot acquired: {}/{}", now, self.inner.limit);

        Ok(RequestPermit {
            inner: self.inner.clone(),
            _permit: permit,
        })
    }

    pub fn limit(&self) -> usize {
        self.inner.limit
    }

    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            limit: self.inner.limit,
            in_flight: self.inner.in_flight.load(Ordering::SeqCst),
            peak_in_flight: self.inner.peak.load(Ordering::SeqCst),
        }
    }
}
