use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Limits the number of upstream requests in flight at once.
///
/// Call [`Throttler::acquire`] before each request and hold the permit until the
/// response has been read. At most `max_concurrent` requests run simultaneously,
/// no matter how many enrichment fan-outs are active. Clones share the same slots.
#[derive(Debug, Clone)]
pub struct Throttler {
    semaphore: Arc<Semaphore>,
}

impl Throttler {
    /// Create a new throttler that allows at most `max_concurrent` requests at a time.
    #[must_use]
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Wait for a concurrency slot.
    ///
    /// The slot is released when the returned permit is dropped. The semaphore is
    /// never closed, so `None` is not expected in practice.
    pub async fn acquire(&self) -> Option<SemaphorePermit<'_>> {
        self.semaphore.acquire().await.ok()
    }
}
