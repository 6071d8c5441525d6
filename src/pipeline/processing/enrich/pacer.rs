use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a fixed delay between successive external lookups. This is
/// politeness discipline toward the looked-up sites, not a correctness
/// requirement; the lock serializes callers so the interval holds even if
/// rows were ever processed concurrently.
#[derive(Debug)]
pub struct LookupPacer {
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl LookupPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: Mutex::new(None),
        }
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// call, then record this call as the new reference point.
    pub async fn pace(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
