use tracing::info;

use super::enrich::EnrichedPart;

/// Partitions a batch of enriched records into auto-accepted and
/// needs-human-review by confidence threshold. The split is stable,
/// exhaustive, and disjoint; relative order within each side matches the
/// input order.
pub struct ReviewGate {
    threshold: u8,
}

impl ReviewGate {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn partition(&self, records: Vec<EnrichedPart>) -> (Vec<EnrichedPart>, Vec<EnrichedPart>) {
        let total = records.len();
        let (accepted, needs_review): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.confidence() >= self.threshold);

        info!(
            threshold = self.threshold,
            total,
            accepted = accepted.len(),
            needs_review = needs_review.len(),
            "review gate partitioned batch"
        );

        (accepted, needs_review)
    }
}
