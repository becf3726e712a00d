use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Tallies from a single intake run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSummary {
    /// Orders returned by the source
    pub received: usize,
    /// New records written
    pub inserted: usize,
    /// Orders that already had a record
    pub duplicates: usize,
    /// Cancelled orders, skipped
    pub cancelled: usize,
    /// Orders that could not be recorded this run
    pub failed: usize,
}

impl Display for IntakeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} received, {} inserted, {} duplicates, {} cancelled, {} failed",
            self.received, self.inserted, self.duplicates, self.cancelled, self.failed
        )
    }
}

/// Tallies from dispatching a single batch of change feed entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    /// Notifications the sink accepted
    pub notified: usize,
    /// Notifications the sink rejected or that could not be sent
    pub failed: usize,
    /// Entries that were not creations
    pub ignored: usize,
    /// Creation entries whose record already carried a flag (i.e. redeliveries)
    pub already_handled: usize,
    /// Entries that could not be processed, plus outcomes that could not be written back
    pub errors: usize,
}

impl DispatchSummary {
    /// The number of notification attempts made for the batch
    pub fn attempts(&self) -> usize {
        self.notified + self.failed
    }
}

impl Display for DispatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} notified, {} failed, {} ignored, {} already handled, {} errors",
            self.notified, self.failed, self.ignored, self.already_handled, self.errors
        )
    }
}
