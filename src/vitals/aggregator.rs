use crate::vitals::VitalsSample;
use std::sync::{Mutex, MutexGuard};

/// Process-wide accumulator of vitals samples
///
/// Each field is last-write-wins independently: ingesting a sample that only
/// carries LCP leaves the previously seen CLS in place. Safe to share across
/// threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct VitalsAggregator {
    state: Mutex<VitalsSample>,
}

impl VitalsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the non-null fields of `sample` into the current state
    pub fn ingest(&self, sample: &VitalsSample) {
        let mut state = self.lock();
        *state = state.merged_with(sample);
        tracing::trace!("Ingested vitals sample: {:?}", sample);
    }

    /// Snapshot of the merged state
    pub fn current_vitals(&self) -> VitalsSample {
        *self.lock()
    }

    /// Forgets every measurement
    pub fn reset(&self) {
        *self.lock() = VitalsSample::default();
    }

    // A panic while holding the lock cannot leave a half-written sample,
    // so a poisoned mutex is still safe to read.
    fn lock(&self) -> MutexGuard<'_, VitalsSample> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
