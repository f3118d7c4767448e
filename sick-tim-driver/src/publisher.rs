use crossbeam_utils::atomic::AtomicCell;
use parking_lot::Mutex;
use sick_tim_data::FilteredScan;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Latest-value slot shared between the ingestion thread and its readers.
///
/// Only the most recent scan is kept. Scans published between two calls to
/// [`ScanPublisher::latest`] are never seen by the reader.
#[derive(Debug, Default)]
pub struct ScanPublisher {
    slot: Mutex<Option<Arc<FilteredScan>>>,
    stopped: AtomicCell<bool>,
    published: AtomicU64,
}

impl ScanPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held scan. Returns `false` and drops the scan once a stop
    /// has been requested.
    pub fn publish(&self, scan: FilteredScan) -> bool {
        let scan = Arc::new(scan);
        let mut slot = self.slot.lock();
        if self.stopped.load() {
            return false;
        }
        *slot = Some(scan);
        self.published.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Copy of the most recent scan, `None` until the first publish.
    pub fn latest(&self) -> Option<FilteredScan> {
        let latest = self.slot.lock().clone();
        latest.map(|scan| FilteredScan::clone(&scan))
    }

    /// Shared handle to the most recent scan without copying it.
    pub fn latest_shared(&self) -> Option<Arc<FilteredScan>> {
        self.slot.lock().clone()
    }

    pub fn request_stop(&self) {
        // Taken so that no publish is in flight once this returns.
        let _slot = self.slot.lock();
        self.stopped.store(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load()
    }

    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
