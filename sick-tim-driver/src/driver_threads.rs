use crate::byte_source::ByteSource;
use crate::constants::WARMUP_POLL_MS;
use crate::error::SickError;
use crate::filter::ScanFilter;
use crate::frame::{FrameEvent, FrameExtractor};
use crate::numeric::to_string;
use crate::publisher::ScanPublisher;
use crate::telegram::decode_telegram;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use crossbeam_utils::atomic::AtomicCell;
use sick_tim_data::FilteredScan;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestionState {
    NotStarted,
    Running,
    Stopped,
}

/// Why the ingestion loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestionEnd {
    StopRequested,
    EndOfStream,
    /// The source closed in the middle of a frame of this many bytes.
    Truncated(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub frames: u64,
    pub published: u64,
    /// Telegrams that are not scan data, or scan data with a device status set.
    pub skipped: u64,
    pub malformed: u64,
    /// Scans that decoded but did not fit the angle window.
    pub rejected: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestionSummary {
    pub stats: IngestionStats,
    pub end: IngestionEnd,
}

#[derive(Clone, Debug)]
pub struct IngestionSettings {
    pub filter: ScanFilter,
    /// Delay before the first frame is read, for the sensor to settle.
    pub warmup: Duration,
}

pub type IngestionResult = Result<IngestionSummary, SickError>;

/// Runs the ingestion loop on the calling thread until a stop is requested or
/// the source ends.
///
/// The stop flag is checked once per frame. A read blocked on the source is
/// not interrupted.
pub fn run_ingestion<S: ByteSource>(
    frames: &mut FrameExtractor<S>,
    publisher: &ScanPublisher,
    state: &AtomicCell<IngestionState>,
    settings: &IngestionSettings,
) -> IngestionResult {
    if warm_up(settings.warmup, publisher) {
        state.store(IngestionState::Running);
        log::info!("Ingestion started");
    }
    let result = ingest(frames, publisher, &settings.filter);
    state.store(IngestionState::Stopped);

    match &result {
        Ok(summary) => log::info!(
            "Ingestion stopped ({:?}): {} frames, {} scans published, {} skipped, {} malformed, {} rejected",
            summary.end,
            summary.stats.frames,
            summary.stats.published,
            summary.stats.skipped,
            summary.stats.malformed,
            summary.stats.rejected
        ),
        Err(e) => log::error!("Ingestion aborted: {e}"),
    }
    result
}

/// Returns `false` if a stop was requested while waiting.
fn warm_up(warmup: Duration, publisher: &ScanPublisher) -> bool {
    let deadline = Instant::now() + warmup;
    loop {
        if publisher.is_stopped() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep((deadline - now).min(Duration::from_millis(WARMUP_POLL_MS)));
    }
}

fn ingest<S: ByteSource>(
    frames: &mut FrameExtractor<S>,
    publisher: &ScanPublisher,
    filter: &ScanFilter,
) -> IngestionResult {
    let mut stats = IngestionStats::default();
    let end = loop {
        if publisher.is_stopped() {
            break IngestionEnd::StopRequested;
        }
        let frame = match frames.next_frame()? {
            FrameEvent::Frame(frame) => frame,
            FrameEvent::EndOfStream => break IngestionEnd::EndOfStream,
            FrameEvent::Truncated(n) => {
                log::warn!("Source closed inside a frame, {n} bytes discarded");
                break IngestionEnd::Truncated(n);
            }
        };
        stats.frames += 1;

        match process_frame(&frame, filter) {
            Ok(Some(scan)) => {
                let len = scan.len();
                if publisher.publish(scan) {
                    stats.published += 1;
                    log::trace!("Published scan of {len} samples");
                }
            }
            Ok(None) => {
                stats.skipped += 1;
                log::debug!("Skipping telegram [{}]", preview(&frame));
            }
            Err(e) if e.is_malformed_telegram() => {
                stats.malformed += 1;
                log::warn!("Dropping malformed telegram [{}]: {e}", preview(&frame));
            }
            Err(e) => {
                stats.rejected += 1;
                log::warn!("Dropping scan: {e}");
            }
        }
    };
    Ok(IngestionSummary { stats, end })
}

fn process_frame(frame: &[u8], filter: &ScanFilter) -> Result<Option<FilteredScan>, SickError> {
    decode_telegram(frame)?
        .map(|record| filter.apply(&record))
        .transpose()
}

fn preview(frame: &[u8]) -> String {
    to_string(&frame[..frame.len().min(24)])
}

/// Handle to the ingestion thread.
///
/// Dropping it requests a stop and joins the thread.
pub struct DriverThread {
    pub(crate) publisher: Arc<ScanPublisher>,
    pub(crate) state: Arc<AtomicCell<IngestionState>>,
    pub(crate) result_rx: Receiver<IngestionResult>,
    pub(crate) unblock: Option<Box<dyn FnOnce() + Send>>,
    pub(crate) thread: Option<JoinHandle<()>>,
}

/// Starts the ingestion loop over `source` on a dedicated thread.
pub fn spawn_ingestion<S: ByteSource + 'static>(
    source: S,
    publisher: Arc<ScanPublisher>,
    settings: IngestionSettings,
) -> Result<DriverThread, SickError> {
    let state = Arc::new(AtomicCell::new(IngestionState::NotStarted));
    let (result_tx, result_rx) = bounded(1);

    let thread_publisher = Arc::clone(&publisher);
    let thread_state = Arc::clone(&state);
    let thread = std::thread::Builder::new()
        .name("sick-ingestion".to_string())
        .spawn(move || {
            let mut frames = FrameExtractor::new(source);
            let result = run_ingestion(&mut frames, &thread_publisher, &thread_state, &settings);
            // Nobody is waiting once the handle is gone.
            let _ = result_tx.send(result);
        })
        .map_err(SickError::ThreadSpawn)?;

    Ok(DriverThread {
        publisher,
        state,
        result_rx,
        unblock: None,
        thread: Some(thread),
    })
}

impl DriverThread {
    pub fn publisher(&self) -> &Arc<ScanPublisher> {
        &self.publisher
    }

    pub fn latest(&self) -> Option<FilteredScan> {
        self.publisher.latest()
    }

    pub fn request_stop(&self) {
        self.publisher.request_stop();
    }

    pub fn state(&self) -> IngestionState {
        self.state.load()
    }

    /// Receives the loop's result once, when the loop returns.
    pub fn result_receiver(&self) -> &Receiver<IngestionResult> {
        &self.result_rx
    }

    /// Waits up to `timeout` for the loop to return.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<IngestionResult> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Called on drop to release a read blocked on the source.
    pub(crate) fn set_unblock(&mut self, unblock: Box<dyn FnOnce() + Send>) {
        self.unblock = Some(unblock);
    }
}

/// Function to join the ingestion thread.
/// This function is automatically called when `driver_thread` is dropped.
pub fn join(driver_thread: &mut DriverThread) {
    driver_thread.publisher.request_stop();
    if let Some(unblock) = driver_thread.unblock.take() {
        unblock();
    }
    if let Some(thread) = driver_thread.thread.take() {
        if thread.join().is_err() {
            log::error!("Ingestion thread panicked");
        }
    }
}

impl Drop for DriverThread {
    fn drop(&mut self) {
        join(self);
    }
}
