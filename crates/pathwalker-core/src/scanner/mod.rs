/// Scanner module — orchestrates directory scans.
///
/// [`walk`] holds the traversal itself. [`DirectoryScanner`] wraps it with
/// the `Idle → Running → {Completed, Failed}` state machine and can run it
/// either on the caller's thread ([`DirectoryScanner::scan`]) or on a
/// dedicated background thread ([`DirectoryScanner::start`]) that reports
/// through a bounded crossbeam channel.
///
/// The scanner does not serialise overlapping scans. Callers must not
/// start a new scan on the same instance until the previous one reached a
/// terminal state; the GUI does this by disabling its start button.
pub mod progress;
pub mod walk;

pub use progress::{ScanEvent, ScanObserver, ScanProgress, SkippedEntry};
pub use walk::{validate, validate_root};

use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::model::ScanResult;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use progress::ChannelObserver;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Lifecycle of a [`DirectoryScanner`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScannerState {
    #[default]
    Idle,
    Running,
    Completed(ScanResult),
    /// Carries the rendered failure reason.
    Failed(String),
}

impl ScannerState {
    /// Completed or Failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for events from the scan thread.
    pub events_rx: Receiver<ScanEvent>,
    /// Absolute root being scanned.
    pub root: PathBuf,
    cancel_flag: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop at the next file boundary.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the worker thread exits.
    ///
    /// Events already queued stay readable from `events_rx`.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Scanner thread panicked");
            }
        }
    }
}

/// Walks a directory tree and aggregates file count and total size.
#[derive(Debug, Default)]
pub struct DirectoryScanner {
    options: ScanOptions,
    state: Arc<Mutex<ScannerState>>,
}

impl DirectoryScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ScanOptions) -> Self {
        Self {
            options,
            state: Arc::default(),
        }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Snapshot of the current lifecycle state.
    pub fn state(&self) -> ScannerState {
        self.state.lock().clone()
    }

    /// See [`walk::validate`].
    pub fn validate(&self, path: &Path) -> bool {
        validate(path)
    }

    /// Scan `path` on the calling thread.
    ///
    /// Progress is reported to `observer` as files are processed. An invalid
    /// root fails before any callback fires.
    pub fn scan(
        &self,
        path: &Path,
        observer: &mut impl ScanObserver,
    ) -> Result<ScanResult, ScanError> {
        self.scan_with_cancel(path, &AtomicBool::new(false), observer)
    }

    /// [`scan`](Self::scan) with a caller-owned cancellation flag.
    pub fn scan_with_cancel(
        &self,
        path: &Path,
        cancel: &AtomicBool,
        observer: &mut impl ScanObserver,
    ) -> Result<ScanResult, ScanError> {
        let root = match validate_root(path) {
            Ok(root) => root,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };
        self.enter_running();
        let outcome = run_walk(&root, cancel, observer);
        self.finish(&outcome);
        outcome
    }

    /// Validate `path` and start scanning it on a background thread.
    ///
    /// An invalid root is returned as an error here and no thread is
    /// started, so the returned handle always yields exactly one terminal
    /// event.
    pub fn start(&self, path: &Path) -> Result<ScanHandle, ScanError> {
        let root = match validate_root(path) {
            Ok(root) => root,
            Err(err) => {
                warn!("Rejected scan root: {err}");
                self.fail(&err);
                return Err(err);
            }
        };

        let (events_tx, events_rx) =
            crossbeam_channel::bounded::<ScanEvent>(self.options.effective_capacity());
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel_flag.clone();
        let state = self.state.clone();
        let thread_root = root.clone();

        self.enter_running();
        let spawned = thread::Builder::new()
            .name(self.options.thread_name.clone())
            .spawn(move || {
                let started = Instant::now();
                let mut observer = ChannelObserver(events_tx);
                let outcome = run_walk(&thread_root, &cancel_clone, &mut observer);

                // State first, so a consumer that sees the terminal event
                // also sees the terminal state.
                *state.lock() = terminal_state(&outcome);
                let event = match outcome {
                    Ok(result) => ScanEvent::Completed {
                        result,
                        duration: started.elapsed(),
                    },
                    Err(err) => ScanEvent::Failed(err),
                };
                let _ = observer.0.send(event);
            });

        match spawned {
            Ok(thread) => Ok(ScanHandle {
                events_rx,
                root,
                cancel_flag,
                thread: Some(thread),
            }),
            Err(err) => {
                let err = ScanError::Spawn(err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn enter_running(&self) {
        let mut state = self.state.lock();
        if *state == ScannerState::Running {
            warn!("Starting a scan while another scan on this scanner is still running");
        }
        *state = ScannerState::Running;
    }

    fn finish(&self, outcome: &Result<ScanResult, ScanError>) {
        *self.state.lock() = terminal_state(outcome);
    }

    fn fail(&self, err: &ScanError) {
        *self.state.lock() = ScannerState::Failed(err.to_string());
    }
}

fn terminal_state(outcome: &Result<ScanResult, ScanError>) -> ScannerState {
    match outcome {
        Ok(result) => ScannerState::Completed(*result),
        Err(err) => ScannerState::Failed(err.to_string()),
    }
}

/// Walk `root` with logging around it.
fn run_walk(
    root: &Path,
    cancel: &AtomicBool,
    observer: &mut impl ScanObserver,
) -> Result<ScanResult, ScanError> {
    info!("Starting scan of {}", root.display());
    let started = Instant::now();
    let outcome = walk::walk(root, cancel, observer);
    match &outcome {
        Ok(result) => info!(
            "Scan of {} complete: {} files, {} bytes, {} skipped in {:?}",
            root.display(),
            result.file_count,
            result.total_size_bytes,
            result.skipped_count,
            started.elapsed()
        ),
        Err(err) => warn!("Scan of {} failed: {err}", root.display()),
    }
    outcome
}
