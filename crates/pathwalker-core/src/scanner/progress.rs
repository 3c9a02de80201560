/// Scan progress reporting — lightweight messages sent from the walker
/// to whoever observes it (a closure for synchronous scans, a crossbeam
/// channel for background ones).
use crate::error::ScanError;
use crate::model::ScanResult;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Progress within the file batch of the directory currently being walked.
///
/// The denominator resets at every directory boundary; this is not a
/// fraction of the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    /// 1-based position of the file just processed within its batch.
    pub processed_count: u64,
    /// Number of files in the batch.
    pub total_in_current_directory: u64,
    /// Directory the batch belongs to.
    pub directory: PathBuf,
}

impl ScanProgress {
    /// True when this event closes its batch.
    pub fn is_batch_complete(&self) -> bool {
        self.processed_count == self.total_in_current_directory
    }

    /// Batch completion as a fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total_in_current_directory == 0 {
            return 1.0;
        }
        self.processed_count as f32 / self.total_in_current_directory as f32
    }
}

/// An entry left out of the totals because it vanished or was unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub message: String,
}

/// Messages sent from the scan thread to the UI.
///
/// Zero or more `Progress`/`Skipped` messages arrive in traversal order,
/// followed by exactly one of `Completed` or `Failed`.
#[derive(Debug)]
pub enum ScanEvent {
    /// One more file of the current batch was processed.
    Progress(ScanProgress),
    /// A non-fatal error (e.g. a file removed between listing and stat).
    Skipped(SkippedEntry),
    /// Scanning completed successfully.
    Completed {
        result: ScanResult,
        duration: Duration,
    },
    /// Scanning ended without a result (I/O failure or cancellation).
    Failed(ScanError),
}

impl ScanEvent {
    /// Whether no further events follow this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed(_))
    }
}

/// Receiver side of the walker's progress contract.
pub trait ScanObserver {
    /// Called once per processed file, in traversal order.
    fn on_progress(&mut self, progress: ScanProgress);

    /// Called for each entry the walker had to skip.
    fn on_skipped(&mut self, _skipped: SkippedEntry) {}
}

impl<F> ScanObserver for F
where
    F: FnMut(ScanProgress),
{
    fn on_progress(&mut self, progress: ScanProgress) {
        self(progress)
    }
}

/// Forwards walker callbacks into the background worker's channel.
pub(crate) struct ChannelObserver(pub(crate) Sender<ScanEvent>);

impl ScanObserver for ChannelObserver {
    fn on_progress(&mut self, progress: ScanProgress) {
        // A dropped receiver just means nobody is watching any more.
        let _ = self.0.send(ScanEvent::Progress(progress));
    }

    fn on_skipped(&mut self, skipped: SkippedEntry) {
        let _ = self.0.send(ScanEvent::Skipped(skipped));
    }
}
