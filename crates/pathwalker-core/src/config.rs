/// Scanner configuration.
///
/// There is no configuration file; frontends build a [`ScanOptions`] in code
/// and pass it to [`DirectoryScanner::with_options`](crate::scanner::DirectoryScanner::with_options).

/// Maximum number of events that may queue up in the worker channel.
///
/// The GUI drains the channel once per frame. Every file produces one
/// progress event, so a burst of 4 096 gives the walker plenty of headroom;
/// if the UI falls behind the walker blocks instead of growing the heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Default name of the background scanning thread.
pub const SCANNER_THREAD_NAME: &str = "pathwalker-scanner";

/// Tunables for background scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Capacity of the bounded event channel. Zero is bumped to one.
    pub channel_capacity: usize,
    /// Name given to the worker thread.
    pub thread_name: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            channel_capacity: PROGRESS_CHANNEL_CAPACITY,
            thread_name: SCANNER_THREAD_NAME.to_string(),
        }
    }
}

impl ScanOptions {
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Capacity actually used for the channel; a zero-capacity channel
    /// would make every send a rendezvous with the UI frame loop.
    pub(crate) fn effective_capacity(&self) -> usize {
        self.channel_capacity.max(1)
    }
}
