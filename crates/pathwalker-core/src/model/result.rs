/// The aggregate produced by one complete scan.
use serde::{Deserialize, Serialize};

/// Cumulative totals for a whole directory subtree.
///
/// Built privately by the walker and only handed out once the traversal
/// has finished, so a value of this type is never a partial aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Number of non-directory entries that were sized.
    pub file_count: u64,
    /// Sum of the byte lengths of every counted file.
    pub total_size_bytes: u64,
    /// Directories visited, the root included.
    pub dir_count: u64,
    /// Entries skipped because they vanished or could not be read.
    pub skipped_count: u64,
}

impl ScanResult {
    /// Account for one sized file.
    pub(crate) fn add_file(&mut self, size: u64) {
        self.file_count += 1;
        self.total_size_bytes = self.total_size_bytes.saturating_add(size);
    }

    /// Whether any entries were left out of the totals.
    pub fn has_skipped(&self) -> bool {
        self.skipped_count > 0
    }
}
