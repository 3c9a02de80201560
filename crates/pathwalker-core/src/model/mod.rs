/// Data model for PathWalker scans.
///
/// Re-exports the aggregate result type and the size formatting helpers.
pub mod result;
pub mod size;

pub use result::ScanResult;
