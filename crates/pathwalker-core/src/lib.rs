/// PathWalker Core — directory walking, size aggregation, and data model.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`scanner`] — Sequential directory walk with per-batch progress, run
///   inline or on a background thread.
/// - [`model`] — Scan result type and human-readable size formatting.
/// - [`config`] — Scanner tunables.
/// - [`error`] — Errors that end a scan.
pub mod config;
pub mod error;
pub mod model;
pub mod scanner;

pub use config::ScanOptions;
pub use error::{InvalidPathReason, ScanError};
pub use model::ScanResult;
pub use scanner::{DirectoryScanner, ScanEvent, ScanHandle, ScanProgress, ScannerState};
