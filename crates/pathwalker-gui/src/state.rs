/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes.
/// The scan thread communicates via a channel; state updates happen
/// in `process_scan_messages()` which runs once per frame.
use chrono::{DateTime, Local};
use crossbeam_channel::TryRecvError;
use pathwalker_core::model::size::format_size;
use pathwalker_core::scanner::ScanEvent;
use pathwalker_core::{DirectoryScanner, InvalidPathReason, ScanError, ScanHandle, ScanResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Idle — no scan has run yet, or the last one was rejected.
    Idle,
    /// Scanning — start button disabled, progress bar live.
    Scanning,
    /// The last scan reached a terminal state; its record is in the log.
    Done,
}

/// Maximum number of scan events drained from the channel per frame.
///
/// Every file produces one event, so a large directory can queue thousands
/// between frames. The cap keeps a backlog from stalling the render thread.
const MAX_MESSAGES_PER_FRAME: usize = 2_000;

/// Maximum lines kept in the on-screen log; the oldest are dropped first.
pub const MAX_LOG_LINES: usize = 1_000;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// All application state.
pub struct AppState {
    // ── Input ──────────────────────────────────────────
    /// Text of the path field.
    pub path_input: String,

    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    pub scanner: DirectoryScanner,
    pub scan_handle: Option<ScanHandle>,
    /// Root of the running (or last) scan.
    pub scan_root: Option<PathBuf>,
    /// Files processed so far in the running scan, skipped ones included.
    pub scan_entries_processed: u64,
    pub scan_skipped: u64,
    /// Position within the current directory's batch.
    pub batch_processed: u64,
    pub batch_total: u64,
    pub current_dir: String,

    // ── Results ────────────────────────────────────────
    pub last_result: Option<ScanResult>,
    pub last_duration: Option<Duration>,
    pub log: Vec<String>,

    // ── Theme ──────────────────────────────────────────
    /// `true` = dark mode (default), `false` = light mode.
    pub dark_mode: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create initial application state.
    pub fn new() -> Self {
        Self {
            path_input: String::new(),
            phase: AppPhase::Idle,
            scanner: DirectoryScanner::new(),
            scan_handle: None,
            scan_root: None,
            scan_entries_processed: 0,
            scan_skipped: 0,
            batch_processed: 0,
            batch_total: 0,
            current_dir: String::new(),
            last_result: None,
            last_duration: None,
            log: Vec::new(),
            dark_mode: true,
        }
    }

    /// Whether the start button should be enabled.
    ///
    /// The scanner does not guard against overlapping scans, so the UI must
    /// keep the trigger disabled while one is in flight.
    pub fn can_start(&self) -> bool {
        self.phase != AppPhase::Scanning
    }

    /// Start scanning the path currently in the input field.
    pub fn start_scan(&mut self) {
        if !self.can_start() {
            return;
        }
        let path = PathBuf::from(self.path_input.trim());
        self.reset_progress();

        match self.scanner.start(&path) {
            Ok(handle) => {
                tracing::info!("Scan started for {}", handle.root.display());
                self.scan_root = Some(handle.root.clone());
                self.scan_handle = Some(handle);
                self.last_result = None;
                self.last_duration = None;
                self.phase = AppPhase::Scanning;
            }
            Err(err) => {
                // Trigger stays enabled; nothing is shown in the progress bar.
                self.scan_root = None;
                self.phase = AppPhase::Idle;
                self.push_log(failure_record(&path, &err, Local::now()));
            }
        }
    }

    /// Ask the running scan to stop.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Process pending scan messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        let mut repaint = false;
        let mut messages_this_frame = 0usize;

        while messages_this_frame < MAX_MESSAGES_PER_FRAME {
            let msg = match self.scan_handle.as_ref().map(|h| h.events_rx.try_recv()) {
                Some(Ok(m)) => m,
                Some(Err(TryRecvError::Disconnected)) => {
                    // Worker gone without a terminal event (it panicked).
                    tracing::warn!("Scanner channel closed before the scan finished");
                    let root = self.scan_root.clone().unwrap_or_default();
                    self.push_log(format!(
                        "[{}] {}: ошибка: сканирование прервано",
                        Local::now().format(TIMESTAMP_FORMAT),
                        root.display()
                    ));
                    self.finish_scan();
                    return true;
                }
                _ => break,
            };
            messages_this_frame += 1;
            repaint = true;

            match msg {
                ScanEvent::Progress(progress) => {
                    self.scan_entries_processed += 1;
                    self.batch_processed = progress.processed_count;
                    self.batch_total = progress.total_in_current_directory;
                    self.current_dir = progress.directory.to_string_lossy().into_owned();
                }
                ScanEvent::Skipped(skipped) => {
                    self.scan_skipped += 1;
                    tracing::debug!("Skipped {}: {}", skipped.path.display(), skipped.message);
                }
                ScanEvent::Completed { result, duration } => {
                    let root = self.scan_root.clone().unwrap_or_default();
                    self.push_log(summary_record(&root, &result, Local::now()));
                    self.last_result = Some(result);
                    self.last_duration = Some(duration);
                    self.finish_scan();
                    return true;
                }
                ScanEvent::Failed(err) => {
                    let root = self.scan_root.clone().unwrap_or_default();
                    self.push_log(failure_record(&root, &err, Local::now()));
                    self.finish_scan();
                    return true;
                }
            }
        }

        repaint
    }

    /// Fraction of the current directory batch already processed.
    pub fn batch_fraction(&self) -> f32 {
        if self.batch_total == 0 {
            return 0.0;
        }
        self.batch_processed as f32 / self.batch_total as f32
    }

    /// Text of the file-count label.
    pub fn count_label(&self) -> String {
        match self.last_result {
            Some(result) => format!("Количество файлов: {}", result.file_count),
            None => "Количество файлов: —".to_string(),
        }
    }

    /// Text of the total-size label.
    pub fn size_label(&self) -> String {
        match self.last_result {
            Some(result) => format!("Общий размер: {}", format_size(result.total_size_bytes)),
            None => "Общий размер: —".to_string(),
        }
    }

    fn reset_progress(&mut self) {
        self.scan_entries_processed = 0;
        self.scan_skipped = 0;
        self.batch_processed = 0;
        self.batch_total = 0;
        self.current_dir.clear();
    }

    fn finish_scan(&mut self) {
        if let Some(handle) = self.scan_handle.take() {
            handle.join();
        }
        self.phase = AppPhase::Done;
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() >= MAX_LOG_LINES {
            self.log.remove(0);
        }
        self.log.push(line);
    }
}

/// Log record appended after a successful scan.
pub fn summary_record(root: &Path, result: &ScanResult, at: DateTime<Local>) -> String {
    let mut line = format!(
        "[{}] {}: файлов {}, размер {}",
        at.format(TIMESTAMP_FORMAT),
        root.display(),
        result.file_count,
        format_size(result.total_size_bytes)
    );
    if result.has_skipped() {
        line.push_str(&format!(" (пропущено {})", result.skipped_count));
    }
    line
}

/// Log record appended when a scan is rejected or fails.
pub fn failure_record(root: &Path, err: &ScanError, at: DateTime<Local>) -> String {
    format!(
        "[{}] {}: ошибка: {}",
        at.format(TIMESTAMP_FORMAT),
        root.display(),
        describe_error(err)
    )
}

/// User-facing text for a scan error. The path is already in the record.
fn describe_error(err: &ScanError) -> String {
    match err {
        ScanError::InvalidPath { reason, .. } => match reason {
            InvalidPathReason::Empty => "путь не указан".to_string(),
            InvalidPathReason::NotFound => "путь не существует".to_string(),
            InvalidPathReason::NotADirectory => "путь не является каталогом".to_string(),
            InvalidPathReason::Inaccessible => "каталог недоступен для чтения".to_string(),
        },
        ScanError::Io { source, .. } => format!("ошибка ввода-вывода ({source})"),
        ScanError::Cancelled => "сканирование отменено".to_string(),
        ScanError::Spawn(_) => "не удалось запустить поток сканирования".to_string(),
    }
}

/// Path to pre-fill from the command line: the first argument after the
/// program name, if it is not blank.
pub fn initial_path_from_args<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().nth(1).filter(|arg| !arg.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn summary_record_formats_size() {
        let result = ScanResult {
            file_count: 3,
            total_size_bytes: 2048,
            dir_count: 1,
            skipped_count: 0,
        };
        let line = summary_record(Path::new("/data"), &result, fixed_time());
        assert_eq!(line, "[2024-03-09 14:05:07] /data: файлов 3, размер 2.0 КБ");
    }

    #[test]
    fn summary_record_mentions_skipped() {
        let result = ScanResult {
            file_count: 1,
            total_size_bytes: 500,
            dir_count: 1,
            skipped_count: 2,
        };
        let line = summary_record(Path::new("/data"), &result, fixed_time());
        assert!(line.ends_with("размер 500 Б (пропущено 2)"));
    }

    #[test]
    fn failure_record_includes_reason() {
        let err = ScanError::InvalidPath {
            path: PathBuf::from("/nope"),
            reason: InvalidPathReason::NotFound,
        };
        let line = failure_record(Path::new("/nope"), &err, fixed_time());
        assert_eq!(line, "[2024-03-09 14:05:07] /nope: ошибка: путь не существует");
    }

    #[test]
    fn failure_record_is_localised_for_every_error() {
        let io = ScanError::Io {
            path: PathBuf::from("/data"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let line = failure_record(Path::new("/data"), &io, fixed_time());
        assert!(line.ends_with("ошибка: ошибка ввода-вывода (gone)"));

        let line = failure_record(Path::new("/data"), &ScanError::Cancelled, fixed_time());
        assert!(line.ends_with("ошибка: сканирование отменено"));

        let empty = ScanError::InvalidPath {
            path: PathBuf::new(),
            reason: InvalidPathReason::Empty,
        };
        let line = failure_record(Path::new(""), &empty, fixed_time());
        assert!(line.ends_with("ошибка: путь не указан"));
        assert!(!line.contains("Invalid path"));
    }

    #[test]
    fn initial_path_takes_first_argument() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            initial_path_from_args(args(&["PathWalker", "/data", "extra"])),
            Some("/data".to_string())
        );
        assert_eq!(initial_path_from_args(args(&["PathWalker"])), None);
        assert_eq!(initial_path_from_args(args(&["PathWalker", "  "])), None);
    }

    #[test]
    fn labels_before_any_scan() {
        let state = AppState::new();
        assert_eq!(state.count_label(), "Количество файлов: —");
        assert_eq!(state.size_label(), "Общий размер: —");
        assert_eq!(state.batch_fraction(), 0.0);
    }

    #[test]
    fn log_is_capped() {
        let mut state = AppState::new();
        for i in 0..MAX_LOG_LINES + 5 {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.log.len(), MAX_LOG_LINES);
        assert_eq!(state.log[0], "line 5");
    }
}
