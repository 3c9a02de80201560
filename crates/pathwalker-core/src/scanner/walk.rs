/// Sequential depth-first directory walker.
///
/// Visits directories in pre-order: a directory's own file batch is sized
/// before any of its subdirectories are entered, and subdirectories are
/// entered in the order the filesystem listed them.
///
/// # Error policy
///
/// - Entries that vanish or cannot be sized between listing and `stat`
///   are skipped and reported through [`ScanObserver::on_skipped`].
/// - A subdirectory that cannot be listed is skipped the same way.
/// - The root failing to list, or disappearing while the walk is in
///   progress, aborts the scan with [`ScanError::Io`].
use crate::error::{InvalidPathReason, ScanError};
use crate::model::ScanResult;
use crate::scanner::progress::{ScanObserver, ScanProgress, SkippedEntry};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Returns `true` only if `path` is an existing directory that can be listed.
///
/// Symlinks are followed; a link to a directory is accepted like the
/// directory itself. Agrees with [`validate_root`] on every path.
pub fn validate(path: &Path) -> bool {
    validate_root(path).is_ok()
}

/// Check that `path` is a listable directory and return its absolute form.
pub fn validate_root(path: &Path) -> Result<PathBuf, ScanError> {
    if path.as_os_str().is_empty() {
        return Err(ScanError::invalid(path, InvalidPathReason::Empty));
    }
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::invalid(path, InvalidPathReason::NotFound));
        }
        Err(_) => return Err(ScanError::invalid(path, InvalidPathReason::Inaccessible)),
    };
    if !meta.is_dir() {
        return Err(ScanError::invalid(path, InvalidPathReason::NotADirectory));
    }
    if fs::read_dir(path).is_err() {
        return Err(ScanError::invalid(path, InvalidPathReason::Inaccessible));
    }
    std::path::absolute(path)
        .map_err(|_| ScanError::invalid(path, InvalidPathReason::Inaccessible))
}

/// Immediate entries of one directory, split into the file batch and the
/// subdirectories still to visit.
#[derive(Default)]
struct Listing {
    files: Vec<PathBuf>,
    subdirs: Vec<PathBuf>,
}

/// Walk an already-validated root and aggregate its files.
///
/// `cancel` is checked between directories and between files.
pub fn walk(
    root: &Path,
    cancel: &AtomicBool,
    observer: &mut impl ScanObserver,
) -> Result<ScanResult, ScanError> {
    let mut result = ScanResult::default();
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        if cancel.load(Ordering::Relaxed) {
            return Err(ScanError::Cancelled);
        }

        let listing = match list_dir(&dir, &mut result, observer) {
            Ok(listing) => listing,
            Err(err) if dir == root => return Err(ScanError::io(&dir, err)),
            Err(err) => {
                if !root.is_dir() {
                    return Err(ScanError::io(root, err));
                }
                result.skipped_count += 1;
                skip(observer, &dir, &err);
                continue;
            }
        };
        result.dir_count += 1;

        let total = listing.files.len() as u64;
        for (index, file) in listing.files.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                return Err(ScanError::Cancelled);
            }

            match fs::metadata(file) {
                Ok(meta) => result.add_file(meta.len()),
                Err(err) => {
                    if !root.is_dir() {
                        return Err(ScanError::io(root, err));
                    }
                    result.skipped_count += 1;
                    skip(observer, file, &err);
                }
            }

            observer.on_progress(ScanProgress {
                processed_count: index as u64 + 1,
                total_in_current_directory: total,
                directory: dir.clone(),
            });
        }

        // Reversed so the first listed subdirectory is popped first.
        pending.extend(listing.subdirs.into_iter().rev());
    }

    // The last batch may have been sized before the root vanished.
    if !root.is_dir() {
        return Err(ScanError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "scan root disappeared"),
        ));
    }
    Ok(result)
}

/// List one directory.
///
/// Only the `read_dir` call itself can fail; per-entry problems are
/// skipped here and recorded in `result`.
fn list_dir(
    dir: &Path,
    result: &mut ScanResult,
    observer: &mut impl ScanObserver,
) -> std::io::Result<Listing> {
    let mut listing = Listing::default();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                result.skipped_count += 1;
                skip(observer, dir, &err);
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(err) => {
                result.skipped_count += 1;
                skip(observer, &path, &err);
                continue;
            }
        };

        if file_type.is_dir() {
            listing.subdirs.push(path);
        } else if file_type.is_symlink() && path.is_dir() {
            // Links to directories are neither counted nor followed.
            debug!("Not following directory symlink {}", path.display());
        } else {
            listing.files.push(path);
        }
    }

    Ok(listing)
}

fn skip(observer: &mut impl ScanObserver, path: &Path, err: &std::io::Error) {
    debug!("Skipping {}: {err}", path.display());
    observer.on_skipped(SkippedEntry {
        path: path.to_path_buf(),
        message: err.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(&vec![0u8; n]).unwrap();
    }

    fn walk_collect(root: &Path) -> (Result<ScanResult, ScanError>, Vec<ScanProgress>) {
        let cancel = AtomicBool::new(false);
        let mut events = Vec::new();
        let result = walk(root, &cancel, &mut |p: ScanProgress| events.push(p));
        (result, events)
    }

    #[test]
    fn validate_accepts_directories_only() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.txt");
        write_bytes(&file, 1);

        assert!(validate(tmp.path()));
        assert!(!validate(&file));
        assert!(!validate(&tmp.path().join("missing")));
        assert!(!validate(Path::new("")));
    }

    #[test]
    fn validate_root_reports_reason() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.txt");
        write_bytes(&file, 1);

        let reason = |p: &Path| match validate_root(p) {
            Err(ScanError::InvalidPath { reason, .. }) => Some(reason),
            _ => None,
        };
        assert_eq!(reason(Path::new("")), Some(InvalidPathReason::Empty));
        assert_eq!(
            reason(&tmp.path().join("missing")),
            Some(InvalidPathReason::NotFound)
        );
        assert_eq!(reason(&file), Some(InvalidPathReason::NotADirectory));
        assert!(validate_root(tmp.path()).unwrap().is_absolute());
    }

    #[test]
    fn walk_counts_nested_files() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("sub");
        fs::create_dir_all(sub.join("deeper")).unwrap();
        write_bytes(&tmp.path().join("a"), 5);
        write_bytes(&sub.join("b"), 7);
        write_bytes(&sub.join("deeper").join("c"), 11);

        let (result, events) = walk_collect(tmp.path());
        let result = result.unwrap();
        assert_eq!(result.file_count, 3);
        assert_eq!(result.total_size_bytes, 23);
        assert_eq!(result.dir_count, 3);
        assert_eq!(result.skipped_count, 0);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn root_batch_is_reported_before_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        write_bytes(&sub.join("inner"), 1);
        write_bytes(&tmp.path().join("outer"), 1);

        let (_, events) = walk_collect(tmp.path());
        assert_eq!(events[0].directory, tmp.path());
        assert_eq!(events[1].directory, sub);
    }

    #[test]
    fn root_removed_during_batch_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        for i in 0..5 {
            write_bytes(&root.join(format!("f{i}")), 10);
        }

        let cancel = AtomicBool::new(false);
        let mut events = 0;
        let result = walk(&root, &cancel, &mut |_: ScanProgress| {
            events += 1;
            if events == 1 {
                fs::remove_dir_all(&root).unwrap();
            }
        });
        assert!(
            matches!(result, Err(ScanError::Io { .. })),
            "partial totals must not be returned, got {result:?}"
        );
    }

    #[test]
    fn root_removed_before_subdirectory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        write_bytes(&root.join("only"), 3);
        write_bytes(&root.join("sub").join("inner"), 4);

        let cancel = AtomicBool::new(false);
        let result = walk(&root, &cancel, &mut |_: ScanProgress| {
            // Fires once, after the root's single file; "sub" is listed next.
            let _ = fs::remove_dir_all(&root);
        });
        assert!(matches!(result, Err(ScanError::Io { .. })));
    }

    #[test]
    fn root_removed_after_last_batch_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("root");
        fs::create_dir(&root).unwrap();
        write_bytes(&root.join("last"), 8);

        let cancel = AtomicBool::new(false);
        let result = walk(&root, &cancel, &mut |_: ScanProgress| {
            let _ = fs::remove_dir_all(&root);
        });
        assert!(matches!(result, Err(ScanError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn unlistable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        write_bytes(&locked.join("hidden"), 50);
        write_bytes(&tmp.path().join("visible"), 5);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list anything; nothing to observe then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let (result, _) = walk_collect(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let result = result.unwrap();
        assert_eq!(result.file_count, 1);
        assert_eq!(result.total_size_bytes, 5);
        assert_eq!(result.skipped_count, 1);
        assert_eq!(result.dir_count, 1);
    }

    #[cfg(unix)]
    #[test]
    fn validate_rejects_unlistable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let listable = fs::read_dir(&locked).is_ok();
        let valid = validate(&locked);
        let root = validate_root(&locked);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(valid, root.is_ok());
        if !listable {
            assert!(!valid);
            assert!(matches!(
                root,
                Err(ScanError::InvalidPath {
                    reason: InvalidPathReason::Inaccessible,
                    ..
                })
            ));
        }
    }

    #[test]
    fn cancelled_walk_returns_no_result() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("a"), 1);

        let cancel = AtomicBool::new(true);
        let result = walk(tmp.path(), &cancel, &mut |_: ScanProgress| {});
        assert!(matches!(result, Err(ScanError::Cancelled)));
    }

    #[test]
    fn unreadable_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");

        let (result, events) = walk_collect(&missing);
        assert!(matches!(result, Err(ScanError::Io { .. })));
        assert!(events.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("real"), 4);
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), tmp.path().join("dangling"))
            .unwrap();

        let cancel = AtomicBool::new(false);
        let mut skipped = Vec::new();
        struct Collect<'a>(&'a mut Vec<SkippedEntry>);
        impl ScanObserver for Collect<'_> {
            fn on_progress(&mut self, _progress: ScanProgress) {}
            fn on_skipped(&mut self, skipped: SkippedEntry) {
                self.0.push(skipped);
            }
        }

        let result = walk(tmp.path(), &cancel, &mut Collect(&mut skipped)).unwrap();
        assert_eq!(result.file_count, 1);
        assert_eq!(result.total_size_bytes, 4);
        assert_eq!(result.skipped_count, 1);
        assert_eq!(skipped.len(), 1);
        assert!(skipped[0].path.ends_with("dangling"));
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlink_is_not_followed() {
        let tmp = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write_bytes(&target.path().join("elsewhere"), 100);
        write_bytes(&tmp.path().join("here"), 1);
        std::os::unix::fs::symlink(target.path(), tmp.path().join("link")).unwrap();

        let (result, _) = walk_collect(tmp.path());
        let result = result.unwrap();
        assert_eq!(result.file_count, 1);
        assert_eq!(result.total_size_bytes, 1);
    }
}
