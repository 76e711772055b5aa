//! Resolver: pick one survivor per duplicate group and act on the rest.
//!
//! Each group keeps exactly one file, chosen by a [`KeepPolicy`]; every
//! other member gets the configured [`ResolutionAction`]. Per-file failures
//! (vanished file, permission denied) are logged and counted but never abort
//! the run. Only an invalid configuration is fatal, and it is rejected
//! before any file is touched.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use crate::scanner::DuplicateMap;

/// Rule selecting the single survivor of a duplicate group.
///
/// Policies compare file-name length only; ties break to the
/// earliest-discovered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeepPolicy {
    /// Keep the file with the longest name.
    #[default]
    #[value(name = "longest")]
    LongestName,
    /// Keep the file with the shortest name.
    #[value(name = "shortest")]
    ShortestName,
    /// Keep the first file discovered during the scan.
    First,
}

/// What to do with the non-kept members of each group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionAction {
    /// Permanently remove the file.
    Delete,
    /// Move the file into the given directory, creating it if absent.
    MoveTo(PathBuf),
    /// Touch nothing; report what would have been removed.
    DryRun,
}

/// Errors fatal to resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Move was requested without a usable target directory.
    #[error("move action requires a target directory")]
    MissingTarget,

    /// The target directory could not be created.
    #[error("cannot create target directory {path}: {source}")]
    TargetUnavailable {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Outcome for one acted-on file, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveRecord {
    /// File the action applied to.
    pub path: PathBuf,
    /// Survivor of the file's group.
    pub kept: PathBuf,
    /// Where the file was moved, when the action was a move.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to: Option<PathBuf>,
}

/// Totals from one resolution pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveSummary {
    /// Files successfully acted upon (kept files are never counted).
    pub processed: usize,
    /// Files the action failed on (logged and skipped).
    pub failures: usize,
    /// Bytes held by the processed files.
    pub bytes_reclaimed: u64,
    /// One record per processed file.
    pub records: Vec<ResolveRecord>,
}

/// Select the index of the file to keep under `policy`.
///
/// Iteration uses strict comparison, so equal name lengths resolve to the
/// earlier file in discovery order.
///
/// # Panics
///
/// Panics if `files` is empty.
pub fn select_keeper(files: &[PathBuf], policy: KeepPolicy) -> usize {
    match policy {
        KeepPolicy::First => 0,
        KeepPolicy::LongestName | KeepPolicy::ShortestName => {
            let mut best = 0;
            let mut best_len = name_len(&files[0]);
            for (i, path) in files.iter().enumerate().skip(1) {
                let len = name_len(path);
                let better = match policy {
                    KeepPolicy::LongestName => len > best_len,
                    _ => len < best_len,
                };
                if better {
                    best = i;
                    best_len = len;
                }
            }
            best
        }
    }
}

fn name_len(path: &Path) -> usize {
    path.file_name().map_or(0, |n| n.to_string_lossy().chars().count())
}

/// Apply `action` to every non-kept file in every group.
///
/// Groups are visited in the map's insertion order. Returns the totals;
/// `processed` matches `sum(len(group) - 1)` when no per-file action fails.
pub fn resolve(
    groups: &DuplicateMap,
    policy: KeepPolicy,
    action: &ResolutionAction,
) -> Result<ResolveSummary, ResolveError> {
    if let ResolutionAction::MoveTo(target) = action {
        if target.as_os_str().is_empty() {
            return Err(ResolveError::MissingTarget);
        }
        fs::create_dir_all(target).map_err(|e| ResolveError::TargetUnavailable {
            path: target.clone(),
            source: e,
        })?;
    }

    let mut summary = ResolveSummary::default();

    for files in groups.values() {
        if files.len() < 2 {
            continue;
        }
        let keeper = select_keeper(files, policy);
        let kept = &files[keeper];
        log::debug!("Keeping {}", kept.display());

        for (i, path) in files.iter().enumerate() {
            if i == keeper {
                continue;
            }
            let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            match apply_action(path, action) {
                Ok(moved_to) => {
                    summary.processed += 1;
                    summary.bytes_reclaimed += size;
                    summary.records.push(ResolveRecord {
                        path: path.clone(),
                        kept: kept.clone(),
                        moved_to,
                    });
                }
                Err(e) => {
                    log::error!("Failed to resolve {}: {e}", path.display());
                    summary.failures += 1;
                }
            }
        }
    }

    Ok(summary)
}

fn apply_action(
    path: &Path,
    action: &ResolutionAction,
) -> Result<Option<PathBuf>, std::io::Error> {
    match action {
        ResolutionAction::DryRun => {
            log::info!("Would remove: {}", path.display());
            Ok(None)
        }
        ResolutionAction::Delete => {
            log::info!("Removing: {}", path.display());
            fs::remove_file(path)?;
            Ok(None)
        }
        ResolutionAction::MoveTo(target) => {
            let dest = unique_target_path(target, path);
            log::info!("Moving: {} -> {}", path.display(), dest.display());
            // rename fails across filesystems; fall back to copy + remove
            if fs::rename(path, &dest).is_err() {
                fs::copy(path, &dest)?;
                fs::remove_file(path)?;
            }
            Ok(Some(dest))
        }
    }
}

/// Choose a collision-free destination inside `target` for `path`.
///
/// On a name collision the stem gets a `_{n}` suffix before the extension:
/// `report.txt` becomes `report_1.txt`, then `report_2.txt`, and so on.
pub fn unique_target_path(target: &Path, path: &Path) -> PathBuf {
    let name = path.file_name().map(PathBuf::from).unwrap_or_default();
    let mut dest = target.join(&name);
    if !dest.exists() {
        return dest;
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        dest = target.join(format!("{stem}_{counter}{suffix}"));
        if !dest.exists() {
            return dest;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("/x/{n}"))).collect()
    }

    #[test]
    fn test_select_keeper_longest() {
        let files = paths(&["a.txt", "longer_name.txt", "mid.txt"]);
        assert_eq!(select_keeper(&files, KeepPolicy::LongestName), 1);
    }

    #[test]
    fn test_select_keeper_shortest() {
        let files = paths(&["medium.txt", "a.txt", "longer.txt"]);
        assert_eq!(select_keeper(&files, KeepPolicy::ShortestName), 1);
    }

    #[test]
    fn test_select_keeper_first() {
        let files = paths(&["zzz.txt", "a.txt"]);
        assert_eq!(select_keeper(&files, KeepPolicy::First), 0);
    }

    #[test]
    fn test_equal_length_ties_break_to_discovery_order() {
        let files = paths(&["aa.txt", "bb.txt", "cc.txt"]);
        assert_eq!(select_keeper(&files, KeepPolicy::LongestName), 0);
        assert_eq!(select_keeper(&files, KeepPolicy::ShortestName), 0);
    }

    #[test]
    fn test_unique_target_path_no_collision() {
        let dir = tempdir().unwrap();
        let dest = unique_target_path(dir.path(), Path::new("/src/report.txt"));
        assert_eq!(dest, dir.path().join("report.txt"));
    }

    #[test]
    fn test_unique_target_path_appends_counter() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("report.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("report_1.txt"), b"x").unwrap();

        let dest = unique_target_path(dir.path(), Path::new("/src/report.txt"));
        assert_eq!(dest, dir.path().join("report_2.txt"));
    }

    #[test]
    fn test_unique_target_path_extensionless() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("LICENSE"), b"x").unwrap();

        let dest = unique_target_path(dir.path(), Path::new("/src/LICENSE"));
        assert_eq!(dest, dir.path().join("LICENSE_1"));
    }

    #[test]
    fn test_move_with_empty_target_is_invalid() {
        let groups = DuplicateMap::new();
        let err = resolve(
            &groups,
            KeepPolicy::First,
            &ResolutionAction::MoveTo(PathBuf::new()),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::MissingTarget));
    }
}
