//! Scanner: directory traversal and duplicate grouping.
//!
//! The scanner walks a directory tree (single-threaded, sorted by file name
//! so results are deterministic for a fixed tree), fingerprints every file
//! that passes the scope filters, and groups files by fingerprint in
//! discovery order. Groups with fewer than two members are dropped; what
//! remains is exactly the set of duplicate groups.
//!
//! Unreadable files are logged and skipped; a single bad file never aborts
//! the scan. A missing or non-directory root is fatal.

pub mod hasher;
pub mod normalize;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use walkdir::WalkDir;

pub use hasher::{hash_file, Fingerprint, HashAlgorithm, HashError};
pub use normalize::hash_source;

/// Fingerprint -> files sharing it, in discovery order.
///
/// Insertion order is preserved so group iteration matches the walk order,
/// which keeps reports and resolution reproducible.
pub type DuplicateMap = IndexMap<Fingerprint, Vec<PathBuf>>;

/// How file contents are fingerprinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Hash the raw bytes.
    #[default]
    Raw,
    /// Strip comments and whitespace before hashing (source-code mode).
    Source,
}

/// What to scan and which files to consider.
#[derive(Debug, Clone)]
pub struct ScanScope {
    /// Root directory of the scan.
    pub root: PathBuf,
    /// Extension allow-list. `None` means all files; entries may be given
    /// with or without a leading dot and match case-insensitively.
    pub extensions: Option<Vec<String>>,
    /// Directory names excluded from traversal, matched against every
    /// path component below the root.
    pub exclude_dirs: Vec<String>,
}

impl ScanScope {
    /// Scope covering every file under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: None,
            exclude_dirs: Vec::new(),
        }
    }

    /// Restrict the scan to the given extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Exclude directories by name anywhere below the root.
    #[must_use]
    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    fn extension_allowed(&self, path: &Path) -> bool {
        let Some(allowed) = &self.extensions else {
            return true;
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        allowed
            .iter()
            .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }
}

/// Errors fatal to a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("scan root not found: {0}")]
    RootNotFound(PathBuf),

    /// The scan root exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Totals from one scan pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Files that were fingerprinted.
    pub files_hashed: usize,
    /// Files skipped because they could not be read.
    pub files_skipped: usize,
    /// Duplicate groups (size >= 2) found.
    pub groups: usize,
}

/// Fingerprint one file under the given mode.
pub fn fingerprint(
    path: &Path,
    mode: ScanMode,
    algorithm: HashAlgorithm,
) -> Result<Fingerprint, HashError> {
    match mode {
        ScanMode::Raw => hash_file(path, algorithm),
        ScanMode::Source => hash_source(path, algorithm),
    }
}

/// Walk `scope` and group files by fingerprint.
///
/// Returns only groups of two or more files, keyed by fingerprint in
/// discovery order, along with scan totals. Unreadable files are logged at
/// warn level, counted in `files_skipped`, and left out of the result.
pub fn find_duplicates(
    scope: &ScanScope,
    mode: ScanMode,
    algorithm: HashAlgorithm,
) -> Result<(DuplicateMap, ScanSummary), ScanError> {
    if !scope.root.exists() {
        return Err(ScanError::RootNotFound(scope.root.clone()));
    }
    if !scope.root.is_dir() {
        return Err(ScanError::NotADirectory(scope.root.clone()));
    }

    log::info!(
        "Scanning {} ({:?} mode, {:?})",
        scope.root.display(),
        mode,
        algorithm
    );

    let mut groups: DuplicateMap = IndexMap::new();
    let mut summary = ScanSummary::default();

    let exclude = &scope.exclude_dirs;
    let walker = WalkDir::new(&scope.root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // Prune excluded directories instead of filtering their files
            // one by one; the walk never descends into them.
            if entry.file_type().is_dir() && entry.depth() > 0 {
                let name = entry.file_name().to_string_lossy();
                !exclude.iter().any(|d| d.as_str() == name)
            } else {
                true
            }
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                summary.files_skipped += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !scope.extension_allowed(path) {
            continue;
        }

        match fingerprint(path, mode, algorithm) {
            Ok(fp) => {
                summary.files_hashed += 1;
                groups.entry(fp).or_default().push(path.to_path_buf());
            }
            Err(e) => {
                log::warn!("Could not hash {}: {e}", path.display());
                summary.files_skipped += 1;
            }
        }
    }

    groups.retain(|_, files| files.len() > 1);
    summary.groups = groups.len();

    let duplicate_files: usize = groups.values().map(|g| g.len() - 1).sum();
    log::info!(
        "Found {} group(s) with {} duplicate file(s)",
        summary.groups,
        duplicate_files
    );

    Ok((groups, summary))
}
