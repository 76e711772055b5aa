//! Process exit codes.

/// Exit codes for the dupehound binary.
///
/// - 0: completed normally, duplicates found (or resolved cleanly)
/// - 1: unexpected failure
/// - 2: completed normally, no duplicates found
/// - 3: completed, but some files were skipped or failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Completed and duplicates were found.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Completed but no duplicates were found.
    NoDuplicates = 2,
    /// Completed with non-fatal skips or per-file failures.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Numeric exit code for `std::process::exit`.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
