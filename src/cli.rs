//! Command-line interface definitions.
//!
//! Two subcommands share the scan filters:
//!
//! ```bash
//! # Report duplicates under a directory
//! dupehound scan ~/Downloads
//!
//! # Source-code duplicates, JSON output for scripting
//! dupehound scan src --source --ext rs --output json
//!
//! # Detect and delete, keeping the shortest-named copy per group
//! dupehound clean ~/Downloads --keep shortest --action delete
//!
//! # Move duplicates aside instead of deleting
//! dupehound clean ~/photos --action move --target-dir ~/dup-quarantine
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::report::OutputFormat;
use crate::resolver::KeepPolicy;
use crate::scanner::HashAlgorithm;

/// Duplicate file finder and resolver.
///
/// Groups files by content fingerprint (raw bytes, or comment- and
/// whitespace-normalized source text) and optionally deletes or moves all
/// but one file per group.
#[derive(Debug, Parser)]
#[command(name = "dupehound")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find duplicate files and report them (read-only)
    Scan(ScanArgs),
    /// Find duplicate files and resolve each group down to one survivor
    Clean(CleanArgs),
}

/// Filters shared by scan and clean.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Only consider files with these extensions (repeatable; with or
    /// without a leading dot)
    #[arg(short, long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Directory names to exclude from the walk (repeatable)
    #[arg(long = "exclude-dir", value_name = "NAME")]
    pub exclude_dirs: Vec<String>,

    /// Compare source code by normalized text (comments and whitespace
    /// stripped) instead of raw bytes
    #[arg(long)]
    pub source: bool,

    /// Digest used for fingerprinting
    #[arg(long, value_enum, default_value = "blake3")]
    pub algorithm: HashAlgorithm,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the clean subcommand.
#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Scan filters
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Which file to keep in each duplicate group
    #[arg(long, value_enum, default_value = "longest")]
    pub keep: KeepPolicy,

    /// What to do with the non-kept files
    #[arg(long, value_enum, default_value = "dry-run")]
    pub action: ActionArg,

    /// Directory duplicates are moved into (required by --action move)
    #[arg(long, value_name = "DIR", required_if_eq("action", "move"))]
    pub target_dir: Option<PathBuf>,
}

/// CLI-level resolution action; `move` picks up `--target-dir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Permanently delete duplicates
    Delete,
    /// Move duplicates into --target-dir
    Move,
    /// Report what would be removed without touching anything
    DryRun,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_args_parse() {
        let cli = Cli::try_parse_from([
            "dupehound", "scan", "/tmp", "--ext", "py", "--ext", ".rs", "--exclude-dir",
            "target", "--source", "--output", "json",
        ])
        .unwrap();

        let Commands::Scan(args) = cli.command else {
            panic!("expected scan subcommand");
        };
        assert_eq!(args.path, PathBuf::from("/tmp"));
        assert_eq!(args.extensions, vec!["py", ".rs"]);
        assert_eq!(args.exclude_dirs, vec!["target"]);
        assert!(args.source);
        assert_eq!(args.output, OutputFormat::Json);
        assert_eq!(args.algorithm, HashAlgorithm::Blake3);
    }

    #[test]
    fn test_clean_defaults_to_dry_run() {
        let cli = Cli::try_parse_from(["dupehound", "clean", "/tmp"]).unwrap();
        let Commands::Clean(args) = cli.command else {
            panic!("expected clean subcommand");
        };
        assert_eq!(args.action, ActionArg::DryRun);
        assert_eq!(args.keep, KeepPolicy::LongestName);
        assert!(args.target_dir.is_none());
    }

    #[test]
    fn test_move_requires_target_dir() {
        let result = Cli::try_parse_from(["dupehound", "clean", "/tmp", "--action", "move"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "dupehound", "clean", "/tmp", "--action", "move", "--target-dir", "/tmp/dups",
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["dupehound", "-v", "-q", "scan", "/tmp"]);
        assert!(result.is_err());
    }
}
