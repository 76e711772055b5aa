//! dupehound - duplicate file finder and resolver.
//!
//! Scans a directory tree, groups files by content fingerprint (raw bytes
//! or normalized source text), and resolves each duplicate group down to a
//! single survivor by deleting, moving, or just reporting the rest.

pub mod cli;
pub mod error;
pub mod logging;
pub mod report;
pub mod resolver;
pub mod scanner;

use std::path::PathBuf;

use anyhow::Result;

use cli::{ActionArg, CleanArgs, Cli, Commands, ScanArgs};
use error::ExitCode;
use report::Report;
use resolver::{resolve, ResolutionAction, ResolveSummary};
use scanner::{find_duplicates, ScanMode, ScanScope};

/// Run the application logic and map the outcome to an exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Clean(args) => run_clean(args),
    }
}

fn scope_from_args(args: &ScanArgs) -> ScanScope {
    let mut scope = ScanScope::new(&args.path);
    if !args.extensions.is_empty() {
        scope = scope.with_extensions(args.extensions.clone());
    }
    scope.with_exclude_dirs(args.exclude_dirs.clone())
}

fn scan_mode(args: &ScanArgs) -> ScanMode {
    if args.source {
        ScanMode::Source
    } else {
        ScanMode::Raw
    }
}

fn run_scan(args: ScanArgs) -> Result<ExitCode> {
    let scope = scope_from_args(&args);
    let mode = scan_mode(&args);
    let (groups, summary) = find_duplicates(&scope, mode, args.algorithm)?;

    Report {
        root: &args.path,
        mode,
        algorithm: args.algorithm,
        groups: &groups,
        scan: summary,
        resolution: None,
    }
    .write(&mut std::io::stdout().lock(), args.output)?;

    Ok(outcome(groups.is_empty(), summary.files_skipped > 0))
}

fn run_clean(args: CleanArgs) -> Result<ExitCode> {
    let scope = scope_from_args(&args.scan);
    let mode = scan_mode(&args.scan);
    let (groups, summary) = find_duplicates(&scope, mode, args.scan.algorithm)?;

    let action = match args.action {
        ActionArg::Delete => ResolutionAction::Delete,
        ActionArg::DryRun => ResolutionAction::DryRun,
        ActionArg::Move => {
            // clap enforces presence; the library check backs it up
            ResolutionAction::MoveTo(args.target_dir.unwrap_or_else(PathBuf::new))
        }
    };

    let resolution: ResolveSummary = resolve(&groups, args.keep, &action)?;

    Report {
        root: &args.scan.path,
        mode,
        algorithm: args.scan.algorithm,
        groups: &groups,
        scan: summary,
        resolution: Some(&resolution),
    }
    .write(&mut std::io::stdout().lock(), args.scan.output)?;

    Ok(outcome(
        groups.is_empty(),
        summary.files_skipped > 0 || resolution.failures > 0,
    ))
}

fn outcome(no_duplicates: bool, partial: bool) -> ExitCode {
    if no_duplicates {
        ExitCode::NoDuplicates
    } else if partial {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}
