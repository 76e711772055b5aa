//! Logging setup on the `log` facade with an `env_logger` backend.
//!
//! Level selection, in priority order:
//! 1. `RUST_LOG` environment variable, if set
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Default: info

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize logging from the CLI verbosity flags.
///
/// Call once at startup, before any log statements. `env_logger` panics if
/// initialized twice in one process.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    // Compact format: level and message; module path only at -vv.
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 2 {
            writeln!(
                buf,
                "{style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        }
    });

    builder.init();
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
