//! Diagnostics on stderr through `env_logger`.

use env_logger::Target;
use log::LevelFilter;
use std::io::Write;

/// Level for the given verbosity flags.
pub const fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    }
}

/// Installs the logger; a second call keeps the first logger.
pub fn init(verbose: bool, quiet: bool) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for(verbose, quiet))
        .target(Target::Stderr)
        .format(|buf, record| {
            let level = record.level().as_str().to_lowercase();
            writeln!(buf, "[{level}] {}", record.args())
        })
        .try_init();
}
