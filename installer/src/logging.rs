//! Terminal logging for the installer binary.

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// The log level for a run; `--verbose` adds request-level detail.
#[must_use]
pub const fn level_filter(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install a stderr logger for this crate's records.
///
/// Logging is best-effort: a logger that is already installed is kept.
pub fn init_logging(verbose: bool) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .add_filter_allow_str("contrast_go_installer")
        .build();

    if TermLogger::init(
        level_filter(verbose),
        config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .is_err()
    {
        // A logger is already installed.
    }
}
