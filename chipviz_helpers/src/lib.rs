use chipviz_traits::{ChipError, ChipResult};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::str::FromStr;

/// This is a basic logging setup for a chipviz tool to get you started.
///
/// level: the maximum level printed on the terminal. Skipped input lines are reported
///        at `warn`, per file summaries at `info` and tour statistics at `debug`.
///
/// Diagnostics go to stderr so that exported data on stdout stays clean.
/// Calling it a second time keeps the first logger and returns an error.
pub fn basic_logging_setup(level: LevelFilter) -> ChipResult<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();
    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)
        .map_err(|e| ChipError::Config(format!("Failed to set up logging: {e}")))
}

/// Parses a level name as written in configuration files ("off", "error", ... "trace").
pub fn parse_level(name: &str) -> ChipResult<LevelFilter> {
    LevelFilter::from_str(name.trim())
        .map_err(|_| ChipError::Config(format!("Unknown log level {name:?}")))
}
