//! Logger set up
//!
//! Every executable logs through the `log` macros. The logger writes each
//! record to the session's log file and, at a possibly higher level, to the
//! terminal. Records are stamped with the time since the session started so
//! that they line up with the exec clock.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::fmt::Display;
use log::{self, info, Level};
use fern;
use colored::{ColoredString, Colorize};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The file log level must include INFO, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// The log file receives everything at or above `file_level`, the terminal
/// only what is also at or above `stdout_level`.
///
/// # Notes
///
/// - `file_level` must include `Info` so that the session header and match
///   events always reach the log file.
/// - Must only be called once per execution, `log` only accepts one logger.
pub fn logger_init(
    file_level: LevelFilter,
    stdout_level: LevelFilter,
    session: &session::Session
) -> Result<(), LoggerInitError> {

    if file_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(file_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let terminal = fern::Dispatch::new()
        .level(stdout_level.min(file_level))
        .chain(std::io::stdout());

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:10.6} {}] {}",
                session::get_elapsed_seconds(),
                level_to_str(record.level()),
                with_target(record.level(), record.target(), message)
            ))
        })
        .level(file_level)
        .chain(terminal)
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!(
        "    Log level: {:?} (terminal: {:?})",
        file_level, stdout_level.min(file_level)
    );
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Debug and trace records are prefixed with the module they came from.
fn with_target(level: Level, target: &str, message: &dyn Display) -> String {
    match level {
        Level::Debug | Level::Trace => format!("{}: {}", target, message),
        _ => message.to_string()
    }
}

/// Get the string representation of a log level
fn level_to_str(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info  => "INF".normal(),
        Level::Warn  => "WRN".yellow(),
        Level::Error => "ERR".red().bold()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_target_only_below_info() {
        assert_eq!(
            with_target(Level::Debug, "bot_lib::lift_ctrl", &"lift settled"),
            "bot_lib::lift_ctrl: lift settled"
        );
        assert_eq!(
            with_target(Level::Warn, "bot_lib::lift_ctrl", &"lift settled"),
            "lift settled"
        );
    }

    #[test]
    fn test_level_tags() {
        colored::control::set_override(false);
        assert_eq!(level_to_str(Level::Warn).to_string(), "WRN");
        assert_eq!(level_to_str(Level::Error).to_string(), "ERR");
    }
}
