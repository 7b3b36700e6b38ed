//! Shared parsing utilities for resource manager output.
//!
//! Duration, timestamp and host-list formats used by batch schedulers,
//! plus the command runner their command-line clients are built on.

pub mod command;
pub mod hosts;
pub mod time;

use thiserror::Error;

pub use command::{CommandError, run_command, run_command_with_input};
pub use hosts::{count_slots, parse_exec_host};
pub use time::{
    format_execution_time, format_execution_time_local, format_walltime, parse_batch_timestamp,
    parse_duration_secs,
};

/// A value in resource manager output that does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid duration: {0:?}")]
    Duration(String),
    #[error("invalid host list: {0:?}")]
    HostList(String),
    #[error("invalid timestamp: {0:?}")]
    Timestamp(String),
}

/// Filter helper for optional string fields.
/// Returns None if the string is empty or a placeholder value.
pub fn non_empty_string(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "N/A" {
        None
    } else {
        Some(trimmed.to_string())
    }
}
