//! Torque job types.

use rmjob_core::{Attributes, Status};

/// A raw Torque job record: attribute name → value, with dotted attributes
/// such as `resources_used.walltime` grouped under their prefix.
pub type JobRecord = Attributes;

/// Torque job state, from the single-letter `job_state` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorqueJobState {
    /// Q - Job is queued, eligible to run or be routed
    Queued,
    /// H - Job is held
    Held,
    /// R - Job is running
    Running,
    /// S - Job is suspended
    Suspended,
    /// E - Job is exiting after having run
    Exiting,
    /// C - Job is completed after having run
    Completed,
    /// W - Job is waiting for its execution time
    Waiting,
    /// T - Job is being moved to a new location
    Transit,
    /// Unknown state
    Unknown(String),
}

impl TorqueJobState {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "Q" => TorqueJobState::Queued,
            "H" => TorqueJobState::Held,
            "R" => TorqueJobState::Running,
            "S" => TorqueJobState::Suspended,
            "E" => TorqueJobState::Exiting,
            "C" => TorqueJobState::Completed,
            "W" => TorqueJobState::Waiting,
            "T" => TorqueJobState::Transit,
            other => TorqueJobState::Unknown(other.to_string()),
        }
    }

    /// Canonical status for this state. Only queued, held, running,
    /// suspended and exiting jobs have one; everything else is
    /// undetermined.
    pub fn to_status(&self) -> Status {
        match self {
            TorqueJobState::Queued => Status::Queued,
            TorqueJobState::Held => Status::QueuedHeld,
            TorqueJobState::Running => Status::Running,
            TorqueJobState::Suspended => Status::Suspended,
            // exiting, but still running
            TorqueJobState::Exiting => Status::Running,
            TorqueJobState::Completed
            | TorqueJobState::Waiting
            | TorqueJobState::Transit
            | TorqueJobState::Unknown(_) => Status::Undetermined,
        }
    }
}

/// Map a `job_state` code straight to a canonical status.
pub fn status_from_code(code: &str) -> Status {
    TorqueJobState::from_code(code).to_status()
}
