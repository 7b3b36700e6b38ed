//! Canonical job status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a status is built from a token outside [`Status::ALL`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("this is not a valid state: {0}")]
pub struct InvalidState(pub String);

/// The state a submitted job is in, independent of any resource manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Job status cannot be determined
    Undetermined,
    /// Job is queued for being scheduled and executed
    Queued,
    /// Job has been placed on hold by the system, an administrator, or the
    /// submitting user
    QueuedHeld,
    /// Job is running on an execution host
    Running,
    /// Job has been suspended by the user, the system, or an administrator
    Suspended,
    /// Job was re-queued by the resource manager and is eligible to run
    Requeued,
    /// Job was re-queued by the resource manager and is currently held
    RequeuedHeld,
    /// Job has finished
    Completed,
}

impl Status {
    /// Every state, in declaration order.
    pub const ALL: [Status; 8] = [
        Status::Undetermined,
        Status::Queued,
        Status::QueuedHeld,
        Status::Running,
        Status::Suspended,
        Status::Requeued,
        Status::RequeuedHeld,
        Status::Completed,
    ];

    /// The token this state is parsed from and displayed as.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Undetermined => "undetermined",
            Status::Queued => "queued",
            Status::QueuedHeld => "queued_held",
            Status::Running => "running",
            Status::Suspended => "suspended",
            Status::Requeued => "requeued",
            Status::RequeuedHeld => "requeued_held",
            Status::Completed => "completed",
        }
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, Status::Undetermined)
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Status::Queued)
    }

    pub fn is_queued_held(&self) -> bool {
        matches!(self, Status::QueuedHeld)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Status::Running)
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, Status::Suspended)
    }

    pub fn is_requeued(&self) -> bool {
        matches!(self, Status::Requeued)
    }

    pub fn is_requeued_held(&self) -> bool {
        matches!(self, Status::RequeuedHeld)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = InvalidState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| InvalidState(s.to_string()))
    }
}

impl TryFrom<&str> for Status {
    type Error = InvalidState;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}
