//! Canonical snapshot of a job at query time.

use crate::native::Attributes;
use crate::node::NodeInfo;
use crate::status::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Everything a resource manager reports about one job, in canonical form.
///
/// `id` and `status` are required by the builder; every other field falls
/// back to zero, empty, or absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TypedBuilder)]
pub struct Info {
    /// Job id
    #[builder(setter(into))]
    pub id: String,

    /// Job status
    pub status: Status,

    /// Nodes the job runs on
    #[builder(default)]
    pub allocated_nodes: Vec<NodeInfo>,

    /// Host the job was submitted from
    #[builder(default)]
    pub submit_host: Option<String>,

    /// Owner of the job
    #[builder(default)]
    pub job_owner: Option<String>,

    /// Total processors across allocated nodes
    #[builder(default)]
    pub procs: u32,

    /// Queue the job is in
    #[builder(default)]
    pub queue_name: Option<String>,

    /// Wall clock seconds elapsed
    #[builder(default)]
    pub wallclock_time: u64,

    /// CPU seconds consumed
    #[builder(default)]
    pub cpu_time: u64,

    /// When the job was submitted
    #[builder(default)]
    pub submission_time: Option<DateTime<Utc>>,

    /// When the job started running, absent while it waits
    #[builder(default)]
    pub dispatch_time: Option<DateTime<Utc>>,

    /// Raw record from the resource manager
    #[builder(default)]
    pub native: Option<Attributes>,
}

impl Info {
    /// Minimal record for a job the resource manager no longer knows about.
    pub fn undetermined(id: impl Into<String>) -> Self {
        Info::builder().id(id).status(Status::Undetermined).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn full_info(cpu_time: u64) -> Info {
        Info::builder()
            .id("1234.server")
            .status(Status::Running)
            .allocated_nodes(vec![NodeInfo::new("n1", 12), NodeInfo::new("n2", 6)])
            .submit_host(Some("submit_host123".to_string()))
            .job_owner(Some("bob".to_string()))
            .procs(18)
            .queue_name(Some("queue123".to_string()))
            .wallclock_time(66666)
            .cpu_time(cpu_time)
            .submission_time(Utc.timestamp_opt(44444, 0).single())
            .dispatch_time(Utc.timestamp_opt(55555, 0).single())
            .build()
    }

    #[test]
    fn test_defaults() {
        let info = Info::builder().id("42").status(Status::Queued).build();
        assert!(info.allocated_nodes.is_empty());
        assert_eq!(info.procs, 0);
        assert_eq!(info.wallclock_time, 0);
        assert_eq!(info.cpu_time, 0);
        assert!(info.submit_host.is_none());
        assert!(info.dispatch_time.is_none());
        assert!(info.native.is_none());
    }

    #[test]
    fn test_undetermined() {
        let info = Info::undetermined("job id");
        assert_eq!(info.id, "job id");
        assert_eq!(info.status, Status::Undetermined);
        assert_eq!(info, Info::builder().id("job id").status(Status::Undetermined).build());
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(full_info(9999), full_info(9999));
        assert_eq!(hash_of(&full_info(9999)), hash_of(&full_info(9999)));
        assert_ne!(full_info(9999), full_info(1000));

        let mut queued = full_info(9999);
        queued.status = Status::Queued;
        assert_ne!(queued, full_info(9999));
    }

    #[test]
    fn test_native_participates_in_equality() {
        let mut attrs = Attributes::new();
        attrs.insert_text("job_state", "R");
        let mut with_native = full_info(9999);
        with_native.native = Some(attrs);
        assert_ne!(with_native, full_info(9999));
    }
}
