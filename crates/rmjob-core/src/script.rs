//! A batch job described before submission.

use crate::native::NativeSpec;
use crate::node::NodeSpec;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Read};
use typed_builder::TypedBuilder;

/// Resource-manager-agnostic description of a job to submit.
///
/// Only `content` is required. An absent field means the attribute is not
/// set on the resource manager at all, which is different from `Some(false)`
/// or an empty value.
///
/// ```
/// use rmjob_core::{NodeRequest, NodeSpec, Script};
///
/// let script = Script::builder()
///     .content("#!/bin/bash\nsrun ./solver")
///     .job_name("solver")
///     .wall_time(3600)
///     .nodes(vec![NodeSpec::from(NodeRequest::new().with_procs(20)); 4])
///     .build();
/// assert_eq!(script.job_name.as_deref(), Some("solver"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TypedBuilder)]
pub struct Script {
    /// Script body executed on the remote host
    #[builder(setter(into))]
    pub content: String,

    /// Arguments supplied to the script
    #[builder(default, setter(strip_option))]
    pub args: Option<Vec<String>>,

    /// Whether the job is held after submission
    #[builder(default, setter(strip_option))]
    pub submit_as_hold: Option<bool>,

    /// Whether the resource manager may restart the job, e.g. after a node
    /// failure
    #[builder(default, setter(strip_option))]
    pub rerunnable: Option<bool>,

    /// Environment variables set on the remote host
    #[builder(default, setter(strip_option))]
    pub job_environment: Option<BTreeMap<String, String>>,

    /// Directory the job is executed from
    #[builder(default, setter(strip_option, into))]
    pub workdir: Option<Utf8PathBuf>,

    /// Addresses notified of status changes
    #[builder(default, setter(strip_option))]
    pub email: Option<Vec<String>>,

    #[builder(default, setter(strip_option))]
    pub email_on_started: Option<bool>,

    #[builder(default, setter(strip_option))]
    pub email_on_terminated: Option<bool>,

    #[builder(default, setter(strip_option, into))]
    pub job_name: Option<String>,

    /// File the job's input stream is read from
    #[builder(default, setter(strip_option, into))]
    pub input_path: Option<Utf8PathBuf>,

    #[builder(default, setter(strip_option, into))]
    pub output_path: Option<Utf8PathBuf>,

    #[builder(default, setter(strip_option, into))]
    pub error_path: Option<Utf8PathBuf>,

    /// Whether the error stream is intermixed with the output stream
    #[builder(default, setter(strip_option))]
    pub join_files: Option<bool>,

    #[builder(default, setter(strip_option, into))]
    pub reservation_id: Option<String>,

    #[builder(default, setter(strip_option, into))]
    pub queue_name: Option<String>,

    /// Scheduling priority
    #[builder(default, setter(strip_option))]
    pub priority: Option<i64>,

    /// Minimum physical memory in kilobytes
    #[builder(default, setter(strip_option))]
    pub min_phys_memory: Option<u64>,

    /// Earliest time the job may become eligible to run
    #[builder(default, setter(strip_option))]
    pub start_time: Option<DateTime<Utc>>,

    /// Maximum real time the job may run, in seconds
    #[builder(default, setter(strip_option))]
    pub wall_time: Option<u64>,

    #[builder(default, setter(strip_option, into))]
    pub accounting_id: Option<String>,

    /// Minimum number of processors for the whole job
    #[builder(default, setter(strip_option))]
    pub min_procs: Option<u32>,

    /// Nodes the job should run on
    #[builder(default, setter(strip_option))]
    pub nodes: Option<Vec<NodeSpec>>,

    /// Resource-manager-specific overrides. Avoid where possible.
    #[builder(default, setter(strip_option))]
    pub native: Option<NativeSpec>,
}

impl Script {
    /// Read a script body from `reader`, e.g. an open file.
    pub fn read_content(mut reader: impl Read) -> io::Result<String> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRequest;
    use chrono::TimeZone;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn full_script(priority: i64) -> Script {
        Script::builder()
            .content("my script")
            .args(vec!["arg1".to_string(), "arg2".to_string()])
            .submit_as_hold(true)
            .rerunnable(false)
            .job_environment(BTreeMap::from([("key".to_string(), "value".to_string())]))
            .workdir("/path/to/workdir")
            .email(vec!["email1".to_string(), "email2".to_string()])
            .email_on_started(true)
            .email_on_terminated(false)
            .job_name("my job")
            .input_path("/path/to/input")
            .output_path("/path/to/output")
            .error_path("/path/to/error")
            .join_files(true)
            .reservation_id("my rsv")
            .queue_name("my queue")
            .priority(priority)
            .min_phys_memory(1234)
            .start_time(Utc.timestamp_opt(1478631234, 0).unwrap())
            .wall_time(94534)
            .accounting_id("my account")
            .min_procs(12)
            .nodes(vec![
                NodeSpec::from("node1"),
                NodeSpec::from(NodeRequest::new().with_procs(12)),
            ])
            .native(NativeSpec::default())
            .build()
    }

    #[test]
    fn test_only_content_required() {
        let script = Script::builder().content("echo hi").build();
        assert_eq!(script.content, "echo hi");
        assert!(script.args.is_none());
        assert!(script.rerunnable.is_none());
        assert!(script.nodes.is_none());
        assert!(script.native.is_none());
    }

    #[test]
    fn test_false_is_not_absent() {
        let absent = Script::builder().content("x").build();
        let falsy = Script::builder().content("x").rerunnable(false).build();
        assert_ne!(absent, falsy);
        assert_eq!(falsy.rerunnable, Some(false));
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(full_script(5000), full_script(5000));
        assert_eq!(hash_of(&full_script(5000)), hash_of(&full_script(5000)));
        assert_ne!(full_script(5000), full_script(1));
    }

    #[test]
    fn test_read_content() {
        let content = Script::read_content("#!/bin/bash\necho hi\n".as_bytes()).unwrap();
        let script = Script::builder().content(content).build();
        assert_eq!(script.content, "#!/bin/bash\necho hi\n");
    }

    #[test]
    fn test_serde_round_trip_preserves_absence() {
        let script = full_script(10);
        let json = serde_json::to_string(&script).unwrap();
        let back: Script = serde_json::from_str(&json).unwrap();
        assert_eq!(back, script);
    }
}
