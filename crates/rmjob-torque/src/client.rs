//! Boundary with the Torque batch server.

use crate::types::JobRecord;
use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;

/// Attribute name → value maps handed to the batch server on submission.
pub type AttrMap = BTreeMap<String, String>;

/// Raw job records keyed by job id.
pub type JobRecords = BTreeMap<String, JobRecord>;

/// Failures reported by the batch server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PbsError {
    /// The server does not know the job, usually because it already left
    /// the system.
    #[error("Unknown Job Id {0}")]
    UnknownJobId(String),
    /// Any other failure: connectivity, permissions, protocol.
    #[error("{0}")]
    Batch(String),
}

/// Operations a Torque batch server client exposes.
///
/// [`crate::PbsCli`] implements this with the `qsub`/`qstat`/`qhold`/
/// `qrls`/`qdel` commands.
pub trait PbsClient: Send + Sync {
    /// Submit a job script and return the id the server assigned.
    fn submit_string(
        &self,
        body: &str,
        queue: Option<&str>,
        headers: &AttrMap,
        resources: &AttrMap,
        envvars: &AttrMap,
    ) -> impl Future<Output = Result<String, PbsError>> + Send;

    /// Records for job `id` holding only the `filters` attributes.
    fn get_job(
        &self,
        id: &str,
        filters: &[&str],
    ) -> impl Future<Output = Result<JobRecords, PbsError>> + Send;

    /// Full records for job `id`, or for every job when `id` is empty.
    fn get_jobs(&self, id: &str) -> impl Future<Output = Result<JobRecords, PbsError>> + Send;

    fn hold_job(&self, id: &str) -> impl Future<Output = Result<(), PbsError>> + Send;

    fn release_job(&self, id: &str) -> impl Future<Output = Result<(), PbsError>> + Send;

    fn delete_job(&self, id: &str) -> impl Future<Output = Result<(), PbsError>> + Send;
}
