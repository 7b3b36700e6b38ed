//! Torque/PBS backend for rmjob.
//!
//! [`TorqueAdapter`] implements [`rmjob_core::Adapter`] on top of a
//! [`PbsClient`], by default the `qsub`/`qstat` command-line tools wrapped
//! by [`PbsCli`].

pub mod adapter;
pub mod cli;
pub mod client;
pub mod cluster;
pub mod qstat;
pub mod types;

pub use adapter::{
    TorqueAdapter, depend_expression, info_from_record, render_nodes, submission_envvars,
    submission_headers, submission_resources,
};
pub use cli::PbsCli;
pub use client::{AttrMap, JobRecords, PbsClient, PbsError};
pub use cluster::{Cluster, ClusterError, ResourceMgrServer};
pub use qstat::{QstatError, parse_qstat_full};
pub use types::{JobRecord, TorqueJobState, status_from_code};
