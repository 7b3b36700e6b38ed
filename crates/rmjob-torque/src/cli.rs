//! Talk to a Torque batch server through its command-line client.

use crate::client::{AttrMap, JobRecords, PbsClient, PbsError};
use crate::cluster::Cluster;
use crate::qstat::parse_qstat_full;
use camino::Utf8PathBuf;
use rmjob_parsers::{CommandError, non_empty_string, run_command, run_command_with_input};
use tokio::process::Command;

/// Exit status of a Torque client for PBSE_UNKJOBID (15001).
const UNKNOWN_JOB_EXIT: i32 = 15001 % 256;

/// Headers that have a dedicated qsub flag.
const HEADER_FLAGS: &[(&str, &str)] = &[
    ("Job_Name", "-N"),
    ("Rerunable", "-r"),
    ("init_work_dir", "-d"),
    ("Mail_Users", "-M"),
    ("Mail_Points", "-m"),
    ("Output_Path", "-o"),
    ("Error_Path", "-e"),
    ("Join_Path", "-j"),
    ("Priority", "-p"),
    ("Execution_Time", "-a"),
    ("Account_Name", "-A"),
    ("job_arguments", "-F"),
];

/// Torque client built on `qsub`, `qstat`, `qhold`, `qrls` and `qdel`.
#[derive(Debug, Clone, Default)]
pub struct PbsCli {
    /// Directory holding the commands; `PATH` is searched when unset
    bin: Option<Utf8PathBuf>,
    /// Batch server to talk to; the client default when unset
    host: Option<String>,
}

impl PbsCli {
    pub fn new(host: Option<String>, bin: Option<Utf8PathBuf>) -> Self {
        Self { bin, host }
    }

    pub fn from_cluster(cluster: &Cluster) -> Self {
        let server = &cluster.resource_mgr_server;
        Self::new(non_empty_string(&server.host), server.bin.clone())
    }

    fn command(&self, program: &str) -> Command {
        let program = match &self.bin {
            Some(bin) => bin.join(program).into_string(),
            None => program.to_string(),
        };
        let mut cmd = Command::new(program);
        if let Some(host) = &self.host {
            cmd.env("PBS_DEFAULT", host);
        }
        cmd
    }

    /// Build the qsub argument list for a submission.
    pub fn qsub_args(
        queue: Option<&str>,
        headers: &AttrMap,
        resources: &AttrMap,
        envvars: &AttrMap,
    ) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(queue) = queue {
            args.extend(["-q".to_string(), queue.to_string()]);
        }

        for (name, value) in headers {
            if let Some((_, flag)) = HEADER_FLAGS.iter().find(|(header, _)| header == name) {
                args.extend([flag.to_string(), value.clone()]);
                continue;
            }
            match name.as_str() {
                "Hold_Types" if value == "u" => args.push("-h".to_string()),
                "reservation_id" => {
                    args.extend(["-W".to_string(), format!("x=advres:{}", value)]);
                }
                _ => args.extend(["-W".to_string(), format!("{}={}", name, value)]),
            }
        }

        for (name, value) in resources {
            args.extend(["-l".to_string(), format!("{}={}", name, value)]);
        }

        if !envvars.is_empty() {
            let vars: Vec<String> = envvars
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            args.extend(["-v".to_string(), vars.join(",")]);
        }

        args
    }

    async fn control(&self, program: &str, id: &str) -> Result<(), PbsError> {
        let mut cmd = self.command(program);
        cmd.arg(id);
        run_command(&mut cmd, program)
            .await
            .map(|_| ())
            .map_err(|e| classify(e, id))
    }
}

/// Tell an unknown job id apart from every other command failure.
fn classify(err: CommandError, id: &str) -> PbsError {
    let unknown = match &err {
        CommandError::Failed { code, stderr, .. } => {
            *code == Some(UNKNOWN_JOB_EXIT) || stderr.to_lowercase().contains("unknown job id")
        }
        CommandError::Execution { .. } => false,
    };
    if unknown {
        PbsError::UnknownJobId(id.to_string())
    } else {
        PbsError::Batch(err.to_string())
    }
}

impl PbsClient for PbsCli {
    async fn submit_string(
        &self,
        body: &str,
        queue: Option<&str>,
        headers: &AttrMap,
        resources: &AttrMap,
        envvars: &AttrMap,
    ) -> Result<String, PbsError> {
        let mut cmd = self.command("qsub");
        cmd.args(Self::qsub_args(queue, headers, resources, envvars));

        let stdout = run_command_with_input(&mut cmd, "qsub", body)
            .await
            .map_err(|e| PbsError::Batch(e.to_string()))?;

        non_empty_string(&stdout)
            .ok_or_else(|| PbsError::Batch("qsub did not report a job id".to_string()))
    }

    async fn get_job(&self, id: &str, filters: &[&str]) -> Result<JobRecords, PbsError> {
        let mut jobs = self.get_jobs(id).await?;
        for record in jobs.values_mut() {
            record.retain_names(filters);
        }
        Ok(jobs)
    }

    async fn get_jobs(&self, id: &str) -> Result<JobRecords, PbsError> {
        let mut cmd = self.command("qstat");
        cmd.args(["-f", "-1"]);
        if !id.is_empty() {
            cmd.arg(id);
        }

        let stdout = run_command(&mut cmd, "qstat")
            .await
            .map_err(|e| classify(e, id))?;

        parse_qstat_full(&stdout).map_err(|e| PbsError::Batch(e.to_string()))
    }

    async fn hold_job(&self, id: &str) -> Result<(), PbsError> {
        self.control("qhold", id).await
    }

    async fn release_job(&self, id: &str) -> Result<(), PbsError> {
        self.control("qrls", id).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), PbsError> {
        self.control("qdel", id).await
    }
}
