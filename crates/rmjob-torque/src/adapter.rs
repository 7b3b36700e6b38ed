//! Torque adapter: translates the canonical job model to and from the
//! attributes a Torque batch server understands.

use crate::cli::PbsCli;
use crate::client::{AttrMap, PbsClient, PbsError};
use crate::cluster::Cluster;
use crate::types::{JobRecord, status_from_code};
use chrono::{DateTime, Utc};
use rmjob_core::{
    Adapter, AdapterError, Dependencies, Info, InfoResult, NodeInfo, NodeSpec, Script, Status,
    count_by_identity,
};
use rmjob_parsers::{
    ParseError, format_execution_time_local, format_walltime, parse_batch_timestamp,
    parse_duration_secs, parse_exec_host,
};

impl From<PbsError> for AdapterError {
    fn from(err: PbsError) -> Self {
        AdapterError::Backend(err.to_string())
    }
}

fn parse_error(err: ParseError) -> AdapterError {
    AdapterError::Parse(err.to_string())
}

/// Adapter for a Torque resource manager.
#[derive(Debug, Clone)]
pub struct TorqueAdapter<C = PbsCli> {
    cluster: Cluster,
    client: C,
}

impl TorqueAdapter<PbsCli> {
    /// Adapter talking to the cluster's batch server through its
    /// command-line client.
    pub fn new(cluster: Cluster) -> Self {
        let client = PbsCli::from_cluster(&cluster);
        Self { cluster, client }
    }
}

impl<C: PbsClient> TorqueAdapter<C> {
    pub fn with_client(cluster: Cluster, client: C) -> Self {
        Self { cluster, client }
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

/// Render a dependency expression such as `after:1:2,afterok:3`, or `None`
/// when there are no dependencies.
pub fn depend_expression(deps: &Dependencies) -> Option<String> {
    let fragments: Vec<String> = [
        ("after", &deps.after),
        ("afterok", &deps.afterok),
        ("afternotok", &deps.afternotok),
        ("afterany", &deps.afterany),
    ]
    .into_iter()
    .filter(|(_, ids)| !ids.is_empty())
    .map(|(tag, ids)| format!("{}:{}", tag, ids.join(":")))
    .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(","))
    }
}

/// Job attributes for a submission.
pub fn submission_headers(script: &Script, deps: &Dependencies) -> AttrMap {
    let mut headers = AttrMap::new();
    let mut set = |name: &str, value: String| {
        headers.insert(name.to_string(), value);
    };

    if let Some(args) = &script.args {
        set("job_arguments", args.join(" "));
    }
    if script.submit_as_hold == Some(true) {
        set("Hold_Types", "u".to_string());
    }
    if let Some(rerunnable) = script.rerunnable {
        set("Rerunable", if rerunnable { "y" } else { "n" }.to_string());
    }
    if let Some(workdir) = &script.workdir {
        set("init_work_dir", workdir.to_string());
    }
    if let Some(email) = script.email.as_ref().filter(|email| !email.is_empty()) {
        set("Mail_Users", email.join(","));
    }

    let mut mail_points = String::new();
    if script.email_on_started == Some(true) {
        mail_points.push('b');
    }
    if script.email_on_terminated == Some(true) {
        mail_points.push('e');
    }
    if !mail_points.is_empty() {
        set("Mail_Points", mail_points);
    }

    if let Some(name) = &script.job_name {
        set("Job_Name", name.clone());
    }
    // input_path has no Torque attribute
    if let Some(path) = &script.output_path {
        set("Output_Path", path.to_string());
    }
    if let Some(path) = &script.error_path {
        set("Error_Path", path.to_string());
    }
    if script.join_files == Some(true) {
        set("Join_Path", "oe".to_string());
    }
    if let Some(id) = &script.reservation_id {
        set("reservation_id", id.clone());
    }
    if let Some(priority) = script.priority {
        set("Priority", priority.to_string());
    }
    if let Some(start) = &script.start_time {
        set("Execution_Time", format_execution_time_local(start));
    }
    if let Some(account) = &script.accounting_id {
        set("Account_Name", account.clone());
    }
    if let Some(depend) = depend_expression(deps) {
        set("depend", depend);
    }

    headers
}

/// Render one node group of a `nodes` resource.
fn render_node_group(node: &NodeSpec, count: usize) -> String {
    match node {
        NodeSpec::Named(name) => name.clone(),
        NodeSpec::Request(request) => {
            let mut rendered = count.to_string();
            if let Some(procs) = request.procs {
                rendered.push_str(&format!(":ppn={}", procs));
            }
            for property in request.properties.iter().flatten() {
                rendered.push(':');
                rendered.push_str(property);
            }
            rendered
        }
    }
}

/// Render a node list as a `nodes` resource, collapsing repeated entries:
/// `["n1", 4 × {ppn=12}]` gives `n1+4:ppn=12`.
pub fn render_nodes(nodes: &[NodeSpec]) -> String {
    count_by_identity(nodes)
        .into_iter()
        .map(|(node, count)| render_node_group(node, count))
        .collect::<Vec<_>>()
        .join("+")
}

/// Resource requests for a submission.
pub fn submission_resources(script: &Script) -> AttrMap {
    let mut resources = AttrMap::new();

    if let Some(mem) = script.min_phys_memory {
        resources.insert("mem".to_string(), format!("{}KB", mem));
    }
    if let Some(wall_time) = script.wall_time {
        resources.insert("walltime".to_string(), format_walltime(wall_time));
    }
    if let Some(nodes) = script.nodes.as_ref().filter(|nodes| !nodes.is_empty()) {
        resources.insert("nodes".to_string(), render_nodes(nodes));
    }

    resources
}

/// Environment variables for a submission.
pub fn submission_envvars(script: &Script) -> AttrMap {
    script.job_environment.clone().unwrap_or_default()
}

/// Everything handed to `qsub` besides the body and queue, with native
/// overrides applied.
fn submission_params(script: &Script, deps: &Dependencies) -> (AttrMap, AttrMap, AttrMap) {
    let mut headers = submission_headers(script, deps);
    let mut resources = submission_resources(script);
    let mut envvars = submission_envvars(script);

    if let Some(native) = &script.native {
        headers.extend(native.headers.clone().unwrap_or_default());
        resources.extend(native.resources.clone().unwrap_or_default());
        envvars.extend(native.envvars.clone().unwrap_or_default());
    }

    (headers, resources, envvars)
}

fn optional_timestamp(
    record: &JobRecord,
    name: &str,
) -> Result<Option<DateTime<Utc>>, AdapterError> {
    record
        .text(name)
        .filter(|value| !value.trim().is_empty())
        .map(parse_batch_timestamp)
        .transpose()
        .map_err(parse_error)
}

fn used_seconds(record: &JobRecord, name: &str) -> Result<u64, AdapterError> {
    record
        .grouped("resources_used", name)
        .map(parse_duration_secs)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(parse_error)
}

/// Build the canonical info for one raw job record.
pub fn info_from_record(id: &str, record: &JobRecord) -> Result<Info, AdapterError> {
    let allocated_nodes: Vec<NodeInfo> = parse_exec_host(record.text("exec_host").unwrap_or(""))
        .map_err(parse_error)?
        .into_iter()
        .map(|(name, procs)| NodeInfo::new(name, procs))
        .collect();
    let procs = allocated_nodes
        .iter()
        .try_fold(0u32, |total, node| total.checked_add(node.procs))
        .ok_or_else(|| {
            AdapterError::Parse(format!(
                "processor count overflows in exec_host {:?}",
                record.text("exec_host").unwrap_or("")
            ))
        })?;

    let job_owner = record
        .text("Job_Owner")
        .and_then(|owner| owner.split_once('@'))
        .map(|(user, _)| user.to_string());

    Ok(Info::builder()
        .id(id)
        .status(status_from_code(record.text("job_state").unwrap_or("")))
        .allocated_nodes(allocated_nodes)
        .submit_host(record.text("submit_host").map(str::to_string))
        .job_owner(job_owner)
        .procs(procs)
        .queue_name(record.text("queue").map(str::to_string))
        .wallclock_time(used_seconds(record, "walltime")?)
        .cpu_time(used_seconds(record, "cput")?)
        .submission_time(optional_timestamp(record, "ctime")?)
        .dispatch_time(optional_timestamp(record, "start_time")?)
        .native(Some(record.clone()))
        .build())
}

impl<C: PbsClient> TorqueAdapter<C> {
    /// Run a control operation, treating an unknown job as already gone.
    fn swallow_unknown(id: &str, result: Result<(), PbsError>) -> Result<(), AdapterError> {
        match result {
            Err(PbsError::UnknownJobId(_)) => {
                tracing::debug!("Job {} is unknown to the batch server, nothing to do", id);
                Ok(())
            }
            other => other.map_err(AdapterError::from),
        }
    }
}

impl<C: PbsClient> Adapter for TorqueAdapter<C> {
    async fn submit(&self, script: &Script, deps: &Dependencies) -> Result<String, AdapterError> {
        let (headers, resources, envvars) = submission_params(script, deps);
        tracing::debug!(
            "Submitting job to {} with {} headers and {} resources",
            self.cluster.id,
            headers.len(),
            resources.len()
        );

        let id = self
            .client
            .submit_string(
                &script.content,
                script.queue_name.as_deref(),
                &headers,
                &resources,
                &envvars,
            )
            .await?;
        tracing::debug!("Submitted job {}", id);
        Ok(id)
    }

    async fn info(&self, id: &str) -> Result<InfoResult, AdapterError> {
        tracing::debug!("Querying info for job {:?}", id);
        let records = match self.client.get_jobs(id).await {
            Ok(records) => records,
            Err(PbsError::UnknownJobId(_)) if !id.is_empty() => {
                tracing::debug!("Job {} is unknown to the batch server", id);
                return Ok(InfoResult::One(Info::undetermined(id)));
            }
            Err(err) => return Err(err.into()),
        };

        let infos = records
            .iter()
            .map(|(job_id, record)| info_from_record(job_id, record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InfoResult::from_vec(infos))
    }

    async fn status(&self, id: &str) -> Result<Status, AdapterError> {
        tracing::debug!("Querying status for job {}", id);
        let records = match self.client.get_job(id, &["job_state"]).await {
            Ok(records) => records,
            Err(PbsError::UnknownJobId(_)) => {
                tracing::debug!("Job {} is unknown to the batch server", id);
                return Ok(Status::Undetermined);
            }
            Err(err) => return Err(err.into()),
        };

        let code = records
            .get(id)
            .or_else(|| records.values().next())
            .and_then(|record| record.text("job_state"))
            .unwrap_or("");
        Ok(status_from_code(code))
    }

    async fn hold(&self, id: &str) -> Result<(), AdapterError> {
        tracing::debug!("Holding job {}", id);
        Self::swallow_unknown(id, self.client.hold_job(id).await)
    }

    async fn release(&self, id: &str) -> Result<(), AdapterError> {
        tracing::debug!("Releasing job {}", id);
        Self::swallow_unknown(id, self.client.release_job(id).await)
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        tracing::debug!("Deleting job {}", id);
        Self::swallow_unknown(id, self.client.delete_job(id).await)
    }
}
