//! Parse `qstat -f` output into raw job records.

use crate::client::JobRecords;
use crate::types::JobRecord;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QstatError {
    #[error("Failed to parse qstat output: {0}")]
    ParseError(String),
}

/// Store one attribute, grouping dotted names under their prefix.
fn store(record: &mut JobRecord, name: &str, value: String) {
    match name.split_once('.') {
        Some((group, sub)) => record.insert_grouped(group, sub, value),
        None => record.insert_text(name, value),
    }
}

/// Move the pending attribute into the current job.
fn flush(
    current: &mut Option<(String, JobRecord)>,
    pending: &mut Option<(String, String)>,
) -> Result<(), QstatError> {
    let Some((name, value)) = pending.take() else {
        return Ok(());
    };
    match current.as_mut() {
        Some((_, record)) => {
            store(record, &name, value);
            Ok(())
        }
        None => Err(QstatError::ParseError(format!(
            "attribute {} appears before any Job Id",
            name
        ))),
    }
}

/// Parse `qstat -f` full output.
///
/// ```text
/// Job Id: 12345.batch-server
///     Job_Name = my_job
///     job_state = R
///     resources_used.walltime = 00:05:23
///     exec_host = n0635/0-11+n0636/0-11+n065
///     8/0-11
/// ```
///
/// Long values are wrapped onto continuation lines that start with a tab;
/// their text is appended to the previous attribute unchanged.
pub fn parse_qstat_full(output: &str) -> Result<JobRecords, QstatError> {
    let mut jobs = JobRecords::new();
    let mut current: Option<(String, JobRecord)> = None;
    let mut pending: Option<(String, String)> = None;

    for line in output.lines() {
        if let Some(fragment) = line.strip_prefix('\t') {
            match pending.as_mut() {
                Some((_, value)) => value.push_str(fragment.trim_end()),
                None => {
                    return Err(QstatError::ParseError(format!(
                        "continuation line without an attribute: {}",
                        line
                    )));
                }
            }
            continue;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(id) = line.strip_prefix("Job Id:") {
            flush(&mut current, &mut pending)?;
            if let Some((job_id, record)) = current.take() {
                jobs.insert(job_id, record);
            }
            current = Some((id.trim().to_string(), JobRecord::new()));
            continue;
        }

        match line.split_once('=') {
            Some((name, value)) => {
                flush(&mut current, &mut pending)?;
                pending = Some((name.trim().to_string(), value.trim().to_string()));
            }
            None => tracing::warn!("Skipping unrecognized qstat line: {}", line),
        }
    }

    flush(&mut current, &mut pending)?;
    if let Some((job_id, record)) = current {
        jobs.insert(job_id, record);
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUNNING: &str = "Job Id: 7964023.oak-batch.osc.edu
    Job_Name = 12_4_g_s_10hr_96_p7
    Job_Owner = osu9723@oakley01.osc.edu
    resources_used.cput = 73:29:59
    resources_used.mem = 12425624kb
    resources_used.walltime = 06:28:23
    job_state = R
    queue = parallel
    exec_host = n0635/0-11+n0636/0-11+n0658/0-11+n0657/0-11+n0656/0-11+n03
\t11/0-11+n0310/0-11+n0309/0-11
    Resource_List.nodes = 8:ppn=12
    Resource_List.walltime = 09:59:00
    Variable_List = PBS_O_QUEUE=parallel,PBS_O_HOME=/users/osu9723
    ctime = 1474895720
    start_time = 1478612793
    submit_host = oakley01.osc.edu

Job Id: 7964024.oak-batch.osc.edu
    Job_Name = gromacs_job
    job_state = Q
";

    #[test]
    fn test_parse_qstat_full() {
        let jobs = parse_qstat_full(RUNNING).unwrap();
        assert_eq!(jobs.len(), 2);

        let job = &jobs["7964023.oak-batch.osc.edu"];
        assert_eq!(job.text("Job_Owner"), Some("osu9723@oakley01.osc.edu"));
        assert_eq!(job.text("job_state"), Some("R"));
        assert_eq!(job.grouped("resources_used", "cput"), Some("73:29:59"));
        assert_eq!(job.grouped("Resource_List", "nodes"), Some("8:ppn=12"));
        assert_eq!(
            job.text("Variable_List"),
            Some("PBS_O_QUEUE=parallel,PBS_O_HOME=/users/osu9723")
        );

        let queued = &jobs["7964024.oak-batch.osc.edu"];
        assert_eq!(queued.text("job_state"), Some("Q"));
        assert_eq!(queued.text("exec_host"), None);
    }

    #[test]
    fn test_continuation_lines_are_joined() {
        let jobs = parse_qstat_full(RUNNING).unwrap();
        assert_eq!(
            jobs["7964023.oak-batch.osc.edu"].text("exec_host"),
            Some(
                "n0635/0-11+n0636/0-11+n0658/0-11+n0657/0-11+n0656/0-11+n0311/0-11+n0310/0-11+n0309/0-11"
            )
        );
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_qstat_full("").unwrap().is_empty());
        assert!(parse_qstat_full("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_empty_value() {
        let jobs = parse_qstat_full("Job Id: 1.server\n    comment =\n").unwrap();
        assert_eq!(jobs["1.server"].text("comment"), Some(""));
    }

    #[test]
    fn test_attribute_before_job_id() {
        assert!(matches!(
            parse_qstat_full("    job_state = R\n"),
            Err(QstatError::ParseError(_))
        ));
        assert!(parse_qstat_full("\tdangling\n").is_err());
    }

    #[test]
    fn test_unrecognized_lines_are_skipped() {
        let jobs = parse_qstat_full("Job Id: 1.server\n    garbage\n    job_state = H\n").unwrap();
        assert_eq!(jobs["1.server"].text("job_state"), Some("H"));
        assert_eq!(jobs["1.server"].len(), 1);
    }
}
