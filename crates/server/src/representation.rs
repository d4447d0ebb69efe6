//! JSON views of executions returned by the REST endpoints.

use batchlens_api::{JobExecution, StepExecution};
use batchlens_core::history::StepExecutionHistorySummary;
use batchlens_core::progress::ProgressSummary;
use batchlens_core::service::{JobInstanceExecutions, JobTree, Page, StepProgress};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// `HH:MM:SS`, or `-` when there is nothing to measure. Hours are not
/// wrapped at 24.
pub fn format_duration(millis: Option<i64>) -> String {
    match millis {
        Some(ms) => {
            let secs = ms.max(0) / 1000;
            format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
        }
        None => "-".to_string(),
    }
}

/// Time since `start`, up to `end` or `now` for executions still running.
fn running_duration(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<i64> {
    let start = start?;
    Some((end.unwrap_or(now) - start).num_milliseconds())
}

#[derive(Debug, Clone, Serialize)]
pub struct JobExecutionInfo {
    pub id: i64,
    pub job_instance_id: i64,
    pub job_name: String,
    pub status: String,
    pub exit_code: String,
    pub running: bool,
    pub create_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_millis: Option<i64>,
    pub duration: String,
    pub step_execution_count: usize,
    pub job_parameters: BTreeMap<String, String>,
}

impl JobExecutionInfo {
    pub fn new(job_execution: &JobExecution, now: DateTime<Utc>) -> Self {
        let duration_millis =
            running_duration(job_execution.start_time, job_execution.end_time, now);
        Self {
            id: job_execution.id,
            job_instance_id: job_execution.job_instance.id,
            job_name: job_execution.job_name().to_string(),
            status: job_execution.status.to_string(),
            exit_code: job_execution.exit_status.exit_code.clone(),
            running: job_execution.status.is_running(),
            create_time: job_execution.create_time,
            start_time: job_execution.start_time,
            end_time: job_execution.end_time,
            duration_millis,
            duration: format_duration(duration_millis),
            step_execution_count: job_execution.step_executions.len(),
            job_parameters: job_execution.job_parameters.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepExecutionInfo {
    pub id: i64,
    pub job_execution_id: i64,
    pub job_name: String,
    pub name: String,
    pub status: String,
    pub exit_code: String,
    pub exit_description: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_millis: Option<i64>,
    pub duration: String,
    pub read_count: u64,
    pub write_count: u64,
    pub commit_count: u64,
    pub rollback_count: u64,
    pub filter_count: u64,
    pub read_skip_count: u64,
    pub write_skip_count: u64,
    pub process_skip_count: u64,
    pub skip_count: u64,
}

impl StepExecutionInfo {
    pub fn new(step: &StepExecution, job_name: &str, now: DateTime<Utc>) -> Self {
        let duration_millis = running_duration(step.start_time, step.end_time, now);
        Self {
            id: step.id,
            job_execution_id: step.job_execution_id,
            job_name: job_name.to_string(),
            name: step.step_name.clone(),
            status: step.status.to_string(),
            exit_code: step.exit_status.exit_code.clone(),
            exit_description: step.exit_status.exit_description.clone(),
            start_time: step.start_time,
            end_time: step.end_time,
            duration_millis,
            duration: format_duration(duration_millis),
            read_count: step.read_count,
            write_count: step.write_count,
            commit_count: step.commit_count,
            rollback_count: step.rollback_count,
            filter_count: step.filter_count,
            read_skip_count: step.read_skip_count,
            write_skip_count: step.write_skip_count,
            process_skip_count: step.process_skip_count,
            skip_count: step.skip_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepProgressView {
    pub step_execution: StepExecutionInfo,
    pub history: StepExecutionHistorySummary,
    pub progress: ProgressSummary,
}

impl StepProgressView {
    pub fn new(progress: &StepProgress, now: DateTime<Utc>) -> Self {
        Self {
            step_execution: StepExecutionInfo::new(
                &progress.step_execution,
                &progress.job_name,
                now,
            ),
            history: progress.history.summary(),
            progress: progress.estimate.summary(),
        }
    }
}

/// `key=value` pairs joined by commas, in key order.
pub fn format_job_parameters(parameters: &BTreeMap<String, String>) -> String {
    parameters
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, Serialize)]
pub struct JobInstanceView {
    pub id: i64,
    pub job_name: String,
    pub job_parameters: BTreeMap<String, String>,
    pub job_parameters_string: String,
    pub job_execution_count: usize,
    pub job_executions: Vec<JobExecutionInfo>,
}

impl JobInstanceView {
    /// Parameters are taken from the most recent execution.
    pub fn new(instance: &JobInstanceExecutions, now: DateTime<Utc>) -> Self {
        let job_parameters = instance
            .job_executions
            .first()
            .map(|je| je.job_parameters.clone())
            .unwrap_or_default();
        Self {
            id: instance.job_instance.id,
            job_name: instance.job_instance.job_name.clone(),
            job_parameters_string: format_job_parameters(&job_parameters),
            job_parameters,
            job_execution_count: instance.job_executions.len(),
            job_executions: instance
                .job_executions
                .iter()
                .map(|je| JobExecutionInfo::new(je, now))
                .collect(),
        }
    }
}

const TREE_ROOT_STATUS: &str = "MAINNODE";
const TREE_JOBS_LIST_LINK: &str = "#!/batch/jobs-list";
const TREE_SIZE_JOB_EXECUTION: u32 = 2000;
const TREE_SIZE_STEP: u32 = 1000;

/// Node of the job, job execution and step tree. Statuses below the root
/// are exit codes.
#[derive(Debug, Clone, Serialize)]
pub struct JobsTreeView {
    pub name: String,
    pub link: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JobsTreeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name_list: Option<Vec<String>>,
}

impl JobsTreeView {
    pub fn new(tree: &JobTree) -> Self {
        let job_link = format!("{TREE_JOBS_LIST_LINK}/{}", tree.job_name);
        let children = tree
            .job_executions
            .iter()
            .map(|je| JobsTreeView {
                name: format!(
                    "[id= {}];{{{}}}",
                    je.id,
                    format_job_parameters(&je.job_parameters)
                ),
                link: job_link.clone(),
                status: je.exit_status.exit_code.clone(),
                size: Some(TREE_SIZE_JOB_EXECUTION),
                children: je
                    .step_executions
                    .iter()
                    .map(|step| JobsTreeView {
                        name: step.step_name.clone(),
                        link: format!("{job_link}/{}", je.id),
                        status: step.exit_status.exit_code.clone(),
                        size: Some(TREE_SIZE_STEP),
                        children: Vec::new(),
                        job_name_list: None,
                    })
                    .collect(),
                job_name_list: None,
            })
            .collect();
        Self {
            name: tree.job_name.clone(),
            link: TREE_JOBS_LIST_LINK.to_string(),
            status: TREE_ROOT_STATUS.to_string(),
            size: None,
            children,
            job_name_list: Some(tree.job_names.clone()),
        }
    }
}

/// Re-map the results of a page, keeping its paging fields.
pub fn map_page<T, U>(page: Page<T>, f: impl FnMut(&T) -> U) -> Page<U> {
    Page {
        page_index: page.page_index,
        page_size: page.page_size,
        total_items: page.total_items,
        results: page.results.iter().map(f).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format_as_clock_time() {
        assert_eq!(format_duration(None), "-");
        assert_eq!(format_duration(Some(0)), "00:00:00");
        assert_eq!(format_duration(Some(61_999)), "00:01:01");
        assert_eq!(format_duration(Some(90_061_000)), "25:01:01");
        assert_eq!(format_duration(Some(-5)), "00:00:00");
    }

    #[test]
    fn job_parameters_join_in_key_order() {
        let parameters = BTreeMap::from([
            ("run.date".to_string(), "2024-05-01".to_string()),
            ("mode".to_string(), "full".to_string()),
        ]);
        assert_eq!(
            format_job_parameters(&parameters),
            "mode=full,run.date=2024-05-01"
        );
        assert_eq!(format_job_parameters(&BTreeMap::new()), "");
    }
}
