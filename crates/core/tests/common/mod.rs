#![allow(dead_code)]

use batchlens_api::{BatchStatus, ExitStatus, JobExecution, JobInstance, StepExecution};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;

pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

pub fn job_execution(id: i64, job_name: &str) -> JobExecution {
    JobExecution {
        id,
        job_instance: JobInstance {
            id,
            job_name: job_name.to_string(),
        },
        status: BatchStatus::Completed,
        exit_status: ExitStatus::new("COMPLETED"),
        create_time: base_time(),
        start_time: Some(base_time()),
        end_time: Some(base_time() + Duration::minutes(1)),
        last_updated: None,
        job_parameters: BTreeMap::new(),
        step_executions: vec![],
    }
}

pub fn completed_step(
    id: i64,
    job_execution_id: i64,
    name: &str,
    duration_ms: i64,
    read_count: u64,
) -> StepExecution {
    let mut step = StepExecution::new(id, job_execution_id, name);
    step.status = BatchStatus::Completed;
    step.exit_status = ExitStatus::new("COMPLETED");
    step.start_time = Some(base_time());
    step.end_time = Some(base_time() + Duration::milliseconds(duration_ms));
    step.read_count = read_count;
    step.write_count = read_count;
    step.commit_count = 1;
    step
}

pub fn running_step(id: i64, job_execution_id: i64, name: &str, read_count: u64) -> StepExecution {
    let mut step = StepExecution::new(id, job_execution_id, name);
    step.status = BatchStatus::Started;
    step.start_time = Some(base_time());
    step.read_count = read_count;
    step
}

/// Job execution `id` of `job_name` owning the given steps.
pub fn with_steps(id: i64, job_name: &str, steps: Vec<StepExecution>) -> JobExecution {
    let mut je = job_execution(id, job_name);
    je.step_executions = steps;
    je
}
