use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Completed,
    Starting,
    Started,
    Stopping,
    Stopped,
    Failed,
    Abandoned,
    #[default]
    Unknown,
}

impl BatchStatus {
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            BatchStatus::Starting | BatchStatus::Started | BatchStatus::Stopping
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Starting => "STARTING",
            BatchStatus::Started => "STARTED",
            BatchStatus::Stopping => "STOPPING",
            BatchStatus::Stopped => "STOPPED",
            BatchStatus::Failed => "FAILED",
            BatchStatus::Abandoned => "ABANDONED",
            BatchStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct ExitStatus {
    pub exit_code: String,
    #[serde(default)]
    pub exit_description: String,
}

impl ExitStatus {
    pub fn new(exit_code: impl Into<String>) -> Self {
        Self {
            exit_code: exit_code.into(),
            exit_description: String::new(),
        }
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        Self::new("UNKNOWN")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct JobInstance {
    pub id: i64,
    pub job_name: String,
}

/// One run of a whole batch job.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct JobExecution {
    pub id: i64,
    pub job_instance: JobInstance,
    #[serde(default)]
    pub status: BatchStatus,
    #[serde(default)]
    pub exit_status: ExitStatus,
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub job_parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub step_executions: Vec<StepExecution>,
}

impl JobExecution {
    pub fn job_name(&self) -> &str {
        &self.job_instance.job_name
    }

    /// Wall-clock duration in milliseconds, if the execution has finished.
    pub fn duration_millis(&self) -> Option<i64> {
        let end = self.end_time?;
        let start = self.start_time.unwrap_or(end);
        Some((end - start).num_milliseconds())
    }
}

/// One run of a single step within a job execution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct StepExecution {
    pub id: i64,
    pub job_execution_id: i64,
    pub step_name: String,
    #[serde(default)]
    pub status: BatchStatus,
    #[serde(default)]
    pub exit_status: ExitStatus,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read_count: u64,
    #[serde(default)]
    pub write_count: u64,
    #[serde(default)]
    pub commit_count: u64,
    #[serde(default)]
    pub rollback_count: u64,
    #[serde(default)]
    pub filter_count: u64,
    #[serde(default)]
    pub read_skip_count: u64,
    #[serde(default)]
    pub write_skip_count: u64,
    #[serde(default)]
    pub process_skip_count: u64,
}

impl StepExecution {
    pub fn new(id: i64, job_execution_id: i64, step_name: impl Into<String>) -> Self {
        Self {
            id,
            job_execution_id,
            step_name: step_name.into(),
            status: BatchStatus::Starting,
            exit_status: ExitStatus::new("EXECUTING"),
            start_time: None,
            end_time: None,
            last_updated: None,
            read_count: 0,
            write_count: 0,
            commit_count: 0,
            rollback_count: 0,
            filter_count: 0,
            read_skip_count: 0,
            write_skip_count: 0,
            process_skip_count: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Sum of the read, write and process skip counters.
    pub fn skip_count(&self) -> u64 {
        self.read_skip_count + self.write_skip_count + self.process_skip_count
    }

    /// Wall-clock duration in milliseconds, if the step has finished.
    /// A missing start time is measured from the end time.
    pub fn duration_millis(&self) -> Option<i64> {
        let end = self.end_time?;
        let start = self.start_time.unwrap_or(end);
        Some((end - start).num_milliseconds())
    }
}
