use super::cumulative::{CumulativeStatistics, StatisticsSummary};
use batchlens_api::JobExecution;
use serde::Serialize;

/// Duration statistics over the completed executions of one job.
#[derive(Debug, Clone, Default)]
pub struct JobExecutionHistory {
    job_name: String,
    duration: CumulativeStatistics,
}

impl JobExecutionHistory {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            duration: CumulativeStatistics::new(),
        }
    }

    /// Unfinished executions are ignored.
    pub fn append(&mut self, job_execution: &JobExecution) {
        if let Some(duration) = job_execution.duration_millis() {
            self.duration.append(duration as f64);
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn duration(&self) -> &CumulativeStatistics {
        &self.duration
    }

    pub fn summary(&self) -> JobExecutionHistorySummary {
        JobExecutionHistorySummary {
            job_name: self.job_name.clone(),
            duration: self.duration.summary(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobExecutionHistorySummary {
    pub job_name: String,
    pub duration: StatisticsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchlens_api::{BatchStatus, ExitStatus, JobInstance};
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn job_execution(id: i64, duration_ms: Option<i64>) -> JobExecution {
        let start = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        JobExecution {
            id,
            job_instance: JobInstance {
                id: 1,
                job_name: "import".to_string(),
            },
            status: BatchStatus::Completed,
            exit_status: ExitStatus::new("COMPLETED"),
            create_time: start,
            start_time: Some(start),
            end_time: duration_ms.map(|ms| start + Duration::milliseconds(ms)),
            last_updated: None,
            job_parameters: BTreeMap::new(),
            step_executions: vec![],
        }
    }

    #[test]
    fn only_finished_executions_count() {
        let mut history = JobExecutionHistory::new("import");
        history.append(&job_execution(1, Some(4000)));
        history.append(&job_execution(2, None));
        history.append(&job_execution(3, Some(2000)));

        assert_eq!(history.duration().count(), 2);
        assert_eq!(history.duration().mean(), 3000.0);
        assert_eq!(history.summary().duration.max, 4000.0);
    }
}
