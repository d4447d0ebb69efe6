use super::cumulative::{CumulativeStatistics, StatisticsSummary};
use batchlens_api::StepExecution;
use serde::Serialize;

/// Summary statistics over the completed executions of one step (or one
/// partition group of steps).
#[derive(Debug, Clone, Default)]
pub struct StepExecutionHistory {
    step_name: String,
    count: u64,
    duration: CumulativeStatistics,
    duration_per_read: CumulativeStatistics,
    commit_count: CumulativeStatistics,
    rollback_count: CumulativeStatistics,
    read_count: CumulativeStatistics,
    write_count: CumulativeStatistics,
    filter_count: CumulativeStatistics,
    read_skip_count: CumulativeStatistics,
    write_skip_count: CumulativeStatistics,
    process_skip_count: CumulativeStatistics,
}

impl StepExecutionHistory {
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            ..Default::default()
        }
    }

    /// Fold a step execution into the history. Executions that have not
    /// finished are ignored.
    pub fn append(&mut self, step: &StepExecution) {
        let Some(duration) = step.duration_millis() else {
            return;
        };

        self.duration.append(duration as f64);
        if step.read_count > 0 {
            self.duration_per_read
                .append((duration / step.read_count as i64) as f64);
        }
        self.count += 1;
        self.commit_count.append(step.commit_count as f64);
        self.rollback_count.append(step.rollback_count as f64);
        self.read_count.append(step.read_count as f64);
        self.write_count.append(step.write_count as f64);
        self.filter_count.append(step.filter_count as f64);
        self.read_skip_count.append(step.read_skip_count as f64);
        self.write_skip_count.append(step.write_skip_count as f64);
        self.process_skip_count.append(step.process_skip_count as f64);
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    /// Number of completed executions folded in.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn duration(&self) -> &CumulativeStatistics {
        &self.duration
    }

    pub fn duration_per_read(&self) -> &CumulativeStatistics {
        &self.duration_per_read
    }

    pub fn commit_count(&self) -> &CumulativeStatistics {
        &self.commit_count
    }

    pub fn rollback_count(&self) -> &CumulativeStatistics {
        &self.rollback_count
    }

    pub fn read_count(&self) -> &CumulativeStatistics {
        &self.read_count
    }

    pub fn write_count(&self) -> &CumulativeStatistics {
        &self.write_count
    }

    pub fn filter_count(&self) -> &CumulativeStatistics {
        &self.filter_count
    }

    pub fn read_skip_count(&self) -> &CumulativeStatistics {
        &self.read_skip_count
    }

    pub fn write_skip_count(&self) -> &CumulativeStatistics {
        &self.write_skip_count
    }

    pub fn process_skip_count(&self) -> &CumulativeStatistics {
        &self.process_skip_count
    }

    /// Every statistic paired with its display name, in a stable order.
    pub fn statistics(&self) -> [(&'static str, &CumulativeStatistics); 10] {
        [
            ("duration", &self.duration),
            ("duration_per_read", &self.duration_per_read),
            ("commit_count", &self.commit_count),
            ("rollback_count", &self.rollback_count),
            ("read_count", &self.read_count),
            ("write_count", &self.write_count),
            ("filter_count", &self.filter_count),
            ("read_skip_count", &self.read_skip_count),
            ("write_skip_count", &self.write_skip_count),
            ("process_skip_count", &self.process_skip_count),
        ]
    }

    pub fn summary(&self) -> StepExecutionHistorySummary {
        StepExecutionHistorySummary {
            step_name: self.step_name.clone(),
            count: self.count,
            duration: self.duration.summary(),
            duration_per_read: self.duration_per_read.summary(),
            commit_count: self.commit_count.summary(),
            rollback_count: self.rollback_count.summary(),
            read_count: self.read_count.summary(),
            write_count: self.write_count.summary(),
            filter_count: self.filter_count.summary(),
            read_skip_count: self.read_skip_count.summary(),
            write_skip_count: self.write_skip_count.summary(),
            process_skip_count: self.process_skip_count.summary(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepExecutionHistorySummary {
    pub step_name: String,
    pub count: u64,
    pub duration: StatisticsSummary,
    pub duration_per_read: StatisticsSummary,
    pub commit_count: StatisticsSummary,
    pub rollback_count: StatisticsSummary,
    pub read_count: StatisticsSummary,
    pub write_count: StatisticsSummary,
    pub filter_count: StatisticsSummary,
    pub read_skip_count: StatisticsSummary,
    pub write_skip_count: StatisticsSummary,
    pub process_skip_count: StatisticsSummary,
}
