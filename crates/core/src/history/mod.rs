//! Summary statistics folded from completed executions.

pub mod cumulative;
pub mod job;
pub mod step;

pub use cumulative::{CumulativeStatistics, StatisticsSummary, round2};
pub use job::{JobExecutionHistory, JobExecutionHistorySummary};
pub use step::{StepExecutionHistory, StepExecutionHistorySummary};
