//! Which past executions make up a step's history, and how they are read.

use crate::history::{JobExecutionHistory, StepExecutionHistory};
use batchlens_api::{ApiResult, ExecutionStore};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Page size used when none is configured.
pub const DEFAULT_HISTORY_PAGE_SIZE: usize = 1000;

static PARTITION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(:partition).*").expect("valid partition regex"));

/// Step name pattern whose history applies to `step_name`.
///
/// Partitions of a parallel step share one history: `load:partition7`
/// becomes `load:partition*`. Other names are used as is, so a `*` already
/// in the name still acts as a wildcard.
pub fn history_pattern(step_name: &str) -> String {
    if step_name.contains(":partition") {
        PARTITION_SUFFIX.replace(step_name, "${1}*").into_owned()
    } else {
        step_name.to_string()
    }
}

/// Fold every completed execution of (`job_name`, `step_name_pattern`) into
/// a fresh history, reading the store one page at a time.
pub async fn build_step_history(
    store: &dyn ExecutionStore,
    job_name: &str,
    step_name_pattern: &str,
    page_size: usize,
) -> ApiResult<StepExecutionHistory> {
    let page_size = page_size.max(1);
    let total = store
        .count_completed_step_executions(job_name, step_name_pattern)
        .await?;

    let mut history = StepExecutionHistory::new(step_name_pattern);
    let mut offset = 0;
    while offset < total {
        let page = store
            .fetch_step_executions_page(job_name, step_name_pattern, offset, page_size)
            .await?;
        if page.is_empty() {
            break;
        }
        for step in &page {
            history.append(step);
        }
        offset += page_size;
    }

    debug!(
        job = job_name,
        pattern = step_name_pattern,
        total,
        folded = history.count(),
        "built step execution history"
    );
    Ok(history)
}

/// Fold every finished execution of `job_name` into a duration history.
pub async fn build_job_history(
    store: &dyn ExecutionStore,
    job_name: &str,
    page_size: usize,
) -> ApiResult<JobExecutionHistory> {
    let page_size = page_size.max(1);
    let total = store.count_job_executions_for_job(job_name).await?;

    let mut history = JobExecutionHistory::new(job_name);
    let mut offset = 0;
    while offset < total {
        let page = store
            .list_job_executions_for_job(job_name, offset, page_size)
            .await?;
        if page.is_empty() {
            break;
        }
        for job_execution in &page {
            history.append(job_execution);
        }
        offset += page_size;
    }

    debug!(job = job_name, total, "built job execution history");
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitioned_steps_share_a_pattern() {
        assert_eq!(history_pattern("load:partition7"), "load:partition*");
        assert_eq!(history_pattern("load:partition"), "load:partition*");
        assert_eq!(
            history_pattern("load:partition1:partition2"),
            "load:partition*"
        );
    }

    #[test]
    fn plain_names_are_exact() {
        assert_eq!(history_pattern("load"), "load");
        assert_eq!(history_pattern("load:part1"), "load:part1");
    }
}
