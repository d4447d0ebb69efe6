//! Read-side facade over an [`ExecutionStore`], shared by the REST adapter
//! and the CLI.

use crate::config::MonitoringConfig;
use crate::history::{JobExecutionHistory, StepExecutionHistory};
use crate::policy::{build_job_history, build_step_history, history_pattern};
use crate::progress::{self, ProgressEstimate};
use batchlens_api::{ApiError, ApiResult, ExecutionStore, JobExecution, JobInstance, StepExecution};
use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use serde::Serialize;
use std::sync::Arc;

/// One page of a listing. `page_index` is 1-based.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page_index: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobInfo {
    pub name: String,
    pub execution_count: usize,
}

/// A job instance with its executions, newest first.
#[derive(Debug, Clone)]
pub struct JobInstanceExecutions {
    pub job_instance: JobInstance,
    pub job_executions: Vec<JobExecution>,
}

/// Every execution of one job with its steps, plus the names of all jobs.
#[derive(Debug, Clone)]
pub struct JobTree {
    pub job_name: String,
    pub job_names: Vec<String>,
    pub job_executions: Vec<JobExecution>,
}

/// A step execution together with the history it was measured against.
#[derive(Debug, Clone)]
pub struct StepProgress {
    pub job_name: String,
    pub step_execution: StepExecution,
    pub history: StepExecutionHistory,
    pub estimate: ProgressEstimate,
}

#[derive(Clone)]
pub struct MonitoringService {
    store: Arc<dyn ExecutionStore>,
    config: MonitoringConfig,
}

impl MonitoringService {
    pub fn new(store: Arc<dyn ExecutionStore>, config: MonitoringConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn ExecutionStore> {
        &self.store
    }

    pub fn config(&self) -> &MonitoringConfig {
        &self.config
    }

    // ---- Progress ----

    /// History of every completed execution sharing `step_name`'s pattern.
    pub async fn step_history(
        &self,
        job_name: &str,
        step_name: &str,
    ) -> ApiResult<StepExecutionHistory> {
        build_step_history(
            self.store.as_ref(),
            job_name,
            &history_pattern(step_name),
            self.config.history_page_size,
        )
        .await
    }

    /// Estimate how far `step` has progressed, as of now.
    pub async fn estimate_progress(
        &self,
        step: &StepExecution,
        job_name: &str,
    ) -> ApiResult<ProgressEstimate> {
        let history = self.step_history(job_name, &step.step_name).await?;
        Ok(progress::estimate(step, &history))
    }

    /// Look up a step execution and estimate its progress as of `now`.
    pub async fn step_progress_at(
        &self,
        job_execution_id: i64,
        step_execution_id: i64,
        now: DateTime<Utc>,
    ) -> ApiResult<StepProgress> {
        let step_execution = self
            .store
            .get_step_execution(job_execution_id, step_execution_id)
            .await?;
        let job_execution = self.store.get_job_execution(job_execution_id).await?;
        let history = self
            .step_history(job_execution.job_name(), &step_execution.step_name)
            .await?;
        let estimate = progress::estimate_at(&step_execution, &history, now);
        Ok(StepProgress {
            job_name: job_execution.job_name().to_string(),
            step_execution,
            history,
            estimate,
        })
    }

    pub async fn step_progress(
        &self,
        job_execution_id: i64,
        step_execution_id: i64,
    ) -> ApiResult<StepProgress> {
        self.step_progress_at(job_execution_id, step_execution_id, Utc::now())
            .await
    }

    pub async fn job_history(&self, job_name: &str) -> ApiResult<JobExecutionHistory> {
        build_job_history(self.store.as_ref(), job_name, self.config.history_page_size).await
    }

    // ---- Listings ----

    /// Job names with their execution counts. With `searched`, every name
    /// matching the case-insensitive regex is returned on a single page.
    pub async fn list_jobs(
        &self,
        page_index: usize,
        page_size: usize,
        searched: Option<&str>,
    ) -> ApiResult<Page<JobInfo>> {
        let names = self.store.job_names().await?;
        let total = names.len();

        let (selected, total_items): (Vec<String>, usize) = match searched {
            Some(pattern) => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ApiError::InvalidArgument(e.to_string()))?;
                let matched: Vec<String> =
                    names.into_iter().filter(|n| regex.is_match(n)).collect();
                let count = matched.len();
                (matched, count)
            }
            None => {
                let offset = page_offset(page_index, page_size)?;
                (
                    names.into_iter().skip(offset).take(page_size).collect(),
                    total,
                )
            }
        };

        let mut results = Vec::with_capacity(selected.len());
        for name in selected {
            let execution_count = self.store.count_job_executions_for_job(&name).await?;
            results.push(JobInfo {
                name,
                execution_count,
            });
        }

        Ok(Page {
            page_index,
            page_size,
            total_items,
            results,
        })
    }

    pub async fn list_job_executions(
        &self,
        page_index: usize,
        page_size: usize,
    ) -> ApiResult<Page<JobExecution>> {
        let offset = page_offset(page_index, page_size)?;
        let total_items = self.store.count_job_executions().await?;
        let results = self.store.list_job_executions(offset, page_size).await?;
        Ok(Page {
            page_index,
            page_size,
            total_items,
            results,
        })
    }

    pub async fn list_job_executions_for_job(
        &self,
        job_name: &str,
        page_index: usize,
        page_size: usize,
    ) -> ApiResult<Page<JobExecution>> {
        let offset = page_offset(page_index, page_size)?;
        let total_items = self.store.count_job_executions_for_job(job_name).await?;
        let results = self
            .store
            .list_job_executions_for_job(job_name, offset, page_size)
            .await?;
        Ok(Page {
            page_index,
            page_size,
            total_items,
            results,
        })
    }

    /// Instances of `job_name` starting at offset `start`. Instances whose
    /// executions have all disappeared are skipped.
    pub async fn list_job_instances(
        &self,
        job_name: &str,
        start: usize,
        page_size: usize,
    ) -> ApiResult<Vec<JobInstanceExecutions>> {
        let instances = self
            .store
            .list_job_instances(job_name, start, page_size)
            .await?;
        let mut results = Vec::with_capacity(instances.len());
        for job_instance in instances {
            let job_executions = self
                .store
                .get_job_executions_for_job_instance(job_name, job_instance.id)
                .await?;
            if !job_executions.is_empty() {
                results.push(JobInstanceExecutions {
                    job_instance,
                    job_executions,
                });
            }
        }
        Ok(results)
    }

    pub async fn job_instance(&self, job_instance_id: i64) -> ApiResult<JobInstance> {
        self.store.get_job_instance(job_instance_id).await
    }

    pub async fn job_instance_executions(
        &self,
        job_name: &str,
        job_instance_id: i64,
    ) -> ApiResult<Vec<JobExecution>> {
        self.store
            .get_job_executions_for_job_instance(job_name, job_instance_id)
            .await
    }

    /// All executions of `job_name`, each carrying its steps in execution
    /// order.
    pub async fn job_tree(&self, job_name: &str) -> ApiResult<JobTree> {
        let count = self.store.count_job_executions_for_job(job_name).await?;
        let job_names = self.store.job_names().await?;
        let mut job_executions = self
            .store
            .list_job_executions_for_job(job_name, 0, count)
            .await?;
        for job_execution in &mut job_executions {
            job_execution.step_executions =
                self.store.get_step_executions(job_execution.id).await?;
        }
        Ok(JobTree {
            job_name: job_name.to_string(),
            job_names,
            job_executions,
        })
    }

    pub async fn job_execution(&self, job_execution_id: i64) -> ApiResult<JobExecution> {
        self.store.get_job_execution(job_execution_id).await
    }

    pub async fn count_job_executions(&self) -> ApiResult<usize> {
        self.store.count_job_executions().await
    }

    pub async fn step_executions(&self, job_execution_id: i64) -> ApiResult<Vec<StepExecution>> {
        self.store.get_step_executions(job_execution_id).await
    }

    pub async fn step_execution(
        &self,
        job_execution_id: i64,
        step_execution_id: i64,
    ) -> ApiResult<StepExecution> {
        self.store
            .get_step_execution(job_execution_id, step_execution_id)
            .await
    }
}

fn page_offset(page_index: usize, page_size: usize) -> ApiResult<usize> {
    if page_index == 0 {
        return Err(ApiError::InvalidArgument(
            "pageIndex starts at 1".to_string(),
        ));
    }
    if page_size == 0 {
        return Err(ApiError::InvalidArgument(
            "pageSize must be positive".to_string(),
        ));
    }
    Ok((page_index - 1) * page_size)
}
