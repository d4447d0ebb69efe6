use super::pattern::StepNamePattern;
use crate::error::Result;
use async_trait::async_trait;
use batchlens_api::{
    ApiError, ApiResult, ExecutionStore, JobExecution, JobInstance, StepExecution, StoreSnapshot,
};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

/// Execution store held entirely in memory, keyed by job execution id.
///
/// Step executions live inside the job execution that owns them.
#[derive(Default)]
pub struct InMemoryExecutionStore {
    job_executions: RwLock<BTreeMap<i64, JobExecution>>,
}

impl InMemoryExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot.
    ///
    /// # Errors
    /// `InvalidArgument` when a job execution id repeats or a nested step
    /// names a different parent.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> ApiResult<Self> {
        let mut job_executions = BTreeMap::new();
        for job_execution in snapshot.job_executions {
            validate(&job_execution)?;
            let id = job_execution.id;
            if job_executions.insert(id, job_execution).is_some() {
                return Err(ApiError::InvalidArgument(format!(
                    "duplicate job execution id {id}"
                )));
            }
        }
        Ok(Self {
            job_executions: RwLock::new(job_executions),
        })
    }

    /// Read a JSON [`StoreSnapshot`] from disk.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)?;
        let store = Self::from_snapshot(snapshot)?;
        info!(
            "Loaded {} job executions from {}",
            store.job_executions.read().await.len(),
            path.display()
        );
        Ok(store)
    }

    /// Insert or replace a job execution together with its steps.
    pub async fn upsert_job_execution(&self, job_execution: JobExecution) -> ApiResult<()> {
        validate(&job_execution)?;
        self.job_executions
            .write()
            .await
            .insert(job_execution.id, job_execution);
        Ok(())
    }

    /// Insert or replace one step execution under its parent.
    pub async fn upsert_step_execution(&self, step: StepExecution) -> ApiResult<()> {
        let mut guard = self.job_executions.write().await;
        let job_execution = guard
            .get_mut(&step.job_execution_id)
            .ok_or(ApiError::NoSuchJobExecution(step.job_execution_id))?;
        match job_execution
            .step_executions
            .iter_mut()
            .find(|s| s.id == step.id)
        {
            Some(existing) => *existing = step,
            None => job_execution.step_executions.push(step),
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            job_executions: self.job_executions.read().await.values().cloned().collect(),
        }
    }
}

/// Completed steps of `job_name` matching `pattern`, newest first. Borrows
/// from the map so callers clone only what they return.
fn completed_steps<'a>(
    job_executions: &'a BTreeMap<i64, JobExecution>,
    job_name: &str,
    pattern: &StepNamePattern,
) -> Vec<&'a StepExecution> {
    let mut steps: Vec<&StepExecution> = job_executions
        .values()
        .filter(|je| je.job_name() == job_name)
        .flat_map(|je| je.step_executions.iter())
        .filter(|s| s.is_finished() && pattern.matches(&s.step_name))
        .collect();
    steps.sort_unstable_by(|a, b| b.id.cmp(&a.id));
    steps
}

fn has_job(job_executions: &BTreeMap<i64, JobExecution>, job_name: &str) -> bool {
    job_executions.values().any(|je| je.job_name() == job_name)
}

fn validate(job_execution: &JobExecution) -> ApiResult<()> {
    match job_execution
        .step_executions
        .iter()
        .find(|s| s.job_execution_id != job_execution.id)
    {
        Some(step) => Err(ApiError::InvalidArgument(format!(
            "step execution {} belongs to job execution {}, found under {}",
            step.id, step.job_execution_id, job_execution.id
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl ExecutionStore for InMemoryExecutionStore {
    async fn count_completed_step_executions(
        &self,
        job_name: &str,
        step_name_pattern: &str,
    ) -> ApiResult<usize> {
        let matcher = StepNamePattern::new(step_name_pattern);
        let guard = self.job_executions.read().await;
        Ok(guard
            .values()
            .filter(|je| je.job_name() == job_name)
            .flat_map(|je| je.step_executions.iter())
            .filter(|s| s.is_finished() && matcher.matches(&s.step_name))
            .count())
    }

    async fn fetch_step_executions_page(
        &self,
        job_name: &str,
        step_name_pattern: &str,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Vec<StepExecution>> {
        let matcher = StepNamePattern::new(step_name_pattern);
        let guard = self.job_executions.read().await;
        Ok(completed_steps(&guard, job_name, &matcher)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_step_execution(
        &self,
        job_execution_id: i64,
        step_execution_id: i64,
    ) -> ApiResult<StepExecution> {
        let guard = self.job_executions.read().await;
        let job_execution = guard
            .get(&job_execution_id)
            .ok_or(ApiError::NoSuchJobExecution(job_execution_id))?;
        job_execution
            .step_executions
            .iter()
            .find(|s| s.id == step_execution_id)
            .cloned()
            .ok_or(ApiError::NoSuchStepExecution {
                job_execution_id,
                step_execution_id,
            })
    }

    async fn get_step_executions(&self, job_execution_id: i64) -> ApiResult<Vec<StepExecution>> {
        let guard = self.job_executions.read().await;
        let job_execution = guard
            .get(&job_execution_id)
            .ok_or(ApiError::NoSuchJobExecution(job_execution_id))?;
        let mut steps = job_execution.step_executions.clone();
        steps.sort_by_key(|s| s.id);
        Ok(steps)
    }

    async fn get_job_execution(&self, job_execution_id: i64) -> ApiResult<JobExecution> {
        self.job_executions
            .read()
            .await
            .get(&job_execution_id)
            .cloned()
            .ok_or(ApiError::NoSuchJobExecution(job_execution_id))
    }

    async fn job_names(&self) -> ApiResult<Vec<String>> {
        let guard = self.job_executions.read().await;
        let names: BTreeSet<&str> = guard.values().map(|je| je.job_name()).collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    async fn count_job_executions(&self) -> ApiResult<usize> {
        Ok(self.job_executions.read().await.len())
    }

    async fn list_job_executions(
        &self,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Vec<JobExecution>> {
        Ok(self
            .job_executions
            .read()
            .await
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_job_executions_for_job(&self, job_name: &str) -> ApiResult<usize> {
        let count = self
            .job_executions
            .read()
            .await
            .values()
            .filter(|je| je.job_name() == job_name)
            .count();
        if count == 0 {
            return Err(ApiError::NoSuchJob(job_name.to_string()));
        }
        Ok(count)
    }

    async fn list_job_executions_for_job(
        &self,
        job_name: &str,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Vec<JobExecution>> {
        let guard = self.job_executions.read().await;
        let executions: Vec<JobExecution> = guard
            .values()
            .rev()
            .filter(|je| je.job_name() == job_name)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        if executions.is_empty() && !has_job(&guard, job_name) {
            return Err(ApiError::NoSuchJob(job_name.to_string()));
        }
        Ok(executions)
    }

    async fn list_job_instances(
        &self,
        job_name: &str,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Vec<JobInstance>> {
        let guard = self.job_executions.read().await;
        if !has_job(&guard, job_name) {
            return Err(ApiError::NoSuchJob(job_name.to_string()));
        }
        let instances: BTreeMap<i64, &JobInstance> = guard
            .values()
            .filter(|je| je.job_name() == job_name)
            .map(|je| (je.job_instance.id, &je.job_instance))
            .collect();
        Ok(instances
            .into_values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_job_instance(&self, job_instance_id: i64) -> ApiResult<JobInstance> {
        self.job_executions
            .read()
            .await
            .values()
            .find(|je| je.job_instance.id == job_instance_id)
            .map(|je| je.job_instance.clone())
            .ok_or(ApiError::NoSuchJobInstance(job_instance_id))
    }

    async fn get_job_executions_for_job_instance(
        &self,
        job_name: &str,
        job_instance_id: i64,
    ) -> ApiResult<Vec<JobExecution>> {
        let guard = self.job_executions.read().await;
        if !has_job(&guard, job_name) {
            return Err(ApiError::NoSuchJob(job_name.to_string()));
        }
        Ok(guard
            .values()
            .rev()
            .filter(|je| je.job_name() == job_name && je.job_instance.id == job_instance_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(id: i64, job_execution_id: i64, name: &str) -> StepExecution {
        let mut step = StepExecution::new(id, job_execution_id, name);
        step.end_time = Some(chrono::Utc::now());
        step
    }

    fn job_executions() -> BTreeMap<i64, JobExecution> {
        let mut je: JobExecution = serde_json::from_value(serde_json::json!({
            "id": 1,
            "job_instance": { "id": 1, "job_name": "import" },
            "create_time": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        je.step_executions = vec![
            finished(1, 1, "load"),
            finished(2, 1, "load"),
            StepExecution::new(3, 1, "load"),
            finished(4, 1, "read"),
        ];
        BTreeMap::from([(1, je)])
    }

    #[test]
    fn completed_steps_borrow_from_the_map() {
        let map = job_executions();
        let steps = completed_steps(&map, "import", &StepNamePattern::new("load"));

        let ids: Vec<i64> = steps.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
        let owned = &map[&1].step_executions[1];
        assert!(std::ptr::eq(steps[0], owned));
    }

    #[tokio::test]
    async fn pages_clone_only_the_requested_slice() {
        let store = InMemoryExecutionStore::from_snapshot(StoreSnapshot {
            job_executions: job_executions().into_values().collect(),
        })
        .unwrap();

        assert_eq!(
            store.count_completed_step_executions("import", "*").await.unwrap(),
            3
        );
        let page = store
            .fetch_step_executions_page("import", "*", 1, 1)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 2);
    }
}
