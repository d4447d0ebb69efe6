use crate::error::ApiResult;
use crate::models::{JobExecution, JobInstance, StepExecution};
use async_trait::async_trait;

/// Read access to the batch framework's execution repository.
///
/// Step name patterns use `*` as a wildcard for any run of characters;
/// every other character matches literally. There is no escape for `*`: a
/// step whose own name contains `*` shares its history with every name the
/// wildcard matches. Listings are ordered by descending id so the most
/// recent executions and instances come first.
#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Count completed step executions of `job_name` whose step name
    /// matches `step_name_pattern`.
    async fn count_completed_step_executions(
        &self,
        job_name: &str,
        step_name_pattern: &str,
    ) -> ApiResult<usize>;

    /// Fetch one page of the executions counted by
    /// [`ExecutionStore::count_completed_step_executions`].
    async fn fetch_step_executions_page(
        &self,
        job_name: &str,
        step_name_pattern: &str,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Vec<StepExecution>>;

    /// Look up a single step execution within its job execution.
    ///
    /// # Errors
    /// * `NoSuchJobExecution` when the job execution does not exist
    /// * `NoSuchStepExecution` when it exists but does not own the step
    async fn get_step_execution(
        &self,
        job_execution_id: i64,
        step_execution_id: i64,
    ) -> ApiResult<StepExecution>;

    /// All step executions of a job execution, in execution order.
    async fn get_step_executions(&self, job_execution_id: i64) -> ApiResult<Vec<StepExecution>>;

    async fn get_job_execution(&self, job_execution_id: i64) -> ApiResult<JobExecution>;

    /// Distinct job names, sorted.
    async fn job_names(&self) -> ApiResult<Vec<String>>;

    async fn count_job_executions(&self) -> ApiResult<usize>;

    async fn list_job_executions(&self, offset: usize, limit: usize)
    -> ApiResult<Vec<JobExecution>>;

    /// Fails with `NoSuchJob` when no execution of `job_name` exists.
    async fn count_job_executions_for_job(&self, job_name: &str) -> ApiResult<usize>;

    async fn list_job_executions_for_job(
        &self,
        job_name: &str,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Vec<JobExecution>>;

    /// Distinct job instances of `job_name`.
    ///
    /// # Errors
    /// `NoSuchJob` when no execution of `job_name` exists.
    async fn list_job_instances(
        &self,
        job_name: &str,
        offset: usize,
        limit: usize,
    ) -> ApiResult<Vec<JobInstance>>;

    async fn get_job_instance(&self, job_instance_id: i64) -> ApiResult<JobInstance>;

    /// Executions of one job instance. An instance id that belongs to no
    /// execution of `job_name` yields an empty list.
    ///
    /// # Errors
    /// `NoSuchJob` when no execution of `job_name` exists.
    async fn get_job_executions_for_job_instance(
        &self,
        job_name: &str,
        job_instance_id: i64,
    ) -> ApiResult<Vec<JobExecution>>;
}
