use crate::error::{HttpError, HttpResult};
use crate::representation::{
    JobExecutionInfo, JobInstanceView, JobsTreeView, StepExecutionInfo, StepProgressView,
    map_page,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use batchlens_api::ApiError;
use batchlens_core::MonitoringService;
use batchlens_core::history::JobExecutionHistorySummary;
use batchlens_core::service::{JobInfo, Page};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

/// Page size of per-job execution listings when the client sends none.
const JOB_EXECUTIONS_PAGE_SIZE: usize = 1000;
/// Page size of job instance listings when the client sends none.
const JOB_INSTANCES_PAGE_SIZE: usize = 20;

pub type AppState = Arc<MonitoringService>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page_index: Option<usize>,
    pub page_size: Option<usize>,
    pub searched_job: Option<String>,
    /// Offset of the first job instance, used instead of `page_index`.
    pub start_job: Option<usize>,
}

impl PageParams {
    fn resolve(&self, default_size: usize) -> (usize, usize) {
        (
            self.page_index.unwrap_or(1),
            self.page_size.unwrap_or(default_size),
        )
    }
}

pub async fn list_jobs(
    State(service): State<AppState>,
    Query(params): Query<PageParams>,
) -> HttpResult<Json<Page<JobInfo>>> {
    let (page_index, page_size) = params.resolve(service.config().default_page_size);
    let page = service
        .list_jobs(page_index, page_size, params.searched_job.as_deref())
        .await?;
    Ok(Json(page))
}

pub async fn list_job_executions(
    State(service): State<AppState>,
    Query(params): Query<PageParams>,
) -> HttpResult<Json<Page<JobExecutionInfo>>> {
    let (page_index, page_size) = params.resolve(service.config().default_page_size);
    let page = service.list_job_executions(page_index, page_size).await?;
    let now = Utc::now();
    Ok(Json(map_page(page, |je| JobExecutionInfo::new(je, now))))
}

pub async fn job_executions_for_job(
    State(service): State<AppState>,
    Path(job_name): Path<String>,
    Query(params): Query<PageParams>,
) -> HttpResult<Json<Page<JobExecutionInfo>>> {
    let (page_index, page_size) = params.resolve(JOB_EXECUTIONS_PAGE_SIZE);
    let page = service
        .list_job_executions_for_job(&job_name, page_index, page_size)
        .await?;
    let now = Utc::now();
    Ok(Json(map_page(page, |je| JobExecutionInfo::new(je, now))))
}

/// A single job execution wrapped in a page whose total counts every job
/// execution in the store.
pub async fn job_execution_by_id(
    State(service): State<AppState>,
    Path((job_name, job_execution_id)): Path<(String, i64)>,
) -> HttpResult<Json<Page<JobExecutionInfo>>> {
    let job_execution = service.job_execution(job_execution_id).await?;
    if job_execution.job_name() != job_name {
        return Err(ApiError::NoSuchJobExecution(job_execution_id).into());
    }
    let total_items = service.count_job_executions().await?;
    Ok(Json(Page {
        page_index: 0,
        page_size: 0,
        total_items,
        results: vec![JobExecutionInfo::new(&job_execution, Utc::now())],
    }))
}

pub async fn job_history(
    State(service): State<AppState>,
    Path(job_name): Path<String>,
) -> HttpResult<Json<JobExecutionHistorySummary>> {
    let history = service.job_history(&job_name).await?;
    Ok(Json(history.summary()))
}

pub async fn step_executions(
    State(service): State<AppState>,
    Path(job_execution_id): Path<i64>,
) -> HttpResult<Json<Vec<StepExecutionInfo>>> {
    let job_execution = service.job_execution(job_execution_id).await?;
    let steps = service.step_executions(job_execution_id).await?;
    let now = Utc::now();
    Ok(Json(
        steps
            .iter()
            .map(|s| StepExecutionInfo::new(s, job_execution.job_name(), now))
            .collect(),
    ))
}

pub async fn step_execution(
    State(service): State<AppState>,
    Path((job_execution_id, step_execution_id)): Path<(i64, i64)>,
) -> HttpResult<Json<StepExecutionInfo>> {
    let step = service
        .step_execution(job_execution_id, step_execution_id)
        .await?;
    let job_execution = service.job_execution(job_execution_id).await?;
    Ok(Json(StepExecutionInfo::new(
        &step,
        job_execution.job_name(),
        Utc::now(),
    )))
}

pub async fn step_progress(
    State(service): State<AppState>,
    Path((job_execution_id, step_execution_id)): Path<(i64, i64)>,
) -> HttpResult<Json<StepProgressView>> {
    let now = Utc::now();
    let progress = service
        .step_progress_at(job_execution_id, step_execution_id, now)
        .await?;
    Ok(Json(StepProgressView::new(&progress, now)))
}

pub async fn list_job_instances(
    State(service): State<AppState>,
    Path(job_name): Path<String>,
    Query(params): Query<PageParams>,
) -> HttpResult<Json<Vec<JobInstanceView>>> {
    let start = params.start_job.unwrap_or(0);
    let page_size = params.page_size.unwrap_or(JOB_INSTANCES_PAGE_SIZE);
    let instances = service
        .list_job_instances(&job_name, start, page_size)
        .await?;
    let now = Utc::now();
    Ok(Json(
        instances
            .iter()
            .map(|instance| JobInstanceView::new(instance, now))
            .collect(),
    ))
}

/// Executions of one job instance, which must belong to `job_name`.
pub async fn job_instance_details(
    State(service): State<AppState>,
    Path((job_name, job_instance_id)): Path<(String, i64)>,
) -> HttpResult<Json<Vec<JobExecutionInfo>>> {
    let job_instance = service
        .job_instance(job_instance_id)
        .await
        .map_err(|err| match err {
            ApiError::NoSuchJobInstance(_) => HttpError::BadRequest(format!(
                "There is no such job ({job_name}) with JobInstanceID = {job_instance_id}"
            )),
            other => other.into(),
        })?;
    if job_instance.job_name != job_name {
        return Err(HttpError::BadRequest(format!(
            "wrong.job.name {job_name} The JobInstance with id ={job_instance_id} \
             has the wrong name {} not {job_name}",
            job_instance.job_name
        )));
    }
    let job_executions = service
        .job_instance_executions(&job_name, job_instance_id)
        .await?;
    let now = Utc::now();
    Ok(Json(
        job_executions
            .iter()
            .map(|je| JobExecutionInfo::new(je, now))
            .collect(),
    ))
}

pub async fn jobs_tree(
    State(service): State<AppState>,
    Path(job_name): Path<String>,
) -> HttpResult<Json<JobsTreeView>> {
    let tree = service.job_tree(&job_name).await.map_err(|err| match err {
        ApiError::NoSuchJob(_) => HttpError::BadRequest("There is no such jobs".to_string()),
        other => other.into(),
    })?;
    Ok(Json(JobsTreeView::new(&tree)))
}
