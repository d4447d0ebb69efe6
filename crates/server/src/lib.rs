//! REST adapter exposing job, job instance, job execution and step execution
//! monitoring.

pub mod error;
pub mod handlers;
pub mod representation;

use axum::Router;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use batchlens_core::MonitoringService;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use error::{HttpError, HttpResult};

pub fn build_router(service: Arc<MonitoringService>) -> Router {
    Router::new()
        .route("/jobs", get(handlers::list_jobs))
        .route("/jobs/executions", get(handlers::list_job_executions))
        .route(
            "/jobs/executions/{job_execution_id}/steps",
            get(handlers::step_executions),
        )
        .route(
            "/jobs/executions/{job_execution_id}/steps/{step_execution_id}",
            get(handlers::step_execution),
        )
        .route(
            "/jobs/executions/{job_execution_id}/steps/{step_execution_id}/progress",
            get(handlers::step_progress),
        )
        .route(
            "/jobs/{job_name}/job-executions",
            get(handlers::job_executions_for_job),
        )
        .route(
            "/jobs/{job_name}/job-executions/{job_execution_id}",
            get(handlers::job_execution_by_id),
        )
        .route("/jobs/jobs-tree/{job_name}", get(handlers::jobs_tree))
        .route(
            "/jobs/{job_name}/job-instances",
            get(handlers::list_job_instances),
        )
        .route(
            "/jobs/{job_name}/job-instances/{job_instance_id}",
            get(handlers::job_instance_details),
        )
        .route("/jobs/{job_name}/history", get(handlers::job_history))
        .layer(middleware::from_fn(log_request))
        .with_state(service)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    debug!(%method, %uri, status = response.status().as_u16(), "handled request");
    response
}

/// Serve the REST API on `addr` until `cancel_token` is cancelled.
pub async fn run_http_server(
    service: Arc<MonitoringService>,
    addr: &str,
    cancel_token: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("REST server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await?;
    Ok(())
}
