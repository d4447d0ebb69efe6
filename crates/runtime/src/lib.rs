use batchlens_core::store::InMemoryExecutionStore;
use batchlens_core::{MonitoringConfig, MonitoringService};
use std::sync::Arc;

/// Bootstraps a monitoring service backed by the in-memory store.
///
/// When the configuration names a snapshot file, the store is seeded from
/// it; otherwise the service starts with no executions.
pub async fn build_default_service(
    config: &MonitoringConfig,
) -> batchlens_core::Result<MonitoringService> {
    let store = match &config.snapshot_path {
        Some(path) => InMemoryExecutionStore::load(path).await?,
        None => {
            tracing::warn!("No snapshot configured, starting with an empty store");
            InMemoryExecutionStore::new()
        }
    };
    Ok(MonitoringService::new(Arc::new(store), config.clone()))
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(batchlens_core::logging::init_logging(component, to_stderr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchlens_api::{JobExecution, StepExecution, StoreSnapshot};

    #[tokio::test]
    async fn empty_service_without_snapshot() {
        let service = build_default_service(&MonitoringConfig::default())
            .await
            .unwrap();
        assert_eq!(service.count_job_executions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn service_is_seeded_from_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut job_execution: JobExecution = serde_json::from_value(serde_json::json!({
            "id": 7,
            "job_instance": { "id": 1, "job_name": "nightly" },
            "status": "COMPLETED",
            "create_time": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        job_execution
            .step_executions
            .push(StepExecution::new(70, 7, "load"));
        let snapshot = StoreSnapshot {
            job_executions: vec![job_execution],
        };
        std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let config = MonitoringConfig {
            snapshot_path: Some(path),
            ..MonitoringConfig::default()
        };
        let service = build_default_service(&config).await.unwrap();
        assert_eq!(service.count_job_executions().await.unwrap(), 1);
        assert_eq!(service.step_executions(7).await.unwrap().len(), 1);
    }
}
