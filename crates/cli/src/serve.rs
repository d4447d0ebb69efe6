use batchlens_core::MonitoringConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run(config: MonitoringConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = batchlens_runtime::build_default_service(&config).await?;

    let cancel_token = CancellationToken::new();
    let shutdown = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down...");
            shutdown.cancel();
        }
    });

    batchlens_server::run_http_server(Arc::new(service), &config.bind_address, cancel_token).await
}
