use batchlens_core::MonitoringConfig;

pub async fn run(
    config: MonitoringConfig,
    job_execution_id: i64,
    step_execution_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = batchlens_runtime::build_default_service(&config).await?;
    let progress = service
        .step_progress(job_execution_id, step_execution_id)
        .await?;

    let step = &progress.step_execution;
    println!(
        "{} / {} [{}] {}",
        progress.job_name, step.step_name, step.id, step.status
    );
    println!("{}", progress.estimate.message());
    println!(
        "History: {} completed executions matching '{}'",
        progress.history.count(),
        progress.history.step_name()
    );
    Ok(())
}
