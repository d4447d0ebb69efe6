use crate::view::StatisticsRow;
use batchlens_core::MonitoringConfig;
use tabled::{Table, settings::Style};

pub async fn run(
    config: MonitoringConfig,
    job_name: &str,
    step_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = batchlens_runtime::build_default_service(&config).await?;
    let history = service.step_history(job_name, step_name).await?;

    if history.count() == 0 {
        println!("No completed executions of '{}' in job '{}'.", step_name, job_name);
        return Ok(());
    }

    println!(
        "{} completed executions of '{}'",
        history.count(),
        history.step_name()
    );
    let rows: Vec<StatisticsRow> = history
        .statistics()
        .iter()
        .map(|(name, stats)| StatisticsRow::new(name, stats))
        .collect();
    println!("{}", Table::new(rows).with(Style::psql()).to_string());
    Ok(())
}
