mod history;
mod progress;
mod schema;
mod serve;
mod view;

use batchlens_core::MonitoringConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "batchlens",
    version,
    about = "Progress estimation and history for batch step executions",
    long_about = "Batchlens tracks job and step executions of a batch system and estimates \
                  how far a running step has progressed by comparing it with the history of \
                  earlier executions of the same step."
)]
pub struct Cli {
    /// Path to a JSON configuration file. Defaults to ~/.batchlens/config.json.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST monitoring server
    Serve {
        /// Address to bind, overriding the configured one
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
        /// Snapshot used to seed the execution store
        #[arg(long, value_name = "SNAPSHOT")]
        snapshot: Option<PathBuf>,
    },
    /// Estimate the progress of one step execution
    Progress {
        #[arg(long, value_name = "SNAPSHOT")]
        snapshot: Option<PathBuf>,
        #[arg(long, value_name = "ID")]
        job_execution: i64,
        #[arg(long, value_name = "ID")]
        step_execution: i64,
    },
    /// Print historical statistics of a step
    #[command(
        long_about = "Aggregates every completed execution of the step in the given job. \
                      A trailing partition suffix (`name:partition3`) is widened so all \
                      partitions of the step are included."
    )]
    History {
        #[arg(long, value_name = "SNAPSHOT")]
        snapshot: Option<PathBuf>,
        #[arg(long)]
        job: String,
        #[arg(long)]
        step: String,
    },
    /// Print the JSON schema of store snapshot files
    Schema,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Serve { .. } => "server",
        _ => "cli",
    };
    let to_stderr = matches!(cli.command, Commands::Serve { .. });
    let _guard = batchlens_runtime::init_logging(component, to_stderr);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Schema => schema::run(),
        Commands::Serve { bind, snapshot } => {
            let mut config = load_config(cli.config.as_deref(), snapshot)?;
            if let Some(bind) = bind {
                config.bind_address = bind;
            }
            rt.block_on(serve::run(config))
        }
        Commands::Progress {
            snapshot,
            job_execution,
            step_execution,
        } => {
            let config = load_config(cli.config.as_deref(), snapshot)?;
            rt.block_on(progress::run(config, job_execution, step_execution))
        }
        Commands::History {
            snapshot,
            job,
            step,
        } => {
            let config = load_config(cli.config.as_deref(), snapshot)?;
            rt.block_on(history::run(config, &job, &step))
        }
    }
}

fn load_config(
    path: Option<&Path>,
    snapshot: Option<PathBuf>,
) -> Result<MonitoringConfig, Box<dyn std::error::Error>> {
    let mut config = MonitoringConfig::load(path)?;
    if snapshot.is_some() {
        config.snapshot_path = snapshot;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_dispatched_like_other_commands() {
        let cli = Cli::try_parse_from(["batchlens", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Schema));
        assert!(schema::run().is_ok());
    }

    #[test]
    fn history_requires_job_and_step() {
        assert!(Cli::try_parse_from(["batchlens", "history", "--job", "import"]).is_err());
        let cli =
            Cli::try_parse_from(["batchlens", "history", "--job", "import", "--step", "load"])
                .unwrap();
        assert!(matches!(cli.command, Commands::History { .. }));
    }
}
