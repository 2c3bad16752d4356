use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use topology::TopologyError;
use topology::topology_file::{self, TopologyFileError};
use topology::types::TopologyRecord;
use traffic::date_range::{DateRange, DateRangeError};
use traffic::prometheus::{Credentials, PrometheusClient, PrometheusError};
use traffic::report::ReportError;

mod config;
mod prompt;
mod telemetry;

use config::Config;
use prompt::Prompter;

#[derive(Parser)]
#[command(version, about = "Tenant traffic weights per database shard group")]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, short, default_value = "hubweight.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// List tenant parameters and write the topology file
    FetchTopology {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch traffic for a date range and write the report files
    Report {
        #[arg(long)]
        topology: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("config has no `{0}` section")]
    MissingSection(&'static str),
    #[error("invalid topology config: {0}")]
    TopologyConfig(#[from] topology::config::ValidationError),
    #[error("invalid traffic config: {0}")]
    TrafficConfig(#[from] traffic::config::ValidationError),
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error(transparent)]
    TopologyFile(#[from] TopologyFileError),
    #[error("could not read answer: {0}")]
    Prompt(#[source] std::io::Error),
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
    #[error(transparent)]
    Prometheus(#[from] PrometheusError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("could not start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Everything the report stage needs, gathered before any network call.
struct ReportPlan {
    config: traffic::config::Config,
    records: Vec<TopologyRecord>,
    credentials: Credentials,
    range: DateRange,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e} ({})", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    let _telemetry = match telemetry::init(&config.common) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "hubweight failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: CliCommand, config: Config) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    match command {
        CliCommand::FetchTopology { output } => {
            let mut topology_config = config
                .topology
                .ok_or(CliError::MissingSection("topology"))?;
            if let Some(output) = output {
                topology_config.output = output;
            }
            topology_config.validate()?;

            let written = rt.block_on(topology::fetch_topology(&topology_config))?;
            println!(
                "Saved {written} tenant records to {}",
                topology_config.output.display()
            );
        }
        CliCommand::Report {
            topology,
            output_dir,
        } => {
            let mut traffic_config = config.traffic.ok_or(CliError::MissingSection("traffic"))?;
            if let Some(topology) = topology {
                traffic_config.topology_file = topology;
            }
            if let Some(output_dir) = output_dir {
                traffic_config.output_dir = output_dir;
            }

            let plan = plan_report(traffic_config, &mut Prompter::stdio())?;
            let client = PrometheusClient::new(&plan.config.prometheus, plan.credentials)?;

            let written = rt.block_on(traffic::build_report(
                &client,
                &plan.records,
                &plan.range,
                &plan.config.output_dir,
            ))?;

            println!(
                "\nProcessing complete. Results are available in: {}",
                plan.config.output_dir.display()
            );
            for report in written {
                println!("- {} ({})", report.file.file_name(), report.file.description());
            }
        }
    }

    Ok(())
}

/// Validates config, loads the topology file and asks for whatever is not
/// configured. Fails before any request is made.
fn plan_report<R: BufRead, W: Write>(
    config: traffic::config::Config,
    prompter: &mut Prompter<R, W>,
) -> Result<ReportPlan, CliError> {
    config.validate()?;
    let records = topology_file::read(&config.topology_file)?;
    tracing::info!(
        path = %config.topology_file.display(),
        records = records.len(),
        "Loaded topology file"
    );

    let username = prompter
        .ask_unless(
            config.prometheus.username.as_deref(),
            "Enter Prometheus username",
        )
        .map_err(CliError::Prompt)?;
    let password = prompter
        .ask_unless(
            config.prometheus.password.as_deref(),
            "Enter Prometheus password",
        )
        .map_err(CliError::Prompt)?;
    let start = prompter
        .ask("Enter start date (YYYY-MM-DD)")
        .map_err(CliError::Prompt)?;
    let end = prompter
        .ask("Enter end date (YYYY-MM-DD)")
        .map_err(CliError::Prompt)?;

    let range = DateRange::parse(&start, &end)?;

    Ok(ReportPlan {
        config,
        records,
        credentials: Credentials { username, password },
        range,
    })
}
