//! contract-risk - deterministic EVM contract risk classifier
//!
//! Reads snapshot documents (bytecode, ABI, explorer metadata) and prints a
//! risk report for each one.

use contract_risk::utils::constants::{APP_NAME, APP_VERSION};
use contract_risk::{
    AppError, ContractAnalyzer, ContractSnapshot, OutputFormat, ReportConfig, ScanTelemetry,
    INDICATORS, TABLE_VERSION,
};

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(
    name = "contract-risk",
    version,
    about = "Deterministic EVM contract risk classifier",
    long_about = None,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse one or more snapshot JSON files.
    Analyze(AnalyzeArgs),
    /// Print the indicator metadata table as JSON.
    Indicators,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Snapshot documents to analyse.
    #[arg(required = true, value_name = "SNAPSHOT")]
    snapshots: Vec<PathBuf>,
    /// Output format: text or json.
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,
    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
    /// Print a batch summary after all snapshots.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ReportConfig::from_env()?;

    if let Command::Analyze(args) = &cli.command {
        if let Some(format) = args.format.as_deref() {
            config.format = OutputFormat::parse(format)?;
        }
        config.pretty |= args.pretty;
        config.batch_summary |= args.summary;
    }

    // Logs go to stderr so JSON on stdout stays parseable
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("{} v{} (tables {})", APP_NAME, APP_VERSION, TABLE_VERSION);
    debug!("Report config: {:?}", config);

    match cli.command {
        Command::Indicators => {
            println!("{}", serde_json::to_string_pretty(&INDICATORS)?);
            Ok(())
        }
        Command::Analyze(args) => {
            let failures = run_analyze(&args.snapshots, &config)?;
            if failures > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn load_snapshot(path: &Path) -> Result<ContractSnapshot, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::snapshot_io(path.display(), e))?;
    ContractSnapshot::from_json(&text)
}

/// Analyse every snapshot; returns how many failed to load
fn run_analyze(paths: &[PathBuf], config: &ReportConfig) -> Result<u64> {
    let telemetry = ScanTelemetry::new();

    for path in paths {
        let snapshot = match load_snapshot(path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("❌ {}: {}", path.display(), e);
                telemetry.record_failure();
                continue;
            }
        };

        let result = ContractAnalyzer::analyze(&snapshot);
        telemetry.record(&result);

        match config.format {
            OutputFormat::Text => {
                println!("📄 {}", path.display());
                println!("{}", result.summary());
                println!();
            }
            OutputFormat::Json => {
                let report = result.to_report();
                let rendered = if config.pretty {
                    serde_json::to_string_pretty(&report)?
                } else {
                    serde_json::to_string(&report)?
                };
                println!("{}", rendered);
            }
        }
    }

    let stats = telemetry.get_stats();
    if config.batch_summary {
        match config.format {
            OutputFormat::Text => println!("{}", stats.text_summary()),
            OutputFormat::Json => println!("{}", stats.to_json(config.pretty)),
        }
    }

    Ok(stats.total_failed)
}
