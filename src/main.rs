//! Deadscan - unused declaration scan runner
//!
//! A CLI tool that resolves the project to scan, runs an unused-declaration
//! analyzer against it, and reports the results in a stable order.
//!
//! Exit codes:
//!   0 - Success (no results, or strict mode off)
//!   1 - Runtime error (config, project, analyzer, output failure)
//!   2 - Results reported with --strict

mod analysis;
mod analyzer;
mod cli;
mod config;
mod error;
mod models;
mod orchestrator;
mod output;
mod project;
mod report;
mod update;

use analyzer::AnalysisSource;
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use error::ScanError;
use orchestrator::ScanOrchestrator;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Configuration decides the log level, so it is loaded first
    let setup = ScanOrchestrator::setup(args.config.as_deref(), |config| {
        config.merge_with_args(&args)
    });

    // Initialize logging
    let level = match setup {
        Ok(ref orchestrator) => orchestrator.config().general.log_level(),
        Err(_) => args.log_level(),
    };
    init_logging(level);

    info!("Deadscan v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let outcome = match setup {
        Ok(orchestrator) => run_scan(&args, orchestrator).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => std::process::exit(0),
        Err(ScanError::FoundIssues { count }) => {
            eprintln!(
                "\n⛔ {} result(s) reported in strict mode. Failing (exit code 2).",
                count
            );
            std::process::exit(2);
        }
        Err(e) => {
            error!("Scan failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Handle --init-config: generate a default .deadscan.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to configure the analyzer, report filters and strict mode.");
    Ok(())
}

/// Initialize logging at `level`.
///
/// Logs go to stderr so they never mix with results on stdout.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
}

/// Pick the analysis routine and run the scan.
async fn run_scan(args: &Args, orchestrator: ScanOrchestrator) -> Result<(), ScanError> {
    debug!("Configuration: {:?}", orchestrator.config());

    let config = orchestrator.config();
    let source = AnalysisSource::select(
        args.results.as_deref(),
        &config.analyzer,
        &config.scan,
        !config.general.quiet,
    )?;

    let orchestrator = match args.project_root {
        Some(ref root) => orchestrator.with_working_dir(root.clone()),
        None => orchestrator,
    };

    orchestrator.run(|project| source.analyze(project)).await
}
