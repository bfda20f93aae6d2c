//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Deadscan - find unused declarations and gate CI on them
///
/// Resolves the project in the current directory (or through a guided
/// setup), runs the configured analyzer, and reports unused code.
///
/// Examples:
///   deadscan
///   deadscan --format json --output-path unused.log
///   deadscan --strict --report-exclude "Tests/**"
///   deadscan --results analyzer-output.json
///   deadscan --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .deadscan.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text, markdown, json, csv)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Append the rendered output to this file
    #[arg(short, long, value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Exit with code 2 when any unused code is reported
    #[arg(long)]
    pub strict: bool,

    /// Resolve the project through the interactive guided setup
    #[arg(long)]
    pub setup: bool,

    /// Directory containing the project to scan
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Read analyzer results from a JSON file instead of running the analyzer
    #[arg(long, value_name = "FILE")]
    pub results: Option<PathBuf>,

    /// Retain all public declarations
    #[arg(long)]
    pub retain_public: bool,

    /// Retain declarations that are exposed to Objective-C
    #[arg(long)]
    pub retain_objc_accessible: bool,

    /// Targets to analyze (comma-separated)
    #[arg(long, value_name = "TARGETS", value_delimiter = ',')]
    pub targets: Option<Vec<String>>,

    /// Only report declarations in files matching these globs (comma-separated)
    #[arg(long, value_name = "GLOBS", value_delimiter = ',')]
    pub report_include: Option<Vec<String>>,

    /// Never report declarations in files matching these globs (comma-separated)
    ///
    /// Example: --report-exclude "Tests/**,Generated/*"
    #[arg(long, value_name = "GLOBS", value_delimiter = ',')]
    pub report_exclude: Option<Vec<String>>,

    /// Do not check for a newer release
    #[arg(long, env = "DEADSCAN_SKIP_UPDATE_CHECK")]
    pub skip_update_check: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (results only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .deadscan.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref results) = self.results {
            if !results.is_file() {
                return Err(format!("Results file does not exist: {}", results.display()));
            }
        }

        if let Some(ref root) = self.project_root {
            if !root.is_dir() {
                return Err(format!(
                    "Project root is not a directory: {}",
                    root.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
