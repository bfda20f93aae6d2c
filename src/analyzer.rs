//! Default analysis routines.
//!
//! The declaration/usage analysis itself lives outside this tool. These
//! routines either read results an analyzer already produced, or run the
//! configured analyzer executable against the resolved project and parse
//! its JSON output.

use crate::config::{AnalyzerConfig, ScanOptions};
use crate::error::ScanError;
use crate::models::ScanResult;
use crate::project::Project;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

/// Where scan results come from.
#[derive(Debug, Clone)]
pub enum AnalysisSource {
    /// Precomputed JSON results file.
    ResultsFile(PathBuf),
    /// Analyzer executable run against the project.
    External(ExternalAnalyzer),
}

impl AnalysisSource {
    /// Pick the results file when given, otherwise the configured analyzer.
    pub fn select(
        results: Option<&Path>,
        analyzer: &AnalyzerConfig,
        options: &ScanOptions,
        show_progress: bool,
    ) -> Result<Self, ScanError> {
        if let Some(path) = results {
            return Ok(AnalysisSource::ResultsFile(path.to_path_buf()));
        }

        let command = analyzer.command.clone().ok_or_else(|| {
            ScanError::configuration(
                "No analyzer configured: set [analyzer].command or pass --results",
            )
        })?;

        Ok(AnalysisSource::External(ExternalAnalyzer {
            command,
            args: analyzer.args.clone(),
            options: options.clone(),
            show_progress,
        }))
    }

    /// Run the analysis for `project`.
    pub fn analyze(&self, project: &Project) -> Result<Vec<ScanResult>, ScanError> {
        match self {
            AnalysisSource::ResultsFile(path) => load_results(path),
            AnalysisSource::External(analyzer) => analyzer.analyze(project),
        }
    }
}

/// Analyzer executable invocation.
#[derive(Debug, Clone)]
pub struct ExternalAnalyzer {
    command: String,
    args: Vec<String>,
    options: ScanOptions,
    show_progress: bool,
}

impl ExternalAnalyzer {
    /// Build the command line for `project`.
    fn command_for(&self, project: &Project) -> Command {
        let mut command = Command::new(&self.command);
        command.current_dir(project.root());
        command.args(&self.args);
        command.arg("--project-root").arg(project.root());
        command.arg("--project-kind").arg(project.kind().as_str());

        for target in &self.options.targets {
            command.arg("--target").arg(target);
        }
        if self.options.retain_public {
            command.arg("--retain-public");
        }
        if self.options.retain_objc_accessible {
            command.arg("--retain-objc-accessible");
        }

        command
    }

    /// Run the analyzer to completion and parse its stdout.
    pub fn analyze(&self, project: &Project) -> Result<Vec<ScanResult>, ScanError> {
        info!("Running analyzer: {}", self.command);
        let mut command = self.command_for(project);
        debug!("Analyzer command: {:?}", command);

        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Analyzing...");
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });

        let output = command.output();

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let output = output.map_err(|e| {
            ScanError::analysis(format!("Failed to run analyzer '{}': {}", self.command, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::analysis(format!(
                "Analyzer '{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let results = parse_results(&stdout)?;
        info!("Analyzer reported {} results", results.len());
        Ok(results)
    }
}

/// Read a JSON results file.
pub fn load_results(path: &Path) -> Result<Vec<ScanResult>, ScanError> {
    info!("Reading results from: {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        ScanError::analysis(format!(
            "Failed to read results file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_results(&content)
}

/// Parse a JSON array of scan results.
pub fn parse_results(json: &str) -> Result<Vec<ScanResult>, ScanError> {
    serde_json::from_str(json.trim())
        .map_err(|e| ScanError::analysis(format!("Malformed analyzer output: {}", e)))
}
