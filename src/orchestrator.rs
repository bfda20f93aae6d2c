//! Scan orchestration.
//!
//! `ScanOrchestrator` drives one run: resolve the project, start the release
//! check, run the analysis routine, filter and sort its results, render and
//! emit them, then apply the strict-mode policy.

use crate::analysis::{sort_results, ResultFilter};
use crate::config::Config;
use crate::error::ScanError;
use crate::models::ScanResult;
use crate::output::{append_line_to_file, OutputSink};
use crate::project::{GuidedSetup, Project, PromptSetup, Resolution};
use crate::update::{GithubReleases, ReleaseSource, UpdateNotifier};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Coordinates a single scan run over an immutable configuration.
pub struct ScanOrchestrator {
    config: Config,
    filter: ResultFilter,
    sink: OutputSink,
    working_dir: PathBuf,
    guided_setup: Box<dyn GuidedSetup>,
    release_source: Option<Arc<dyn ReleaseSource>>,
}

impl ScanOrchestrator {
    /// Load configuration from `config_path` (or the default location),
    /// apply `overrides`, and build an orchestrator around the result.
    pub fn setup(
        config_path: Option<&Path>,
        overrides: impl FnOnce(&mut Config),
    ) -> Result<Self, ScanError> {
        let mut config = Config::discover(config_path)?;
        overrides(&mut config);
        Self::new(config)
    }

    /// Build an orchestrator with production collaborators.
    pub fn new(config: Config) -> Result<Self, ScanError> {
        config.validate()?;
        let filter = ResultFilter::from_config(&config.report)?;

        let release_source: Option<Arc<dyn ReleaseSource>> = if config.update.check {
            match GithubReleases::new(&config.update) {
                Ok(source) => Some(Arc::new(source)),
                Err(e) => {
                    debug!("Update check disabled: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            sink: OutputSink::stdout(config.general.quiet),
            config,
            filter,
            working_dir,
            guided_setup: Box::new(PromptSetup),
            release_source,
        })
    }

    /// Replace the console sink.
    #[cfg(test)]
    pub fn with_sink(mut self, sink: OutputSink) -> Self {
        self.sink = sink;
        self
    }

    /// Directory the project is resolved from.
    pub fn with_working_dir(mut self, working_dir: PathBuf) -> Self {
        self.working_dir = working_dir;
        self
    }

    /// Replace the interactive guided setup.
    #[cfg(test)]
    pub fn with_guided_setup(mut self, guided_setup: Box<dyn GuidedSetup>) -> Self {
        self.guided_setup = guided_setup;
        self
    }

    /// Replace the release source; `None` disables the update check.
    #[cfg(test)]
    pub fn with_release_source(mut self, source: Option<Arc<dyn ReleaseSource>>) -> Self {
        self.release_source = source;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the run with `analysis` as the analysis routine.
    ///
    /// Nothing is printed unless the routine succeeds. With strict mode on,
    /// a non-empty result set yields `ScanError::FoundIssues` after the
    /// output has been emitted.
    pub async fn run<F>(self, analysis: F) -> Result<(), ScanError>
    where
        F: FnOnce(&Project) -> Result<Vec<ScanResult>, ScanError>,
    {
        let ScanOrchestrator {
            config,
            filter,
            mut sink,
            working_dir,
            guided_setup,
            release_source,
        } = self;

        debug!(version = env!("CARGO_PKG_VERSION"), "Starting scan");

        let project = Resolution::from_config(&config).resolve(&working_dir, guided_setup.as_ref())?;
        info!(
            "Scanning {} project at {}",
            project.kind(),
            project.root().display()
        );
        debug!("Project manifest: {:?}", project.manifest());

        let updates = match release_source {
            Some(source) => UpdateNotifier::start(source, env!("CARGO_PKG_VERSION")),
            None => UpdateNotifier::disabled(),
        };

        let results = analysis(&project)?;
        debug!("Analysis returned {} results", results.len());

        let results = sort_results(filter.filter(results));

        let format = config.general.format;
        let output = format.formatter().format(&results)?;
        sink.emit(&output)?;

        if let Some(ref output_path) = config.general.output_path {
            append_line_to_file(Path::new(output_path), &output)?;
            info!("Output appended to {}", output_path);
        }

        if !results.is_empty() && format.supports_auxiliary_output() {
            sink.info(&false_positive_hint())?;
        }

        if let Some(notification) = updates.finish().await {
            sink.info(&notification)?;
        }

        strict_outcome(results.len(), config.general.strict)
    }
}

/// Strict-mode policy: any reported result fails the run.
pub fn strict_outcome(count: usize, strict: bool) -> Result<(), ScanError> {
    if count > 0 && strict {
        warn!("Strict mode: {} result(s) reported", count);
        return Err(ScanError::FoundIssues { count });
    }
    Ok(())
}

/// Advisory block printed after text results.
fn false_positive_hint() -> String {
    let bullet = "\n - ".green().bold();
    let mut hint = String::new();

    hint.push_str(&format!(
        "\n{}{}",
        "* ".green().bold(),
        "Seeing false positives?".bold()
    ));
    hint.push_str(&format!(
        "{}Only the targets you specify are analyzed.\n   \
         References to declarations reported as unused may live in other targets, e.g. test targets.",
        bullet
    ));
    hint.push_str(&format!(
        "{}By default, public declarations are not assumed to be in use.\n   \
         You can instruct the analyzer to retain them with the {} option.",
        bullet,
        "--retain-public".bold()
    ));
    hint.push_str(&format!(
        "{}False positives often turn out to be correct after further investigation.",
        bullet
    ));
    hint.push_str(&format!(
        "{}If it really is a false positive, please report it with the affected declaration.",
        bullet
    ));

    hint
}
