//! Error taxonomy for a scan run.
//!
//! Every stage of the pipeline returns a `ScanError`; only the release
//! check swallows its own failures.

use thiserror::Error;

/// Errors that end a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Configuration could not be read, parsed or validated.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The project could not be resolved or its environment is unusable.
    #[error("Environment validation failed: {0}")]
    EnvironmentValidation(String),

    /// The analysis routine failed.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Strict mode found reportable results. Output has already been emitted.
    #[error("Found {count} issue(s)")]
    FoundIssues { count: usize },

    /// Anything that is not one of the above.
    #[error(transparent)]
    Underlying(#[from] anyhow::Error),
}

impl ScanError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn environment(message: impl Into<String>) -> Self {
        Self::EnvironmentValidation(message.into())
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis(message.into())
    }

    /// Process exit code for this error: 2 for strict-mode findings, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::FoundIssues { .. } => 2,
            _ => 1,
        }
    }
}
