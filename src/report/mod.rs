//! Result formatters.
//!
//! Each output format renders an already filtered and sorted slice of
//! results to a single string.

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

use crate::models::ScanResult;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Renders a result set to text.
pub trait Formatter {
    fn format(&self, results: &[ScanResult]) -> Result<String>;
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `file:line:column: warning:` line per result (default)
    #[default]
    Text,
    /// Markdown report
    Markdown,
    /// JSON array
    Json,
    /// Comma-separated values
    Csv,
}

impl OutputFormat {
    /// Formatter implementing this format.
    pub fn formatter(&self) -> Box<dyn Formatter> {
        match self {
            OutputFormat::Text => Box::new(text::TextFormatter),
            OutputFormat::Markdown => Box::new(markdown::MarkdownFormatter),
            OutputFormat::Json => Box::new(json::JsonFormatter),
            OutputFormat::Csv => Box::new(csv::CsvFormatter),
        }
    }

    /// Whether advisory output may follow the results without corrupting them.
    pub fn supports_auxiliary_output(&self) -> bool {
        matches!(self, OutputFormat::Text)
    }
}
