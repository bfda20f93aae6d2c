//! Compiler-style text output.

use super::Formatter;
use crate::models::ScanResult;
use anyhow::Result;

/// Shown when nothing is reported.
pub const NO_RESULTS_MESSAGE: &str = "* No unused code detected.";

/// Renders `file:line:column: warning: description` lines, which editors
/// and CI log viewers pick up as diagnostics.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, results: &[ScanResult]) -> Result<String> {
        if results.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let lines: Vec<String> = results
            .iter()
            .map(|result| {
                format!(
                    "{}: warning: {}",
                    result.declaration.location,
                    result.description()
                )
            })
            .collect();

        Ok(lines.join("\n"))
    }
}
