//! Markdown report generation.
//!
//! This module generates a Markdown report of unused code from the
//! filtered, sorted result set.

use super::Formatter;
use crate::analysis::{count_by_kind, group_by_file};
use crate::models::ScanResult;
use anyhow::Result;
use chrono::Utc;

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format(&self, results: &[ScanResult]) -> Result<String> {
        Ok(generate_markdown_report(results))
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(results: &[ScanResult]) -> String {
    let mut output = String::new();

    output.push_str("# Deadscan Report\n\n");
    output.push_str(&generate_metadata_section(results));
    output.push_str(&generate_summary_section(results));
    output.push_str(&generate_findings_section(results));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(results: &[ScanResult]) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Tool Version:** {}\n",
        env!("CARGO_PKG_VERSION")
    ));
    section.push_str(&format!(
        "- **Files Affected:** {}\n",
        group_by_file(results).len()
    ));
    section.push_str(&format!("- **Total Findings:** {}\n", results.len()));
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(results: &[ScanResult]) -> String {
    let counts = count_by_kind(results);
    if counts.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Kind | Count |\n");
    section.push_str("|:---|:---:|\n");

    for (kind, count) in counts {
        section.push_str(&format!("| {} | {} |\n", kind, count));
    }
    section.push('\n');

    section
}

/// Generate the findings section, one subsection per file.
fn generate_findings_section(results: &[ScanResult]) -> String {
    let mut section = String::new();

    section.push_str("## Findings by File\n\n");

    if results.is_empty() {
        section.push_str("No unused code was found.\n\n");
        return section;
    }

    for (file, file_results) in group_by_file(results) {
        section.push_str(&format!("### `{}`\n\n", file));

        for result in file_results {
            let location = &result.declaration.location;
            section.push_str(&format!(
                "- **{}:{}** {}\n",
                location.line,
                location.column,
                result.description()
            ));
        }
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by Deadscan*\n".to_string()
}
