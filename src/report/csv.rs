//! CSV output.

use super::Formatter;
use crate::models::{Annotation, ScanResult};
use anyhow::Result;

const HEADER: &str = "kind,name,modules,location,hints";

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, results: &[ScanResult]) -> Result<String> {
        let mut lines = Vec::with_capacity(results.len() + 1);
        lines.push(HEADER.to_string());

        for result in results {
            let modules = match &result.annotation {
                Annotation::RedundantPublicAccessibility { modules } => modules.join("|"),
                _ => String::new(),
            };

            lines.push(
                [
                    result.declaration.kind.as_str().to_string(),
                    result.declaration.name.clone(),
                    modules,
                    result.declaration.location.to_string(),
                    result.annotation.hint().to_string(),
                ]
                .iter()
                .map(|field| escape(field))
                .collect::<Vec<_>>()
                .join(","),
            );
        }

        Ok(lines.join("\n"))
    }
}

/// Quote a field when it contains a delimiter, quote or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::result;
    use crate::models::DeclarationKind;

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(CsvFormatter.format(&[]).unwrap(), HEADER);
    }

    #[test]
    fn test_escapes_commas() {
        let with_comma = result("a.swift", 2, DeclarationKind::Function, "pair(a, b)");

        let output = CsvFormatter.format(&[with_comma]).unwrap();
        let row = output.lines().nth(1).unwrap();
        assert_eq!(row, "function,\"pair(a, b)\",,a.swift:2:1,unused");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("plain"), "plain");
    }
}
