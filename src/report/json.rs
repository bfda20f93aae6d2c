//! JSON output.

use super::Formatter;
use crate::models::ScanResult;
use anyhow::{Context, Result};
use serde::Serialize;

pub struct JsonFormatter;

/// Flattened record; the description is included so consumers don't need
/// to re-derive it.
#[derive(Serialize)]
struct JsonRecord<'a> {
    kind: &'static str,
    name: &'a str,
    location: String,
    hint: &'static str,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    modules: Option<&'a [String]>,
}

impl Formatter for JsonFormatter {
    fn format(&self, results: &[ScanResult]) -> Result<String> {
        let records: Vec<JsonRecord<'_>> = results
            .iter()
            .map(|result| JsonRecord {
                kind: result.declaration.kind.as_str(),
                name: &result.declaration.name,
                location: result.declaration.location.to_string(),
                hint: result.annotation.hint(),
                description: result.description(),
                modules: match &result.annotation {
                    crate::models::Annotation::RedundantPublicAccessibility { modules } => {
                        Some(modules.as_slice())
                    }
                    _ => None,
                },
            })
            .collect();

        serde_json::to_string_pretty(&records).context("Failed to serialize results to JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::result;
    use crate::models::DeclarationKind;

    #[test]
    fn test_empty_array() {
        assert_eq!(JsonFormatter.format(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_records() {
        let results = vec![result("a.swift", 5, DeclarationKind::Struct, "Point")];
        let output = JsonFormatter.format(&results).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["kind"], "struct");
        assert_eq!(value[0]["name"], "Point");
        assert_eq!(value[0]["location"], "a.swift:5:1");
        assert_eq!(value[0]["hint"], "unused");
        assert!(value[0].get("modules").is_none());
    }
}
