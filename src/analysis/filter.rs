//! Removal of results that should never be reported.

use crate::config::ReportConfig;
use crate::error::ScanError;
use crate::models::ScanResult;
use glob::Pattern;
use tracing::debug;

/// Drops suppressed declarations and declarations in files outside the
/// configured include/exclude globs.
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl ResultFilter {
    /// Compile the report globs.
    pub fn from_config(config: &ReportConfig) -> Result<Self, ScanError> {
        Ok(Self {
            include: compile(&config.include)?,
            exclude: compile(&config.exclude)?,
        })
    }

    /// Whether a result passes every inclusion predicate.
    pub fn includes(&self, result: &ScanResult) -> bool {
        let declaration = &result.declaration;
        if declaration.suppressed {
            return false;
        }

        let path = declaration.location.file.as_str();
        if self.exclude.iter().any(|pattern| pattern.matches(path)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|pattern| pattern.matches(path))
    }

    /// Keep the results that pass, preserving their relative order.
    pub fn filter(&self, results: Vec<ScanResult>) -> Vec<ScanResult> {
        let total = results.len();
        let kept: Vec<ScanResult> = results.into_iter().filter(|r| self.includes(r)).collect();

        if kept.len() != total {
            debug!("Filtered out {} of {} results", total - kept.len(), total);
        }

        kept
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, ScanError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| {
                ScanError::configuration(format!("Invalid report pattern '{}': {}", pattern, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{result, suppressed};
    use crate::models::DeclarationKind;

    fn filter_with(include: &[&str], exclude: &[&str]) -> ResultFilter {
        ResultFilter::from_config(&ReportConfig {
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        })
        .unwrap()
    }

    fn sample() -> Vec<ScanResult> {
        vec![
            result("Sources/App/View.swift", 4, DeclarationKind::Class, "View"),
            suppressed("Sources/App/Legacy.swift", 1, DeclarationKind::Class, "Legacy"),
            result("Tests/AppTests/ViewTests.swift", 8, DeclarationKind::Method, "helper()"),
            result("Sources/Core/Math.swift", 2, DeclarationKind::Function, "clamp(_:)"),
        ]
    }

    #[test]
    fn test_drops_suppressed_by_default() {
        let kept = ResultFilter::default().filter(sample());
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|r| !r.declaration.suppressed));
    }

    #[test]
    fn test_exclude_globs() {
        let kept = filter_with(&[], &["Tests/**"]).filter(sample());
        let names: Vec<_> = kept.iter().map(|r| r.declaration.name.as_str()).collect();
        assert_eq!(names, vec!["View", "clamp(_:)"]);
    }

    #[test]
    fn test_include_globs() {
        let kept = filter_with(&["Sources/Core/*"], &[]).filter(sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].declaration.name, "clamp(_:)");
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let kept = filter_with(&["Sources/**"], &["Sources/Core/**"]).filter(sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].declaration.name, "View");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = filter_with(&["**/*.swift"], &["Tests/**"]);
        let once = filter.filter(sample());
        let twice = filter.filter(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        let error = ResultFilter::from_config(&ReportConfig {
            include: vec!["[".to_string()],
            exclude: vec![],
        })
        .unwrap_err();
        assert!(matches!(error, ScanError::Configuration(_)));
    }
}
