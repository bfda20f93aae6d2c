//! Result grouping and statistics for reports.

use crate::models::{DeclarationKind, ScanResult};
use std::collections::BTreeMap;

/// Group results by file path, keeping each file's results in input order.
pub fn group_by_file(results: &[ScanResult]) -> BTreeMap<&str, Vec<&ScanResult>> {
    let mut grouped: BTreeMap<&str, Vec<&ScanResult>> = BTreeMap::new();

    for result in results {
        grouped
            .entry(result.declaration.location.file.as_str())
            .or_default()
            .push(result);
    }

    grouped
}

/// Count results per declaration kind, most frequent first.
///
/// Ties keep kind order so the table is stable between runs.
pub fn count_by_kind(results: &[ScanResult]) -> Vec<(DeclarationKind, usize)> {
    let mut counts: BTreeMap<DeclarationKind, usize> = BTreeMap::new();

    for result in results {
        *counts.entry(result.declaration.kind).or_default() += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    counts
}
