//! Deterministic ordering of results.

use crate::models::ScanResult;

/// Sort results by declaration identity.
///
/// The key is file path, line, column, kind, name, suppressed flag, and
/// finally the annotation. The order is total, so the output depends only
/// on the multiset of results and never on the order the analysis routine
/// produced them in.
pub fn sort_results(mut results: Vec<ScanResult>) -> Vec<ScanResult> {
    results.sort();
    results
}
