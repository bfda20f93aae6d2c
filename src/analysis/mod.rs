//! Post-processing of analysis results.
//!
//! Results coming back from the analysis routine are filtered, then sorted,
//! before any formatter sees them.

pub mod aggregator;
pub mod filter;
pub mod sorter;

pub use aggregator::{count_by_kind, group_by_file};
pub use filter::ResultFilter;
pub use sorter::sort_results;
