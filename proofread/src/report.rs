//! Run summary.

use serde::Serialize;

use crate::engine::EngineStats;
use crate::source::SourceStats;

/// Outcome of a completed run.
///
/// Findings are reports, not failures: a run that reaches this point
/// succeeded no matter how many findings it produced.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ValidationReport {
    /// Records read from the input, header excluded.
    pub records_read: u64,
    /// Leading records passed over without validation.
    pub records_skipped: u64,
    /// Records selected by sampling and handed to the engine.
    pub records_forwarded: u64,
    /// Records the engine checked.
    pub records_checked: u64,
    /// Records whose field count differed from the schema.
    pub column_count_mismatches: u64,
    /// Fields that failed their format rule.
    pub format_failures: u64,
    /// Seed that reproduces the sampling decisions of this run.
    pub seed: u64,
}

impl ValidationReport {
    /// Combine source and engine counts into the run summary.
    #[must_use]
    pub const fn new(seed: u64, source: SourceStats, engine: EngineStats) -> Self {
        Self {
            records_read: source.records_read,
            records_skipped: source.records_skipped,
            records_forwarded: source.records_forwarded,
            records_checked: engine.records_checked,
            column_count_mismatches: engine.column_count_mismatches,
            format_failures: engine.format_failures,
            seed,
        }
    }

    /// Total number of findings.
    #[must_use]
    pub const fn findings(&self) -> u64 {
        self.column_count_mismatches + self.format_failures
    }

    /// Whether every checked record passed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.findings() == 0
    }
}
