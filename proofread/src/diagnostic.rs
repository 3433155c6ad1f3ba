//! Findings produced by the engine and the sinks that receive them.
//!
//! A sink is shared by the record source (progress) and the engine
//! (findings), so implementations must accept concurrent calls. Each call
//! carries one complete message.

use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

/// What was wrong with a record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// The record's field count differs from the schema's column count.
    ColumnCount {
        /// Fields present in the record.
        found: usize,
        /// Columns declared by the schema.
        expected: usize,
    },
    /// A field value failed its column's format rule.
    Format {
        /// 0-based column index.
        column: usize,
        /// Header label of the column.
        header: String,
        /// The literal field value.
        value: String,
        /// Declared format name.
        format: &'static str,
    },
}

/// A single finding for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// File row of the record.
    pub sequence: u64,
    /// The finding.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Format the finding as one human-readable line.
    ///
    /// - format failures: `L:{row} C:{column} H:{header} "{value}" not formatted as "{format}" type`
    /// - count mismatches: `L:{row} items in record ({found}) != items in format ({expected})`
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        match &self.kind {
            DiagnosticKind::ColumnCount { found, expected } => format!(
                "L:{} items in record ({found}) != items in format ({expected})",
                self.sequence
            ),
            DiagnosticKind::Format {
                column,
                header,
                value,
                format,
            } => format!(
                "L:{} C:{column} H:{header} \"{value}\" not formatted as \"{format}\" type",
                self.sequence
            ),
        }
    }

    /// Column index for format failures, `None` for count mismatches.
    #[must_use]
    pub const fn column(&self) -> Option<usize> {
        match &self.kind {
            DiagnosticKind::Format { column, .. } => Some(*column),
            DiagnosticKind::ColumnCount { .. } => None,
        }
    }
}

/// Destination for findings and progress notifications.
pub trait DiagnosticSink: Send + Sync {
    /// Receive one finding.
    fn report(&self, diagnostic: &Diagnostic);

    /// Receive a progress notification after `records_read` records.
    fn progress(&self, records_read: u64);
}

/// Sink that emits every message as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        warn!("{}", diagnostic.format_human_readable());
    }

    fn progress(&self, records_read: u64) {
        info!("Read {records_read} records");
    }
}

/// Sink that keeps everything it receives, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    progress: Mutex<Vec<u64>>,
}

impl CollectingSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings received so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Progress notifications received so far.
    #[must_use]
    pub fn progress_marks(&self) -> Vec<u64> {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }

    fn progress(&self, records_read: u64) {
        self.progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(records_read);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_failure_line() {
        let diag = Diagnostic {
            sequence: 5,
            kind: DiagnosticKind::Format {
                column: 0,
                header: "device_id".to_owned(),
                value: "not-a-uuid".to_owned(),
                format: "uuid",
            },
        };
        assert_eq!(
            diag.format_human_readable(),
            "L:5 C:0 H:device_id \"not-a-uuid\" not formatted as \"uuid\" type"
        );
        assert_eq!(diag.column(), Some(0));
    }

    #[test]
    fn test_column_count_line() {
        let diag = Diagnostic {
            sequence: 9,
            kind: DiagnosticKind::ColumnCount {
                found: 3,
                expected: 2,
            },
        };
        let line = diag.format_human_readable();
        assert!(line.starts_with("L:9 "));
        assert!(line.contains("(3) != items in format (2)"));
        assert_eq!(diag.column(), None);
    }

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        for sequence in [2, 3] {
            sink.report(&Diagnostic {
                sequence,
                kind: DiagnosticKind::ColumnCount {
                    found: 1,
                    expected: 2,
                },
            });
        }
        sink.progress(100);

        let seen: Vec<u64> = sink.diagnostics().iter().map(|d| d.sequence).collect();
        assert_eq!(seen, vec![2, 3]);
        assert_eq!(sink.progress_marks(), vec![100]);
    }
}
