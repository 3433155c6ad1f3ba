//! Validation engine: drains the handoff and checks every field.

use std::sync::mpsc::Receiver;

use tracing::debug;

use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::record::Record;
use crate::schema::Schema;

/// Counts kept by the engine while draining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Records received from the handoff.
    pub records_checked: u64,
    /// Records whose field count differed from the schema.
    pub column_count_mismatches: u64,
    /// Fields that failed their format rule.
    pub format_failures: u64,
}

/// Consumer side of the pipeline. Holds the schema read-only.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    schema: &'a Schema,
}

impl<'a> Engine<'a> {
    /// Engine checking records against `schema`.
    #[must_use]
    pub const fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Check one record, passing each finding to `emit` as it is found.
    ///
    /// A field count mismatch is reported once and the fields that do have a
    /// column are still checked. Fields past the last column, and columns
    /// past the last field, are skipped. Empty values in blank-allowed
    /// columns pass and are only noted at `debug` level.
    pub fn check_record<F>(&self, record: &Record, mut emit: F)
    where
        F: FnMut(Diagnostic),
    {
        let expected = self.schema.len();
        if record.fields.len() != expected {
            emit(Diagnostic {
                sequence: record.sequence,
                kind: DiagnosticKind::ColumnCount {
                    found: record.fields.len(),
                    expected,
                },
            });
        }

        for (index, value) in record.fields.iter().enumerate() {
            let Some(column) = self.schema.column(index) else {
                break;
            };
            if column.blank_allowed() && value.is_empty() {
                debug!(
                    "L:{} C:{index} H:{} has no value",
                    record.sequence,
                    column.header()
                );
                continue;
            }
            if !column.rule().matches(value) {
                emit(Diagnostic {
                    sequence: record.sequence,
                    kind: DiagnosticKind::Format {
                        column: index,
                        header: column.header().to_owned(),
                        value: value.clone(),
                        format: column.format(),
                    },
                });
            }
        }
    }

    /// Check records in arrival order until the handoff is closed.
    #[must_use]
    pub fn drain(&self, handoff: Receiver<Record>, sink: &dyn DiagnosticSink) -> EngineStats {
        let mut stats = EngineStats::default();
        for record in handoff {
            stats.records_checked += 1;
            self.check_record(&record, |diagnostic| {
                match diagnostic.kind {
                    DiagnosticKind::ColumnCount { .. } => stats.column_count_mismatches += 1,
                    DiagnosticKind::Format { .. } => stats.format_failures += 1,
                }
                sink.report(&diagnostic);
            });
        }
        debug!(records = stats.records_checked, "handoff closed, engine drained");
        stats
    }
}
