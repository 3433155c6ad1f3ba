//! Run summary rendering.
//!
//! Findings themselves are streamed to the sink while the run is in progress;
//! these writers only render the final [`ValidationReport`].

use std::io::{self, Write};

use crate::report::ValidationReport;

/// Write the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ValidationReport, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)
}

/// Write the report as plain text.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ValidationReport, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "{}", "=".repeat(60))?;
    writeln!(writer, "  PROOFREAD SUMMARY")?;
    writeln!(writer, "{}", "=".repeat(60))?;
    writeln!(writer, "  Records read:        {}", report.records_read)?;
    if report.records_skipped > 0 {
        writeln!(writer, "  Records skipped:     {}", report.records_skipped)?;
    }
    writeln!(writer, "  Records checked:     {}", report.records_checked)?;
    writeln!(writer, "  Count mismatches:    {}", report.column_count_mismatches)?;
    writeln!(writer, "  Format failures:     {}", report.format_failures)?;
    writeln!(writer, "  Sampling seed:       {}", report.seed)?;
    writeln!(writer, "{}", "=".repeat(60))?;
    if report.is_clean() {
        writeln!(writer, "All {} checked records passed", report.records_checked)?;
    } else {
        writeln!(
            writer,
            "{} finding(s) in {} checked records",
            report.findings(),
            report.records_checked
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineStats;
    use crate::source::SourceStats;

    fn report(format_failures: u64) -> ValidationReport {
        ValidationReport::new(
            17,
            SourceStats {
                records_read: 10,
                records_skipped: 0,
                records_forwarded: 8,
            },
            EngineStats {
                records_checked: 8,
                column_count_mismatches: 1,
                format_failures,
            },
        )
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&report(2), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["records_read"], 10);
        assert_eq!(value["records_forwarded"], 8);
        assert_eq!(value["format_failures"], 2);
        assert_eq!(value["seed"], 17);
    }

    #[test]
    fn test_write_human() {
        let mut out = Vec::new();
        write_human(&report(2), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Records read:        10"));
        assert!(text.contains("3 finding(s) in 8 checked records"));
        assert!(!text.contains("Records skipped"));
    }
}
