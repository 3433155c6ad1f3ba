//! # proofread
//!
//! Streaming schema validator for compressed, delimited record files.
//!
//! Each column of the input declares a named format (`uuid`, `int`, `lat`,
//! ...). Records are read from the file on one thread and handed one at a
//! time to a validation engine on another; every field that does not match
//! its column's format is reported to a [`DiagnosticSink`] and the run keeps
//! going. Only configuration and input problems stop a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use proofread::{TracingSink, ValidationConfig, validate_file};
//!
//! let mut config = ValidationConfig::default();
//! config.input = PathBuf::from("events.csv.gz");
//! config.field_format = "uuid,int,cc".to_owned();
//! config.delimiter = ',';
//!
//! let report = validate_file(&config, &TracingSink).unwrap();
//! println!("Records checked: {}", report.records_checked);
//! println!("Findings: {}", report.findings());
//! ```

mod config;
mod diagnostic;
mod engine;
mod error;
pub mod output;
pub mod pipeline;
mod record;
mod registry;
mod report;
mod schema;
mod source;
pub mod strategy;

pub use config::{DEFAULT_FIELD_FORMAT, PRESETS, Preset, ValidationConfig, preset_names};
pub use diagnostic::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use engine::{Engine, EngineStats};
pub use error::{
    ConfigError, EXIT_CONFIG, EXIT_INPUT, EXIT_STREAM, InputError, PipelineError, ProofreadError,
};
pub use record::{FIRST_RECORD_SEQUENCE, Record};
pub use registry::{FormatRegistry, FormatRule};
pub use report::ValidationReport;
pub use schema::{ColumnSpec, Schema, build_schema, parse_blank_columns};
pub use source::{RecordSource, Sampler, SourceStats};

use tracing::info;

/// Validate a gzip-compressed delimited file.
///
/// Configuration is checked and every format resolved before the file is
/// opened; the header row then only supplies column labels. Findings go to
/// `sink` while the run progresses.
///
/// # Errors
///
/// Returns [`ProofreadError::Config`] for an unusable configuration (unknown
/// format, malformed blank columns, bad delimiter or sample percentage),
/// [`ProofreadError::Input`] if the file cannot be opened or decoded, and
/// [`ProofreadError::Pipeline`] if reading fails part-way through.
pub fn validate_file(
    config: &ValidationConfig,
    sink: &dyn DiagnosticSink,
) -> Result<ValidationReport, ProofreadError> {
    let delimiter = config.delimiter_byte()?;
    let sampler = Sampler::new(config.sample_percentage, config.seed)?;
    let schema = build_schema(
        FormatRegistry::builtin(),
        &config.field_formats(),
        &[] as &[&str],
        &config.blank_columns,
    )?;

    let input = strategy::gzip::open(&config.input, delimiter)?;
    let schema = schema.with_header(input.header());
    if input.header().len() != schema.len() {
        info!(
            "header has {} columns, field format declares {}",
            input.header().len(),
            schema.len()
        );
    }
    if config.display_header {
        schema.log_header_mapping();
    }
    if config.seed.is_none() && (1..100).contains(&sampler.percentage()) {
        info!("Sampling {}% with seed {}", sampler.percentage(), sampler.seed());
    }
    if config.skip_lines > 0 {
        info!("Skipping the first {} records", config.skip_lines);
    }

    info!("Start processing - {}", config.input.display());
    let source = RecordSource::new(input.into_records(), sampler, config.progress_interval)
        .skip_first(config.skip_lines);
    let report = pipeline::run(&schema, source, sink)?;
    Ok(report)
}
