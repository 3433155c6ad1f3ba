//! Error types for record validation.
//!
//! Only configuration, input and stream problems are errors. Field-level
//! findings are [`Diagnostic`](crate::Diagnostic)s and never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Exit status for configuration errors (unknown format, bad blank columns, ...).
pub const EXIT_CONFIG: i32 = 2;

/// Exit status for a stream that failed part-way through.
pub const EXIT_STREAM: i32 = 3;

/// Exit status for a missing, unreadable or undecodable input file.
pub const EXIT_INPUT: i32 = 128;

/// The declared schema or run configuration is unusable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A column declares a format the registry does not know.
    #[error("Unrecognized format '{format}' for column {column} (known formats: {known})")]
    UnknownFormat {
        /// The offending format name.
        format: String,
        /// 0-based column the format was declared for.
        column: usize,
        /// Comma separated list of registered formats.
        known: String,
    },

    /// The field format list declares no columns.
    #[error("Field format declares no columns")]
    EmptyFieldFormat,

    /// A blank column token is not a whole column number.
    #[error("Invalid blank column '{token}': expected a comma separated list (eg. 0,1,2)")]
    InvalidBlankColumns {
        /// The token that failed to parse.
        token: String,
    },

    /// No built-in preset has the requested name.
    #[error("Unknown defined format '{name}' (acceptable formats: {known})")]
    UnknownPreset {
        /// The requested preset name.
        name: String,
        /// Comma separated list of preset names.
        known: String,
    },

    /// The delimiter is not exactly one ASCII character.
    #[error("Delimiter must be a single ASCII character, got '{0}'")]
    InvalidDelimiter(String),

    /// The sample percentage is above 100.
    #[error("Sample percentage must be between 0 and 100, got {0}")]
    InvalidSamplePercentage(u8),
}

/// The input could not be opened or decoded before validation started.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InputError {
    /// The file is missing or unreadable.
    #[error("Could not find input file {} ({source})", path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The header row could not be decoded (typically not gzip data).
    #[error("Could not decode header of {} ({source})", path.display())]
    Header {
        /// Path of the input file.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: csv::Error,
    },

    /// The decoded stream holds no header row.
    #[error("Input file {} has no header row", path.display())]
    Empty {
        /// Path of the input file.
        path: PathBuf,
    },
}

/// The pipeline stopped before the input was exhausted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Reading the record at `sequence` failed for a reason other than end of stream.
    #[error("Read failure at line {sequence}: {source}")]
    Stream {
        /// File row of the record that failed to read.
        sequence: u64,
        /// Underlying read failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The validation engine went away while records were still being handed off.
    #[error("Validation engine stopped before the input was drained")]
    EngineStopped,
}

/// Any fatal outcome of a validation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProofreadError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`InputError`].
    #[error(transparent)]
    Input(#[from] InputError),
    /// See [`PipelineError`].
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ProofreadError {
    /// Process exit status for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::Input(_) => EXIT_INPUT,
            Self::Pipeline(_) => EXIT_STREAM,
        }
    }
}
