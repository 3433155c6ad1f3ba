use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use proofread::{
    ConfigError, DEFAULT_FIELD_FORMAT, FormatRegistry, Preset, ProofreadError, TracingSink,
    ValidationConfig, output, validate_file,
};
use tracing::info;

use crate::logging;

/// How the run summary is printed on stdout once the input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// No summary; findings are only logged.
    None,
    /// Plain text table.
    Human,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "proofread")]
#[command(version, about = "Validate gzip-compressed delimited records against per-column formats", long_about = None)]
pub struct Cli {
    /// Gzip-compressed delimited file to proofread
    #[arg(long, default_value = "input.csv.gz")]
    pub filename: PathBuf,

    /// Comma separated format names, one per column
    #[arg(long, default_value = DEFAULT_FIELD_FORMAT)]
    pub field_format: String,

    /// Field delimiter (single ASCII character)
    #[arg(long, default_value_t = '|')]
    pub delimiter: char,

    /// Log progress every 'x' records read (0 disables)
    #[arg(long, default_value_t = 100)]
    pub output_lines: u64,

    /// Skip the first 'x' records after the header
    #[arg(long, default_value_t = 0)]
    pub skip_lines: u64,

    /// Allow blank values in these columns (eg. 0,1,2)
    #[arg(long, default_value = "")]
    pub blank_cols: String,

    /// Use a predefined delimiter, field format and blank column set
    #[arg(long)]
    pub defined_format: Option<String>,

    /// Randomly validate 'x' percent of records
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub sample_percentage: u8,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log the header to format mapping before validating
    #[arg(long)]
    pub display_header: bool,

    /// Print a run summary on stdout
    #[arg(long, value_enum, default_value_t = SummaryFormat::None)]
    pub summary: SummaryFormat,

    /// Print the known format names and exit
    #[arg(long)]
    pub list_formats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log findings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Build the run configuration; a preset overrides delimiter, field
    /// format and blank columns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] for an unknown `--defined-format`.
    pub fn to_config(&self) -> Result<ValidationConfig, ConfigError> {
        let mut config = ValidationConfig::default();
        config.input.clone_from(&self.filename);
        config.field_format.clone_from(&self.field_format);
        config.delimiter = self.delimiter;
        config.blank_columns.clone_from(&self.blank_cols);
        config.progress_interval = self.output_lines;
        config.skip_lines = self.skip_lines;
        config.sample_percentage = self.sample_percentage;
        config.seed = self.seed;
        config.display_header = self.display_header;

        if let Some(name) = &self.defined_format {
            config = config.with_preset(Preset::find(name)?);
        }
        Ok(config)
    }
}

/// Parse arguments, install logging and run one validation.
///
/// # Errors
///
/// Fatal run errors are returned as [`ProofreadError`] inside the
/// `anyhow::Error` so `main` can pick the exit status.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;

    if cli.list_formats {
        let mut stdout = std::io::stdout().lock();
        for name in FormatRegistry::builtin().names() {
            writeln!(stdout, "{name}")?;
        }
        return Ok(());
    }

    let config = cli.to_config().map_err(ProofreadError::from)?;
    let report = validate_file(&config, &TracingSink)?;
    info!(
        records_read = report.records_read,
        records_checked = report.records_checked,
        findings = report.findings(),
        "Finished processing - {}",
        config.input.display()
    );

    let mut stdout = std::io::stdout().lock();
    match cli.summary {
        SummaryFormat::None => {}
        SummaryFormat::Human => output::write_human(&report, &mut stdout)?,
        SummaryFormat::Json => output::write_json(&report, &mut stdout)?,
    }
    Ok(())
}
