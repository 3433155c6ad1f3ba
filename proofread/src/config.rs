//! Run configuration and built-in presets.
//!
//! Configuration is assembled once (by the CLI or a caller) and passed
//! explicitly; nothing here is global or mutable after construction.

use std::path::PathBuf;

use tracing::info;

use crate::error::ConfigError;

/// Field format used when neither `field-format` nor a preset is given.
pub const DEFAULT_FIELD_FORMAT: &str = "uuid,ad_id_type,app_id,app_id,uuid,user_id,text,text,os,version,am_type,ip_addr,ts_sec,num,ts_msec,uuid,num,num,lat,lon,cc,num,loc_context,loc_method,text,text";

/// A named bundle of delimiter, field format and blank columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Name accepted by `defined-format`.
    pub name: &'static str,
    /// Field separator.
    pub delimiter: char,
    /// Comma separated format names.
    pub field_format: &'static str,
    /// Blank-allowed column set.
    pub blank_columns: &'static str,
}

/// Built-in presets.
pub const PRESETS: &[Preset] = &[Preset {
    name: "backup",
    delimiter: '|',
    field_format: "uuid,ad_id_type,app_id,app_id,uuid,user_id,text,text,os,version,am_type,ip_addr,ts_sec,int,ts_sec,uuid,int,int,float,float,cc,text,text,text,int,loc_context,loc_method,text,text,int,int,int,int",
    blank_columns: "11,14,15,16,17,20,22,23",
}];

impl Preset {
    /// Look up a built-in preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] if no preset has that name.
    pub fn find(name: &str) -> Result<&'static Self, ConfigError> {
        PRESETS
            .iter()
            .find(|preset| preset.name == name)
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: name.to_owned(),
                known: preset_names(),
            })
    }
}

/// Comma separated list of built-in preset names.
#[must_use]
pub fn preset_names() -> String {
    PRESETS
        .iter()
        .map(|preset| preset.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything a validation run needs.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ValidationConfig {
    /// Gzip-compressed delimited input.
    pub input: PathBuf,
    /// Comma separated format names, one per column.
    pub field_format: String,
    /// Field separator; must be a single ASCII character.
    pub delimiter: char,
    /// Blank-allowed column set, e.g. `"3,7,9"`.
    pub blank_columns: String,
    /// Progress notification interval in records read (0 disables).
    pub progress_interval: u64,
    /// Number of leading records, after the header, read but not validated.
    pub skip_lines: u64,
    /// Per-record forwarding probability, 0-100.
    pub sample_percentage: u8,
    /// Fixed sampling seed; `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Log the header to format mapping before validating.
    pub display_header: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.csv.gz"),
            field_format: DEFAULT_FIELD_FORMAT.to_owned(),
            delimiter: '|',
            blank_columns: String::new(),
            progress_interval: 100,
            skip_lines: 0,
            sample_percentage: 100,
            seed: None,
            display_header: false,
        }
    }
}

impl ValidationConfig {
    /// Replace delimiter, field format and blank columns with a preset's.
    #[must_use]
    pub fn with_preset(mut self, preset: &Preset) -> Self {
        info!("Acceptable formats: {}", preset_names());
        info!("field-format: {}", preset.field_format);
        info!(
            "delimiter: '{}' blank-cols: {}",
            preset.delimiter, preset.blank_columns
        );
        preset.field_format.clone_into(&mut self.field_format);
        self.delimiter = preset.delimiter;
        preset.blank_columns.clone_into(&mut self.blank_columns);
        self
    }

    /// Format names in column order. A blank field format declares no
    /// columns at all.
    #[must_use]
    pub fn field_formats(&self) -> Vec<&str> {
        if self.field_format.trim().is_empty() {
            return Vec::new();
        }
        self.field_format.split(',').map(str::trim).collect()
    }

    /// The delimiter as the byte the decoder splits on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDelimiter`] for non-ASCII delimiters and
    /// for the record terminators `\n` and `\r`.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match u8::try_from(self.delimiter) {
            Ok(byte) if byte.is_ascii() && byte != b'\n' && byte != b'\r' => Ok(byte),
            _ => Err(ConfigError::InvalidDelimiter(self.delimiter.to_string())),
        }
    }
}
