//! Schema model: ordered column declarations resolved against the registry.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::registry::{FormatRegistry, FormatRule};

/// One declared column: its prepared rule, header label and blank policy.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    rule: FormatRule,
    header: String,
    blank_allowed: bool,
}

impl ColumnSpec {
    /// The prepared rule for this column.
    #[must_use]
    pub const fn rule(&self) -> &FormatRule {
        &self.rule
    }

    /// Declared format name.
    #[must_use]
    pub const fn format(&self) -> &'static str {
        self.rule.name()
    }

    /// Header label from the input's first row (empty when the header was short).
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Whether an empty value passes without a format check.
    #[must_use]
    pub const fn blank_allowed(&self) -> bool {
        self.blank_allowed
    }
}

/// Ordered, immutable column declarations for one input file.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    /// All columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Column at `index`, or `None` past the last declared column.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&ColumnSpec> {
        self.columns.get(index)
    }

    /// Number of declared columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false` for a schema returned by [`build_schema`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Attach header labels positionally. Labels past the last column are
    /// ignored and columns past the last label get an empty label.
    #[must_use]
    pub fn with_header<H: AsRef<str>>(mut self, header_labels: &[H]) -> Self {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.header = header_labels
                .get(index)
                .map(|label| label.as_ref().to_owned())
                .unwrap_or_default();
        }
        self
    }

    /// Log the header to format mapping, one column per line.
    pub fn log_header_mapping(&self) {
        info!("Header");
        info!("------");
        for (index, column) in self.columns.iter().enumerate() {
            info!("{index:02}: {} ({})", column.header, column.format());
        }
    }
}

/// Build a schema by zipping format names with header labels.
///
/// Header labels past the last format are ignored; missing labels become
/// empty. `blank_columns` is parsed with [`parse_blank_columns`].
///
/// # Errors
///
/// Returns [`ConfigError::EmptyFieldFormat`] for an empty format list,
/// [`ConfigError::InvalidBlankColumns`] for a malformed blank column set, or
/// [`ConfigError::UnknownFormat`] for the first format the registry does not
/// know.
pub fn build_schema<F, H>(
    registry: &FormatRegistry,
    format_names: &[F],
    header_labels: &[H],
    blank_columns: &str,
) -> Result<Schema, ConfigError>
where
    F: AsRef<str>,
    H: AsRef<str>,
{
    if format_names.is_empty() {
        return Err(ConfigError::EmptyFieldFormat);
    }

    let blank = parse_blank_columns(blank_columns)?;
    if let Some(&beyond) = blank.range(format_names.len()..).next() {
        warn!(
            "blank column {beyond} is beyond the {} declared columns and has no effect",
            format_names.len()
        );
    }

    let mut columns = Vec::with_capacity(format_names.len());
    for (index, name) in format_names.iter().enumerate() {
        let name = name.as_ref();
        let Some(rule) = registry.resolve(name) else {
            return Err(ConfigError::UnknownFormat {
                format: name.to_owned(),
                column: index,
                known: registry.names().collect::<Vec<_>>().join(", "),
            });
        };
        columns.push(ColumnSpec {
            rule: rule.clone(),
            header: String::new(),
            blank_allowed: blank.contains(&index),
        });
    }

    Ok(Schema { columns }.with_header(header_labels))
}

/// Parse a blank column set such as `"3,7,9"` into column indices.
///
/// Tokens are whole numbers, so `"1"` never covers column 10 or 11. Spaces
/// around tokens and empty tokens (`"1,,2"`, a trailing comma) are ignored.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBlankColumns`] for a token that is not a
/// non-negative integer.
pub fn parse_blank_columns(list: &str) -> Result<BTreeSet<usize>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidBlankColumns {
                    token: token.to_owned(),
                })
        })
        .collect()
}
