/// File row of the first data record; row 1 is the header.
pub const FIRST_RECORD_SEQUENCE: u64 = 2;

/// One decoded row and its position in the original file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Field values in column order.
    pub fields: Vec<String>,
    /// 1-based file row, assigned before sampling and never renumbered.
    pub sequence: u64,
}

impl Record {
    /// Record holding `fields` read from file row `sequence`.
    #[must_use]
    pub const fn new(fields: Vec<String>, sequence: u64) -> Self {
        Self { fields, sequence }
    }
}
