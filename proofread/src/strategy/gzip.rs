//! Gzip-compressed delimited files.
//!
//! Every line is one row: quote characters are ordinary field content, so a
//! stray `"` cannot merge the lines that follow it into one field. Rows may
//! have any number of fields; field count checks belong to the engine. Bytes
//! that are not valid UTF-8 are replaced rather than failing the stream, so
//! they show up as format findings.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};
use flate2::read::MultiGzDecoder;

use crate::error::InputError;

/// A decoded input whose header row has already been consumed.
pub struct DelimitedInput<R> {
    header: Vec<String>,
    records: ByteRecordsIntoIter<R>,
}

/// Open a gzip file and read its header row.
///
/// # Errors
///
/// Returns [`InputError::Open`] if the file cannot be opened, and
/// [`InputError::Header`] or [`InputError::Empty`] if no header row can be
/// decoded from it (which is how a non-gzip file shows up).
pub fn open(
    path: &Path,
    delimiter: u8,
) -> Result<DelimitedInput<MultiGzDecoder<BufReader<File>>>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.to_owned(),
        source,
    })?;
    DelimitedInput::from_reader(MultiGzDecoder::new(BufReader::new(file)), delimiter, path)
}

impl<R: Read> DelimitedInput<R> {
    /// Wrap an already-decompressed reader. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Header`] if the first row fails to decode and
    /// [`InputError::Empty`] if there is no first row.
    pub fn from_reader(reader: R, delimiter: u8, path: &Path) -> Result<Self, InputError> {
        let mut records = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader)
            .into_byte_records();

        let header = match records.next() {
            Some(Ok(row)) => decode(&row),
            Some(Err(source)) => {
                return Err(InputError::Header {
                    path: path.to_owned(),
                    source,
                });
            }
            None => {
                return Err(InputError::Empty {
                    path: path.to_owned(),
                });
            }
        };

        Ok(Self { header, records })
    }

    /// Header labels from the first row.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// The remaining rows, decoded.
    pub fn into_records(self) -> impl Iterator<Item = Result<Vec<String>, csv::Error>> {
        self.records.map(|row| row.map(|row| decode(&row)))
    }
}

fn decode(row: &ByteRecord) -> Vec<String> {
    row.iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}
