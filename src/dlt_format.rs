//! DLT batch file parser.
//!
//! DLT is a pipe-delimited legacy format for bounced-cheque batches. Each
//! line carries a record-type tag in its first field: `HDHD` (header),
//! `CMDC` (data record), `TLTL` (trailer). Only header and data lines are
//! consumed; everything else is ignored.

use crate::error::Result;
use crate::types::Batch;
use std::io::{BufRead, BufReader, Read};

const HEADER_TAG: &str = "HDHD";
const DATA_TAG: &str = "CMDC";

/// One pipe-split data line with bounds- and blank-checked field access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<String>,
}

impl RawRecord {
    /// Split a raw line on `|`. Never fails; malformed lines simply yield
    /// fewer populated fields.
    pub fn from_line(line: &str) -> Self {
        RawRecord {
            fields: line.split('|').map(str::to_string).collect(),
        }
    }

    /// Trimmed field at `index`, or `None` when absent or blank.
    ///
    /// The null/empty distinction is load-bearing: callers chain
    /// `.or_else()` fallbacks that must only trigger on true absence.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields
            .get(index)
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
    }

    /// Number of fields present on the line.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// A tokenized DLT file: the header's batch identifier plus all data records
/// in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DltFile {
    pub batch_identifier: String,
    pub records: Vec<RawRecord>,
}

impl DltFile {
    /// Parse a DLT file from any source implementing `Read`.
    ///
    /// Blank lines and unrecognized record types are skipped. The first
    /// `HDHD` line supplies the batch identifier (second field); when no
    /// header is present the identifier defaults to `"DLT_BATCH"`.
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let buf_reader = BufReader::new(reader);

        let mut batch_identifier: Option<String> = None;
        let mut records = Vec::new();

        for line in buf_reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let record = RawRecord::from_line(&line);
            match record.get(0) {
                Some(HEADER_TAG) => {
                    if batch_identifier.is_none() {
                        batch_identifier = record.get(1).map(str::to_string);
                    }
                }
                Some(DATA_TAG) => records.push(record),
                _ => {}
            }
        }

        Ok(DltFile {
            batch_identifier: batch_identifier
                .unwrap_or_else(|| Batch::DEFAULT_IDENTIFIER.to_string()),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_trims_and_blanks_to_none() {
        let record = RawRecord::from_line("CMDC| BATCH1 ||  |last");
        assert_eq!(record.get(0), Some("CMDC"));
        assert_eq!(record.get(1), Some("BATCH1"));
        assert_eq!(record.get(2), None);
        assert_eq!(record.get(3), None);
        assert_eq!(record.get(4), Some("last"));
        // beyond the provided count: absent, not empty
        assert_eq!(record.get(5), None);
    }

    #[test]
    fn test_header_supplies_batch_identifier() {
        let mut input = "HDHD|BATCH123|617|30-Nov-2025\nCMDC|BATCH123|10\nTLTL|BATCH123|617|1\n".as_bytes();
        let file = DltFile::from_read(&mut input).unwrap();
        assert_eq!(file.batch_identifier, "BATCH123");
        assert_eq!(file.records.len(), 1);
    }

    #[test]
    fn test_missing_header_defaults_batch_identifier() {
        let mut input = "CMDC|X|10|0012345678\n".as_bytes();
        let file = DltFile::from_read(&mut input).unwrap();
        assert_eq!(file.batch_identifier, "DLT_BATCH");
        assert_eq!(file.records.len(), 1);
    }

    #[test]
    fn test_blank_and_trailer_lines_ignored() {
        let mut input = "\nHDHD|B1\n\nTLTL|B1|617|0\n   \n".as_bytes();
        let file = DltFile::from_read(&mut input).unwrap();
        assert_eq!(file.batch_identifier, "B1");
        assert!(file.records.is_empty());
    }

    #[test]
    fn test_first_header_wins() {
        let mut input = "HDHD|FIRST\nHDHD|SECOND\n".as_bytes();
        let file = DltFile::from_read(&mut input).unwrap();
        assert_eq!(file.batch_identifier, "FIRST");
    }
}
