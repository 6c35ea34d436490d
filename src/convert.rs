//! End-to-end DLT-to-XML conversion.
//!
//! One call tokenizes the input file, maps every data record, serializes the
//! batch document and, when an XSD is supplied, validates the written file.
//! Conversion is single-threaded and synchronous; it either completes or
//! fails before any output is produced (a partially written file can remain
//! on mid-serialization failure).

use crate::dlt_format::DltFile;
use crate::error::{Error, Result};
use crate::mapper::map_record;
use crate::postal::PostalDirectory;
use crate::resolve::AuditLog;
use crate::types::Batch;
use crate::validate::{validate_against_xsd, ValidationIssue};
use crate::xml_format::BouncedChequeBatch;
use std::fs::File;
use std::path::PathBuf;

/// Inputs of one conversion call.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// DLT input file. Must exist.
    pub input: PathBuf,
    /// XML output file.
    pub output: PathBuf,
    /// Optional XSD to validate the produced document against.
    pub xsd: Option<PathBuf>,
    /// Optional postal reference source; absent means default addresses only.
    pub postal_ref: Option<PathBuf>,
    /// Optional audit-log destination for address-resolution decisions.
    pub audit_log: Option<PathBuf>,
}

/// Outcome of one conversion call. The output file exists whenever this is
/// returned, including on validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Number of data records converted.
    pub records: usize,
    /// Records whose address fell back to the fixed default.
    pub defaults_used: usize,
    /// False only when XSD validation ran and reported issues.
    pub schema_valid: bool,
    /// Collected validation failures, empty when valid or skipped.
    pub issues: Vec<ValidationIssue>,
}

/// Convert one DLT batch file into the CB5 bounced-cheque XML document.
pub fn convert(options: &ConvertOptions) -> Result<ConversionReport> {
    if !options.input.exists() {
        return Err(Error::FileNotFound(options.input.clone()));
    }

    let directory = PostalDirectory::load(options.postal_ref.as_deref());
    let audit = AuditLog::new(options.audit_log.clone());

    let mut input = File::open(&options.input)?;
    let dlt = DltFile::from_read(&mut input)?;

    let mut batch = Batch::new(dlt.batch_identifier.clone());
    let mut defaults_used = 0;
    for raw in &dlt.records {
        let mapped = map_record(raw, &directory, &audit);
        if mapped.default_address_used {
            defaults_used += 1;
        }
        batch.add_record(mapped.record);
    }
    let records = batch.records.len();
    log::debug!(
        "mapped {} records for batch {} ({} default addresses)",
        records,
        batch.batch_identifier,
        defaults_used
    );

    let mut output = File::create(&options.output)?;
    BouncedChequeBatch { batch }.write_to(&mut output)?;

    let issues = match options.xsd.as_deref().filter(|p| p.exists()) {
        Some(xsd) => validate_against_xsd(&options.output, xsd)?,
        None => Vec::new(),
    };

    Ok(ConversionReport {
        records,
        defaults_used,
        schema_valid: issues.is_empty(),
        issues,
    })
}
