//! DLT to CB5 Bounced-Cheque Converter Library
//!
//! A library for converting pipe-delimited legacy "DLT" bounced-cheque batch
//! files into the CB5 credit-bureau reporting XML format for Sri Lanka.
//!
//! # Pipeline
//!
//! - **Tokenizer**: splits the DLT file into header and `CMDC` data records
//! - **Classifier**: decides company vs individual per record by heuristic
//! - **Address resolver**: multi-stage postal-code/city lookup with audit
//!   trail and a fixed default fallback
//! - **Mapper**: normalizes dates, amounts and enumerated values
//! - **Assembler**: wraps all records in a namespaced `Batch` document,
//!   optionally validated against an XSD
//!
//! # Examples
//!
//! ## Converting a DLT file
//!
//! ```no_run
//! use dlt2cb5::convert::{convert, ConvertOptions};
//!
//! let report = convert(&ConvertOptions {
//!     input: "file.dlt".into(),
//!     output: "new_file.xml".into(),
//!     xsd: Some("BouncedChequeTemplate.xsd".into()),
//!     ..ConvertOptions::default()
//! })?;
//! println!("{} records, schema valid: {}", report.records, report.schema_valid);
//! # Ok::<(), dlt2cb5::Error>(())
//! ```
//!
//! ## Working with the pieces directly
//!
//! ```
//! use dlt2cb5::dlt_format::RawRecord;
//! use dlt2cb5::classify::classify;
//! use dlt2cb5::types::EntityKind;
//!
//! let record = RawRecord::from_line("CMDC|B1|10|001|123|500|LKR|||" );
//! assert_eq!(classify(&record), EntityKind::Individual);
//! ```

pub mod classify;
pub mod convert;
pub mod dlt_format;
pub mod error;
pub mod mapper;
pub mod postal;
pub mod resolve;
pub mod types;
pub mod validate;
pub mod xml_format;

// Re-export commonly used types
pub use convert::{ConversionReport, ConvertOptions};
pub use error::{Error, Result};
pub use types::{Address, Batch, BouncedChequeRecord, DishonourReason, EntityKind, Party};
