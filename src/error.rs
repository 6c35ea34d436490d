//! Error types for the dlt2cb5 library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
///
/// Malformed record data (bad dates, amounts, postal tokens) is never an
/// error: it degrades locally to raw-value passthrough or element omission.
/// Only missing input and unwritable output surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input DLT file does not exist.
    #[error("input DLT not found: {0}")]
    FileNotFound(PathBuf),

    /// Error serializing the XML document.
    #[error("XML serialization error: {0}")]
    XmlError(String),

    /// Error loading the XSD schema for validation.
    #[error("XSD schema error: {0}")]
    SchemaError(String),
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Error::XmlError(err.to_string())
    }
}
