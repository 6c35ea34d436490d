//! Optional XSD validation of the produced batch document.
//!
//! Validation re-reads the serialized file. Failures are collected and
//! surfaced through the conversion report; the output file is retained
//! either way.

use crate::error::{Error, Result};
use libxml::error::StructuredError;
use libxml::schemas::{SchemaParserContext, SchemaValidationContext};
use std::path::Path;

/// One collected schema-validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: String,
    pub message: String,
    pub line: Option<i32>,
    pub column: Option<i32>,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] line {}: {}", self.severity, line, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Validate a serialized document against an XSD.
///
/// Returns the collected issues; an empty list means the document conforms.
/// A schema that itself fails to load is a hard error.
pub fn validate_against_xsd(xml_path: &Path, xsd_path: &Path) -> Result<Vec<ValidationIssue>> {
    let xsd = xsd_path
        .to_str()
        .ok_or_else(|| Error::SchemaError(format!("invalid XSD path: {}", xsd_path.display())))?;
    let xml = xml_path
        .to_str()
        .ok_or_else(|| Error::SchemaError(format!("invalid XML path: {}", xml_path.display())))?;

    let mut parser_ctx = SchemaParserContext::from_file(xsd);
    let mut validation_ctx = SchemaValidationContext::from_parser(&mut parser_ctx)
        .map_err(|errors| Error::SchemaError(summarize(&errors)))?;

    match validation_ctx.validate_file(xml) {
        Ok(()) => Ok(Vec::new()),
        Err(errors) => Ok(errors.into_iter().map(issue_from).collect()),
    }
}

fn issue_from(error: StructuredError) -> ValidationIssue {
    ValidationIssue {
        severity: format!("{:?}", error.level),
        message: error.message.clone().unwrap_or_default().trim().to_string(),
        line: error.line,
        column: error.col,
    }
}

fn summarize(errors: &[StructuredError]) -> String {
    errors
        .iter()
        .filter_map(|e| e.message.as_deref())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue {
            severity: "Error".to_string(),
            message: "element mismatch".to_string(),
            line: Some(7),
            column: None,
        };
        assert_eq!(issue.to_string(), "[Error] line 7: element mismatch");
    }
}
