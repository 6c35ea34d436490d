//! Company-vs-individual classification heuristic.
//!
//! The rules are a deliberately loose business heuristic from the source
//! feed (e.g. "CO" is a broad substring match). The substring set and rule
//! order are part of the regulator-facing contract and must not be tightened.

use crate::dlt_format::RawRecord;
use crate::types::EntityKind;

/// Field holding the identification / customer code.
const ID_FIELD: usize = 10;

/// Name substrings that mark a company, matched against the uppercased name.
const COMPANY_NAME_MARKERS: [&str; 5] = ["PVT", "LTD", "COMPANY", "CO", "PLC"];

/// Classify one data record. First matching rule wins:
///
/// 1. identification code present, first character is a letter and the code
///    contains a letter anywhere: company;
/// 2. display name contains any company marker (case-insensitive): company;
/// 3. otherwise: individual.
pub fn classify(record: &RawRecord) -> EntityKind {
    if let Some(code) = record.get(ID_FIELD) {
        let starts_with_letter = code.chars().next().is_some_and(|c| c.is_alphabetic());
        if starts_with_letter && code.chars().any(|c| c.is_alphabetic()) {
            return EntityKind::Company;
        }
    }

    if let Some(name) = display_name(record) {
        let up = name.to_uppercase();
        if COMPANY_NAME_MARKERS.iter().any(|m| up.contains(m)) {
            return EntityKind::Company;
        }
    }

    EntityKind::Individual
}

/// Display name: field 17, else field 18.
pub fn display_name(record: &RawRecord) -> Option<&str> {
    record.get(17).or_else(|| record.get(18))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(id: &str, name: &str) -> RawRecord {
        let mut fields = vec![String::new(); 19];
        fields[0] = "CMDC".to_string();
        fields[10] = id.to_string();
        fields[17] = name.to_string();
        RawRecord::from_line(&fields.join("|"))
    }

    #[test]
    fn test_letter_first_id_code_is_company() {
        assert_eq!(classify(&record_with("PV12345", "SOME NAME")), EntityKind::Company);
    }

    #[test]
    fn test_company_marker_in_name_is_company() {
        assert_eq!(
            classify(&record_with("", "JOHN DOE PVT LTD")),
            EntityKind::Company
        );
    }

    #[test]
    fn test_digit_first_id_with_plain_name_is_individual() {
        assert_eq!(
            classify(&record_with("561691223V", "JOHN DANIEL")),
            EntityKind::Individual
        );
    }

    #[test]
    fn test_broad_co_substring_still_matches() {
        // "CO" inside a surname is an acknowledged false positive; the rule
        // set is preserved as-is.
        assert_eq!(classify(&record_with("", "MARCO SILVA")), EntityKind::Company);
    }

    #[test]
    fn test_name_falls_back_to_field_18() {
        let mut fields = vec![String::new(); 19];
        fields[0] = "CMDC".to_string();
        fields[18] = "ACME COMPANY".to_string();
        let record = RawRecord::from_line(&fields.join("|"));
        assert_eq!(classify(&record), EntityKind::Company);
    }
}
