//! Per-record mapping from a raw DLT line to a bounced-cheque record.
//!
//! CMDC field layout (0-indexed): 2=branch, 3=account, 4=cheque number,
//! 5=amount, 6=currency, 7=dishonour date, 8=reason code, 10=identification
//! code, 11=passport, 12=driving license, 13=business registration or
//! economic activity, 14=business registration date, 15=salutation,
//! 16=profession, 17=full/spouse name, 18=alternate name, 19=address line,
//! 20=gender, 21=date of birth, 22=marital status, 23=fate status,
//! 24=employment, 26=city, 27=province, 28=district (also alternate address
//! line), 29-30=phones.

use crate::classify::{classify, display_name};
use crate::dlt_format::RawRecord;
use crate::postal::PostalDirectory;
use crate::resolve::{sanitize_region, AddressResolver, AuditLog, MAX_DISTRICT_LEN};
use crate::types::{
    Address, BouncedChequeRecord, ChequeData, Company, DishonourReason, EntityKind, Individual,
    IndividualIds, Party, MARITAL_STATUSES, PROVINCES,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Accepted input date formats, tried in order.
const DATE_FORMATS: [&str; 3] = ["%d-%b-%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// A mapped record plus per-record conversion facts for the report.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub record: BouncedChequeRecord,
    /// True when address resolution fell through to the fixed default.
    pub default_address_used: bool,
}

/// Map one CMDC record against the postal directory, noting resolution
/// decisions in the audit log. Never fails: malformed data degrades to raw
/// passthrough or omission.
pub fn map_record(
    record: &RawRecord,
    directory: &PostalDirectory,
    audit: &AuditLog,
) -> MappedRecord {
    let branch_id = record.get(2).unwrap_or("").to_string();
    let account = record.get(3).unwrap_or("").to_string();
    let cheque_number = record.get(4).unwrap_or("").to_string();

    let entity_code = entity_code(&account, &cheque_number, &branch_id);

    let cheque = ChequeData {
        branch_id: branch_id.clone(),
        account_number: account.clone(),
        cheque_number,
        amount: format_amount(record.get(5).unwrap_or("")),
        currency: record.get(6).unwrap_or("").to_string(),
        date_dishonoured: dishonour_date(record.get(7)),
        reason: DishonourReason::from_code(record.get(8)),
    };

    let kind = classify(record);

    let address_line = record.get(19).or_else(|| record.get(28)).unwrap_or("");
    let resolver = AddressResolver::new(directory);
    let resolution = resolver.resolve(address_line, inline_postal_token(record), record.get(26));
    audit.record_resolution(&entity_code, &resolution);
    let default_address_used = resolution.default_used;

    let mut address = resolution.address;
    if kind == EntityKind::Individual {
        backfill_from_fields(&mut address, record);
    }

    let customer_code = customer_code(record.get(10), &account, kind);
    let full_name = display_name(record).unwrap_or("").to_string();

    let party = match kind {
        EntityKind::Company => Party::Company(Company {
            customer_code,
            company_name: full_name,
            economic_activity: record.get(13).map(str::to_string),
            business_registration_number: record.get(10).map(str::to_string),
            business_registration_date: record.get(14).and_then(normalize_date),
        }),
        EntityKind::Individual => Party::Individual(Individual {
            customer_code,
            full_name,
            salutation: record.get(15).map(str::to_string),
            profession: record.get(16).map(str::to_string),
            spouse_name: record.get(17).map(str::to_string),
            gender: record.get(20).map(str::to_string),
            date_of_birth: record.get(21).and_then(normalize_date),
            marital_status: record.get(22).and_then(marital_status),
            fate_status: record.get(23).map(str::to_string),
            employment: record.get(24).map(str::to_string),
            ids: IndividualIds {
                nic_number: record.get(10).map(str::to_string),
                passport_number: record.get(11).map(str::to_string),
                driving_license_number: record.get(12).map(str::to_string),
                business_registration_number: record.get(13).map(str::to_string),
                business_registration_date: record.get(14).and_then(normalize_date),
            },
            phone_number: record.get(29).map(str::to_string),
            phone_number_2: record.get(30).map(str::to_string),
        }),
    };

    MappedRecord {
        record: BouncedChequeRecord {
            entity_code,
            cheque,
            party,
            address,
        },
        default_address_used,
    }
}

/// Hyphen-join of account, cheque number and branch id, skipping blanks.
pub fn entity_code(account: &str, cheque_number: &str, branch_id: &str) -> String {
    [account, cheque_number, branch_id]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("-")
}

/// Fixed two-fraction-digit form when parseable, raw passthrough otherwise.
pub fn format_amount(raw: &str) -> String {
    match Decimal::from_str(raw) {
        Ok(amount) => format!("{:.2}", amount),
        Err(_) => raw.to_string(),
    }
}

/// ISO `YYYY-MM-DD` when the value matches one of the accepted formats.
pub fn normalize_date(raw: &str) -> Option<String> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Dishonour date: normalized when parseable, verbatim when not, absent when
/// blank. Never produces an empty value.
pub fn dishonour_date(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    Some(normalize_date(raw).unwrap_or_else(|| raw.to_string()))
}

/// Marital status passes through only when it is a letter-bearing token
/// matching the closed value set, case-insensitively.
pub fn marital_status(raw: &str) -> Option<String> {
    let has_letters = raw.chars().any(|c| c.is_alphabetic());
    if has_letters && MARITAL_STATUSES.iter().any(|m| m.eq_ignore_ascii_case(raw)) {
        Some(raw.to_string())
    } else {
        None
    }
}

/// Customer code from the identification field, else the account number,
/// suffixed post-classification when it carries no separator.
pub fn customer_code(id_field: Option<&str>, account: &str, kind: EntityKind) -> String {
    let mut code = id_field.unwrap_or(account).to_string();
    if !code.is_empty() && !code.contains('-') {
        code.push_str(kind.code_suffix());
    }
    code
}

/// First all-numeric 3-6 digit token across all fields, in field order.
fn inline_postal_token(record: &RawRecord) -> Option<&str> {
    (0..record.field_count())
        .filter_map(|i| record.get(i))
        .find(|t| (3..=6).contains(&t.len()) && t.chars().all(|c| c.is_ascii_digit()))
}

/// Individual-path output fallbacks for address parts the resolver left
/// empty: raw city field, whitelisted province field, sanitized district
/// field.
fn backfill_from_fields(address: &mut Address, record: &RawRecord) {
    if address.city.is_empty() {
        if let Some(city) = record.get(26) {
            address.city = city.to_string();
        }
    }
    if address.province.is_empty() {
        if let Some(province) = record.get(27) {
            if PROVINCES.iter().any(|p| p.eq_ignore_ascii_case(province)) {
                address.province = province.to_string();
            }
        }
    }
    if address.district.is_empty() {
        if let Some(district) = record.get(28) {
            address.district = sanitize_region(district, MAX_DISTRICT_LEN);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cmdc(fields: &[(usize, &str)]) -> RawRecord {
        let mut parts = vec![String::new(); 31];
        parts[0] = "CMDC".to_string();
        for (i, v) in fields {
            parts[*i] = v.to_string();
        }
        RawRecord::from_line(&parts.join("|"))
    }

    #[test]
    fn test_entity_code_skips_blanks() {
        assert_eq!(entity_code("0012345678", "123456", "10"), "0012345678-123456-10");
        assert_eq!(entity_code("", "123456", "10"), "123456-10");
        assert_eq!(entity_code("0012345678", "", ""), "0012345678");
        assert_eq!(entity_code("", "", ""), "");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("1000"), "1000.00");
        assert_eq!(format_amount("1234.5"), "1234.50");
        assert_eq!(format_amount("1234.567"), "1234.57");
        assert_eq!(format_amount("abc"), "abc");
        assert_eq!(format_amount(""), "");
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date("19-Nov-2025").as_deref(), Some("2025-11-19"));
        assert_eq!(normalize_date("9-Nov-2025").as_deref(), Some("2025-11-09"));
        assert_eq!(normalize_date("19-11-2025").as_deref(), Some("2025-11-19"));
        assert_eq!(normalize_date("2025-11-19").as_deref(), Some("2025-11-19"));
        assert_eq!(normalize_date("not-a-date"), None);
    }

    #[test]
    fn test_dishonour_date_passthrough_and_omission() {
        assert_eq!(dishonour_date(Some("19-Nov-2025")).as_deref(), Some("2025-11-19"));
        assert_eq!(dishonour_date(Some("not-a-date")).as_deref(), Some("not-a-date"));
        assert_eq!(dishonour_date(None), None);
    }

    #[test]
    fn test_marital_status_whitelist() {
        assert_eq!(marital_status("Married").as_deref(), Some("Married"));
        assert_eq!(marital_status("MARRIED").as_deref(), Some("MARRIED"));
        assert_eq!(marital_status("M2"), None);
        assert_eq!(marital_status("Engaged"), None);
        assert_eq!(marital_status("123"), None);
    }

    #[test]
    fn test_customer_code_suffixing() {
        assert_eq!(
            customer_code(Some("561691223V"), "ACC", EntityKind::Individual),
            "561691223V-1"
        );
        assert_eq!(
            customer_code(Some("PV12345"), "ACC", EntityKind::Company),
            "PV12345-3"
        );
        assert_eq!(
            customer_code(Some("AB-99"), "ACC", EntityKind::Company),
            "AB-99"
        );
        assert_eq!(
            customer_code(None, "0012345678", EntityKind::Individual),
            "0012345678-1"
        );
        assert_eq!(customer_code(None, "", EntityKind::Individual), "");
    }

    #[test]
    fn test_map_record_individual() {
        let record = cmdc(&[
            (2, "10"),
            (3, "0012345678"),
            (4, "123456"),
            (5, "1000"),
            (6, "LKR"),
            (7, "19-Nov-2025"),
            (8, "001"),
            (10, "561691223V"),
            (17, "JOHN DANIEL"),
            (19, "10 SOME STREET"),
            (22, "Married"),
        ]);
        let directory = PostalDirectory::default();
        let mapped = map_record(&record, &directory, &AuditLog::disabled());
        assert!(mapped.default_address_used);
        let mapped = mapped.record;

        assert_eq!(mapped.entity_code, "0012345678-123456-10");
        assert_eq!(mapped.cheque.amount, "1000.00");
        assert_eq!(mapped.cheque.date_dishonoured.as_deref(), Some("2025-11-19"));
        assert_eq!(mapped.cheque.reason, DishonourReason::InsufficientFunds);
        match &mapped.party {
            Party::Individual(i) => {
                assert_eq!(i.customer_code, "561691223V-1");
                assert_eq!(i.full_name, "JOHN DANIEL");
                assert_eq!(i.marital_status.as_deref(), Some("Married"));
                assert_eq!(i.ids.nic_number.as_deref(), Some("561691223V"));
            }
            Party::Company(_) => panic!("expected an individual"),
        }
        // empty directory: fixed default address
        assert_eq!(mapped.address.city, "Colombo 01");
        assert_eq!(mapped.address.postal_code, "00100");
    }

    #[test]
    fn test_map_record_company() {
        let record = cmdc(&[
            (2, "10"),
            (3, "0098765432"),
            (4, "654321"),
            (5, "500"),
            (6, "LKR"),
            (10, "PV12345"),
            (13, "999"),
            (17, "ACME TRADING PVT LTD"),
        ]);
        let directory = PostalDirectory::default();
        let mapped = map_record(&record, &directory, &AuditLog::disabled()).record;

        match &mapped.party {
            Party::Company(c) => {
                assert_eq!(c.customer_code, "PV12345-3");
                assert_eq!(c.company_name, "ACME TRADING PVT LTD");
                assert_eq!(c.business_registration_number.as_deref(), Some("PV12345"));
                assert_eq!(c.economic_activity.as_deref(), Some("999"));
            }
            Party::Individual(_) => panic!("expected a company"),
        }
    }

    #[test]
    fn test_individual_backfills_province_only_when_whitelisted() {
        // the directory entry carries a digit-bearing province, which the
        // resolver sanitizes to empty; field 27 may then backfill it
        let directory =
            PostalDirectory::parse("('90000','Testville','Testville District','Province 9')");

        let record = cmdc(&[(3, "001"), (19, "MAIN ST 90000"), (27, "uva")]);
        let mapped = map_record(&record, &directory, &AuditLog::disabled()).record;
        assert_eq!(mapped.address.city, "Testville");
        assert_eq!(mapped.address.province, "uva");

        let record = cmdc(&[(3, "001"), (19, "MAIN ST 90000"), (27, "Atlantis")]);
        let mapped = map_record(&record, &directory, &AuditLog::disabled()).record;
        assert_eq!(mapped.address.province, "");
    }
}
