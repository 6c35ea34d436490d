//! Common types used across the DLT-to-CB5 conversion.

use serde::{Deserialize, Serialize};

/// The nine Sri Lankan provinces accepted on output.
pub const PROVINCES: [&str; 9] = [
    "Western",
    "Central",
    "Southern",
    "Northern",
    "Eastern",
    "North Western",
    "North Central",
    "Uva",
    "Sabaragamuwa",
];

/// Marital status values accepted on output.
pub const MARITAL_STATUSES: [&str; 6] = [
    "Unmarried",
    "Married",
    "Widowed",
    "Divorced",
    "Separated",
    "Single",
];

/// Reason a cheque was dishonoured, mapped from the DLT reason code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DishonourReason {
    /// Reason code "001".
    InsufficientFunds,
    /// Any other (or absent) reason code.
    Unknown,
}

impl DishonourReason {
    /// Map a raw DLT reason code to the closed reason enumeration.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("001") => DishonourReason::InsufficientFunds,
            _ => DishonourReason::Unknown,
        }
    }

    /// String form used in the XML output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DishonourReason::InsufficientFunds => "InsufficientFunds",
            DishonourReason::Unknown => "Unknown",
        }
    }
}

/// Classification of the party on a bounced-cheque record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Individual,
    Company,
}

impl EntityKind {
    /// Customer-code suffix that disambiguates the party type.
    pub fn code_suffix(&self) -> &'static str {
        match self {
            EntityKind::Individual => "-1",
            EntityKind::Company => "-3",
        }
    }
}

/// A resolved postal address.
///
/// All fields may be empty; the country is always "LK". The mailing and
/// permanent addresses of a party are identical copies of one `Address`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub postal_code: String,
    pub province: String,
    pub district: String,
    /// Residual free text after removing matched postal code / city tokens.
    pub address_line: String,
}

impl Address {
    /// Country code emitted for every address in this feed.
    pub const COUNTRY: &'static str = "LK";
}

/// Cheque-level data of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChequeData {
    pub branch_id: String,
    pub account_number: String,
    pub cheque_number: String,
    /// Formatted with two fraction digits when parseable, else raw.
    pub amount: String,
    pub currency: String,
    /// ISO `YYYY-MM-DD` when parseable, raw passthrough otherwise,
    /// `None` when the field was blank.
    pub date_dishonoured: Option<String>,
    pub reason: DishonourReason,
}

/// Identification numbers carried by an individual.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndividualIds {
    pub nic_number: Option<String>,
    pub passport_number: Option<String>,
    pub driving_license_number: Option<String>,
    pub business_registration_number: Option<String>,
    pub business_registration_date: Option<String>,
}

impl IndividualIds {
    pub fn is_empty(&self) -> bool {
        self.nic_number.is_none()
            && self.passport_number.is_none()
            && self.driving_license_number.is_none()
            && self.business_registration_number.is_none()
            && self.business_registration_date.is_none()
    }
}

/// Individual party data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Individual {
    pub customer_code: String,
    pub full_name: String,
    pub salutation: Option<String>,
    pub profession: Option<String>,
    pub spouse_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub marital_status: Option<String>,
    pub fate_status: Option<String>,
    pub employment: Option<String>,
    pub ids: IndividualIds,
    pub phone_number: Option<String>,
    pub phone_number_2: Option<String>,
}

/// Company party data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Company {
    pub customer_code: String,
    pub company_name: String,
    pub economic_activity: Option<String>,
    pub business_registration_number: Option<String>,
    pub business_registration_date: Option<String>,
}

/// The party on a bounced-cheque record: exactly one variant per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Party {
    Individual(Individual),
    Company(Company),
}

impl Party {
    /// Customer code shared by the party element and the subject role.
    pub fn customer_code(&self) -> &str {
        match self {
            Party::Individual(i) => &i.customer_code,
            Party::Company(c) => &c.customer_code,
        }
    }
}

/// One converted bounced-cheque record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BouncedChequeRecord {
    /// Hyphen-join of account, cheque number and branch id, blanks skipped.
    pub entity_code: String,
    pub cheque: ChequeData,
    pub party: Party,
    /// Mailing address; the permanent address is an identical copy.
    pub address: Address,
}

/// A full batch of converted records, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_identifier: String,
    pub records: Vec<BouncedChequeRecord>,
}

impl Batch {
    /// Batch identifier used when the header line is absent.
    pub const DEFAULT_IDENTIFIER: &'static str = "DLT_BATCH";

    pub fn new(batch_identifier: String) -> Self {
        Self {
            batch_identifier,
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: BouncedChequeRecord) {
        self.records.push(record);
    }
}
