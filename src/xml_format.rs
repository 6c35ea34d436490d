//! CB5 bounced-cheque batch XML serializer.
//!
//! Emits the namespaced, schema-located `Batch` document: an explicit UTF-8
//! XML declaration, a `BatchIdentifier`, then one `BouncedCheque` element
//! per data record, in input order. Optional personal data is omitted
//! entirely rather than written as empty elements; address children are
//! always present (empty text allowed).

use crate::error::Result;
use crate::types::{Address, Batch, BouncedChequeRecord, Party};
use serde::Serialize;
use std::io::Write;

/// Target namespace of the bounced-cheque reporting schema.
pub const NAMESPACE: &str = "http://creditinfo.com/schemas/CB5/SriLanka/bouncedcheque";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A batch ready for XML serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct BouncedChequeBatch {
    /// The underlying batch data.
    pub batch: Batch,
}

impl BouncedChequeBatch {
    /// Write the batch document to any destination implementing `Write`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let document = self.to_document();
        let xml = quick_xml::se::to_string(&document)?;

        writeln!(writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        write!(writer, "{}", xml)?;

        Ok(())
    }

    fn to_document(&self) -> BatchXml {
        BatchXml {
            xmlns: NAMESPACE,
            xmlns_xsi: XSI_NAMESPACE,
            schema_location: NAMESPACE,
            batch_identifier: self.batch.batch_identifier.clone(),
            bounced_cheques: self.batch.records.iter().map(record_to_xml).collect(),
        }
    }
}

fn record_to_xml(record: &BouncedChequeRecord) -> BouncedChequeXml {
    let (company, individual) = match &record.party {
        Party::Company(c) => (
            Some(CompanyXml {
                customer_code: c.customer_code.clone(),
                company_name: c.company_name.clone(),
                legal_constitution: "Other".to_string(),
                economic_activity_type_1: c.economic_activity.clone(),
                identification_numbers: if c.business_registration_number.is_some()
                    || c.business_registration_date.is_some()
                {
                    Some(CompanyIdsXml {
                        business_registration_number: c.business_registration_number.clone(),
                        business_registration_date: c.business_registration_date.clone(),
                    })
                } else {
                    None
                },
                mailing_address: address_to_xml(&record.address),
                permanent_address: address_to_xml(&record.address),
            }),
            None,
        ),
        Party::Individual(i) => (
            None,
            Some(IndividualXml {
                customer_code: i.customer_code.clone(),
                full_name: i.full_name.clone(),
                salutation: i.salutation.clone(),
                profession: i.profession.clone(),
                spouse_name: i.spouse_name.clone(),
                classification: "Individual".to_string(),
                gender: i.gender.clone(),
                date_of_birth: i.date_of_birth.clone(),
                marital_status: i.marital_status.clone(),
                fate_status: i.fate_status.clone(),
                employment: i.employment.clone(),
                residency: "Yes".to_string(),
                identification_numbers: if i.ids.is_empty() {
                    None
                } else {
                    Some(IndividualIdsXml {
                        nic_number: i.ids.nic_number.clone(),
                        passport_number: i.ids.passport_number.clone(),
                        driving_license_number: i.ids.driving_license_number.clone(),
                        business_registration_number: i.ids.business_registration_number.clone(),
                        business_registration_date: i.ids.business_registration_date.clone(),
                    })
                },
                mailing_address: address_to_xml(&record.address),
                permanent_address: address_to_xml(&record.address),
                contacts: if i.phone_number.is_some() || i.phone_number_2.is_some() {
                    Some(ContactsXml {
                        phone_number: i.phone_number.clone(),
                        phone_number_2: i.phone_number_2.clone(),
                    })
                } else {
                    None
                },
            }),
        ),
    };

    BouncedChequeXml {
        entity_code: record.entity_code.clone(),
        data: BouncedChequeDataXml {
            branch_id: record.cheque.branch_id.clone(),
            cheque_number: record.cheque.cheque_number.clone(),
            cheque_amount: ChequeAmountXml {
                value: record.cheque.amount.clone(),
                currency: record.cheque.currency.clone(),
            },
            account_number: record.cheque.account_number.clone(),
            date_dishonoured: record.cheque.date_dishonoured.clone(),
            reason_for_dishonour: record.cheque.reason.as_str().to_string(),
        },
        company,
        individual,
        subject_role: SubjectRoleXml {
            customer_code: record.party.customer_code().to_string(),
            role_of_customer: "Issuer".to_string(),
        },
    }
}

fn address_to_xml(address: &Address) -> AddressXml {
    AddressXml {
        city: address.city.clone(),
        postal_code: address.postal_code.clone(),
        province: address.province.clone(),
        district: address.district.clone(),
        country: Address::COUNTRY.to_string(),
        address_line: address.address_line.clone(),
    }
}

// XML structure definitions
#[derive(Debug, Serialize)]
#[serde(rename = "Batch")]
struct BatchXml {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    #[serde(rename = "@xmlns:xsi")]
    xmlns_xsi: &'static str,
    #[serde(rename = "@xsi:schemaLocation")]
    schema_location: &'static str,
    #[serde(rename = "BatchIdentifier")]
    batch_identifier: String,
    #[serde(rename = "BouncedCheque")]
    bounced_cheques: Vec<BouncedChequeXml>,
}

#[derive(Debug, Serialize)]
struct BouncedChequeXml {
    #[serde(rename = "EntityCode")]
    entity_code: String,
    #[serde(rename = "BouncedChequeData")]
    data: BouncedChequeDataXml,
    #[serde(rename = "Company", skip_serializing_if = "Option::is_none")]
    company: Option<CompanyXml>,
    #[serde(rename = "Individual", skip_serializing_if = "Option::is_none")]
    individual: Option<IndividualXml>,
    #[serde(rename = "SubjectRole")]
    subject_role: SubjectRoleXml,
}

#[derive(Debug, Serialize)]
struct BouncedChequeDataXml {
    #[serde(rename = "BranchID")]
    branch_id: String,
    #[serde(rename = "ChequeNumber")]
    cheque_number: String,
    #[serde(rename = "ChequeAmount")]
    cheque_amount: ChequeAmountXml,
    #[serde(rename = "AccountNumber")]
    account_number: String,
    #[serde(rename = "DateDishonoured", skip_serializing_if = "Option::is_none")]
    date_dishonoured: Option<String>,
    #[serde(rename = "ReasonForDishonour")]
    reason_for_dishonour: String,
}

#[derive(Debug, Serialize)]
struct ChequeAmountXml {
    #[serde(rename = "Value")]
    value: String,
    #[serde(rename = "Currency")]
    currency: String,
}

#[derive(Debug, Serialize)]
struct CompanyXml {
    #[serde(rename = "CustomerCode")]
    customer_code: String,
    #[serde(rename = "CompanyName")]
    company_name: String,
    #[serde(rename = "LegalConstitution")]
    legal_constitution: String,
    #[serde(rename = "EconomicActivityType1", skip_serializing_if = "Option::is_none")]
    economic_activity_type_1: Option<String>,
    #[serde(rename = "IdentificationNumbers", skip_serializing_if = "Option::is_none")]
    identification_numbers: Option<CompanyIdsXml>,
    #[serde(rename = "MailingAddress")]
    mailing_address: AddressXml,
    #[serde(rename = "PermanentAddress")]
    permanent_address: AddressXml,
}

#[derive(Debug, Serialize)]
struct CompanyIdsXml {
    #[serde(
        rename = "BusinessRegistrationNumber",
        skip_serializing_if = "Option::is_none"
    )]
    business_registration_number: Option<String>,
    #[serde(
        rename = "BusinessRegistrationDate",
        skip_serializing_if = "Option::is_none"
    )]
    business_registration_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct IndividualXml {
    #[serde(rename = "CustomerCode")]
    customer_code: String,
    #[serde(rename = "FullName")]
    full_name: String,
    #[serde(rename = "Salutation", skip_serializing_if = "Option::is_none")]
    salutation: Option<String>,
    #[serde(rename = "Profession", skip_serializing_if = "Option::is_none")]
    profession: Option<String>,
    #[serde(rename = "SpouseName", skip_serializing_if = "Option::is_none")]
    spouse_name: Option<String>,
    #[serde(rename = "ClassificationOfIndividual")]
    classification: String,
    #[serde(rename = "Gender", skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
    #[serde(rename = "DateOfBirth", skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<String>,
    #[serde(rename = "MaritalStatus", skip_serializing_if = "Option::is_none")]
    marital_status: Option<String>,
    #[serde(rename = "FateStatus", skip_serializing_if = "Option::is_none")]
    fate_status: Option<String>,
    #[serde(rename = "Employment", skip_serializing_if = "Option::is_none")]
    employment: Option<String>,
    #[serde(rename = "Residency")]
    residency: String,
    #[serde(rename = "IdentificationNumbers", skip_serializing_if = "Option::is_none")]
    identification_numbers: Option<IndividualIdsXml>,
    #[serde(rename = "MailingAddress")]
    mailing_address: AddressXml,
    #[serde(rename = "PermanentAddress")]
    permanent_address: AddressXml,
    #[serde(rename = "Contacts", skip_serializing_if = "Option::is_none")]
    contacts: Option<ContactsXml>,
}

#[derive(Debug, Serialize)]
struct IndividualIdsXml {
    #[serde(rename = "NICNumber", skip_serializing_if = "Option::is_none")]
    nic_number: Option<String>,
    #[serde(rename = "PassportNumber", skip_serializing_if = "Option::is_none")]
    passport_number: Option<String>,
    #[serde(
        rename = "DrivingLicenseNumber",
        skip_serializing_if = "Option::is_none"
    )]
    driving_license_number: Option<String>,
    #[serde(
        rename = "BusinessRegistrationNumber",
        skip_serializing_if = "Option::is_none"
    )]
    business_registration_number: Option<String>,
    #[serde(
        rename = "BusinessRegistrationDate",
        skip_serializing_if = "Option::is_none"
    )]
    business_registration_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactsXml {
    #[serde(rename = "PhoneNumber", skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(rename = "PhoneNumber2", skip_serializing_if = "Option::is_none")]
    phone_number_2: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddressXml {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "PostalCode")]
    postal_code: String,
    #[serde(rename = "Province")]
    province: String,
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "AddressLine")]
    address_line: String,
}

#[derive(Debug, Serialize)]
struct SubjectRoleXml {
    #[serde(rename = "CustomerCode")]
    customer_code: String,
    #[serde(rename = "RoleOfCustomer")]
    role_of_customer: String,
}
