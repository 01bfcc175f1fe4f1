//! Fake-data generation for the stub server.
//!
//! All names, organisations, addresses and vulnerabilities produced here are fabricated. The
//! server seeds its store from this module at startup so that search and read endpoints return
//! realistic-looking responses without any setup calls.
use chrono::Utc;
use log::*;
use rand::{seq::SliceRandom, thread_rng, Rng};
use serde_json::json;

use crate::{
    db_types::{
        CustomerAttributes,
        CustomerKind,
        CustomerRecord,
        EmailContact,
        ExtensionFieldGroup,
        IndividualDetails,
        OrganisationDetails,
        PartyDetails,
        PartyIdReference,
        PhoneContact,
        PostalAddress,
        Registration,
        VulnerabilityRecord,
    },
    helpers::new_object_id,
    traits::{CustomerApiError, CustomerManagement},
};

const FIRST_NAMES: [&str; 10] =
    ["John", "Jane", "Michael", "Sarah", "David", "Emily", "Robert", "Lisa", "James", "Maria"];
const LAST_NAMES: [&str; 10] =
    ["Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Wilson", "Moore"];
const MIDDLE_NAMES: [&str; 5] = ["James", "Marie", "Ann", "Lee", "Ray"];
const ORG_NAMES: [&str; 5] = [
    "Tech Solutions Pty Ltd",
    "Global Services Corp",
    "Innovation Partners",
    "Digital Systems Ltd",
    "Business Solutions Group",
];
const STREETS: [&str; 6] = ["Main St", "High St", "Park Ave", "Oak Rd", "First St", "Second Ave"];
const SUBURBS: [&str; 6] = ["Richmond", "Melbourne", "Sydney", "Brisbane", "Perth", "Adelaide"];
const STATES: [&str; 6] = ["VIC", "NSW", "QLD", "WA", "SA", "TAS"];
const VULNERABILITY_TYPES: [&str; 4] = ["Family Violence", "Financial Hardship", "Mental Health", "Disability"];
pub const BRANDS: [&str; 4] = ["AAMI", "GIO", "APIA", "Bingle"];

fn choose<'a>(options: &[&'a str]) -> &'a str {
    let mut rng = thread_rng();
    options.choose(&mut rng).copied().unwrap_or(options[0])
}

pub fn sample_individual() -> IndividualDetails {
    let mut rng = thread_rng();
    let middle_name = rng.gen_bool(0.8).then(|| choose(&MIDDLE_NAMES).to_string());
    IndividualDetails {
        first_name: choose(&FIRST_NAMES).to_string(),
        middle_name,
        last_name: choose(&LAST_NAMES).to_string(),
        gender: Some(choose(&["MALE", "FEMALE"]).to_string()),
        deceased: Some(false),
        date_of_birth: Some(format!(
            "{}-{:02}-{:02}",
            rng.gen_range(1950..=2000),
            rng.gen_range(1..=12),
            rng.gen_range(1..=28)
        )),
    }
}

pub fn sample_organisation() -> OrganisationDetails {
    let mut rng = thread_rng();
    OrganisationDetails {
        registered_name: choose(&ORG_NAMES).to_string(),
        organisation_type: Some(choose(&["Corporate", "ForProfit", "NotForProfit"]).to_string()),
        registrations: vec![Registration {
            registration_type: "ABN".to_string(),
            registered_number: rng.gen_range(10_000_000_000u64..=99_999_999_999).to_string(),
        }],
    }
}

pub fn sample_address() -> PostalAddress {
    let mut rng = thread_rng();
    let unit_number = rng.gen_bool(0.5).then(|| rng.gen_range(1..=50).to_string());
    PostalAddress {
        unit_number,
        street_number: rng.gen_range(1..=999).to_string(),
        street_name: choose(&STREETS).to_string(),
        locality: choose(&SUBURBS).to_string(),
        state: choose(&STATES).to_string(),
        postcode: rng.gen_range(1000..=9999).to_string(),
        country_code: "AU".to_string(),
        address_type: "POSTAL".to_string(),
    }
}

/// The common contact and reference groups carried by every generated customer.
fn sample_contacts(brand: &str, seq: usize) -> (Vec<PhoneContact>, Vec<EmailContact>, Vec<PartyIdReference>) {
    let mut rng = thread_rng();
    let phones = vec![PhoneContact {
        phone_type: "MOBILE_PHONE".to_string(),
        country_code: "+61".to_string(),
        phone_number: format!("04{}", rng.gen_range(10_000_000u32..=99_999_999)),
        contact_priority: "1".to_string(),
    }];
    let emails = vec![EmailContact { email_address: format!("customer{seq}@example.com") }];
    let refs = vec![PartyIdReference {
        party_id_scheme: brand.to_uppercase(),
        party_id_ref: format!("{}{seq}", brand.to_uppercase()),
        party_id_status: Some("CUSTOMER".to_string()),
    }];
    (phones, emails, refs)
}

pub fn sample_attributes(kind: CustomerKind, brand: &str, seq: usize) -> CustomerAttributes {
    let (phone_contact, email_contact, alternative_party_id_references) = sample_contacts(brand, seq);
    let party_details = PartyDetails {
        individual: matches!(kind, CustomerKind::Individual).then(sample_individual),
        organisation: matches!(kind, CustomerKind::Organisation).then(sample_organisation),
        postal_contact: Some(sample_address()),
        phone_contact,
        email_contact,
        alternative_party_id_references,
        extension_fields: vec![ExtensionFieldGroup::creation_audit("system", brand, Utc::now())],
    };
    CustomerAttributes { party_details }
}

pub fn sample_vulnerability(owner: &CustomerRecord) -> VulnerabilityRecord {
    let attributes = json!({
        "partyDetails": {
            "partyIdRef": owner.id.as_str(),
            "individual": {
                "vulnerabilities": [{
                    "vulnerabilityType": choose(&VULNERABILITY_TYPES),
                    "vulnerabilityStartDate": "2024-01-01 00:00:00.000",
                    "vulnerabilityEndDate": "2025-12-31 23:59:59.999",
                    "vulnerabilityNotes": [{
                        "id": new_object_id(),
                        "type": "Vulnerability Note",
                        "attributes": {
                            "note": "Customer requires additional support",
                            "extensionFields": []
                        }
                    }]
                }]
            },
            "extensionFields": []
        }
    });
    VulnerabilityRecord::new(owner.id.clone(), new_object_id(), attributes)
}

/// Seeds the store with `count` generated customers, roughly a third of them carrying a
/// vulnerability record.
pub async fn seed<B: CustomerManagement>(db: &B, count: usize) -> Result<(), CustomerApiError> {
    for i in 0..count {
        let (kind, brand) = {
            let mut rng = thread_rng();
            let kind = if rng.gen_bool(0.5) { CustomerKind::Individual } else { CustomerKind::Organisation };
            (kind, choose(&BRANDS))
        };
        let attributes = sample_attributes(kind, brand, 100_000_000 + i);
        let record = db.create_customer(kind, attributes).await?;
        let attach_vulnerability = thread_rng().gen_range(0..3) == 0;
        if attach_vulnerability {
            db.insert_vulnerability(sample_vulnerability(&record)).await?;
        }
    }
    info!("🗃️ Seeded {count} sample customers");
    Ok(())
}
