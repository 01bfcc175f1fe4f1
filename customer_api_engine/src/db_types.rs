use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------      Scope         ----------------------------------------------------------
/// A named permission governing which operations an access token authorizes.
///
/// Scopes are granted at token-issuance time by intersecting the client's request with the
/// allowed scopes registered for that client. Route guards check tokens against required scopes
/// with OR semantics: a token need only hold one of the scopes a route lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "read-customer")]
    CustomerRead,
    #[serde(rename = "write-customer")]
    CustomerWrite,
    #[serde(rename = "read-vulnerability")]
    VulnerabilityRead,
    #[serde(rename = "write-vulnerability")]
    VulnerabilityWrite,
}

impl Scope {
    /// The full scope set granted to the stock test clients.
    pub fn all() -> Vec<Scope> {
        vec![Scope::CustomerRead, Scope::CustomerWrite, Scope::VulnerabilityRead, Scope::VulnerabilityWrite]
    }
}

/// The scope granted when a client requests only scopes it does not hold. A permissive fallback
/// for test-double usability; do not copy this behaviour into a real authorization service.
pub const DEFAULT_SCOPE: Scope = Scope::CustomerRead;

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::CustomerRead => write!(f, "read-customer"),
            Scope::CustomerWrite => write!(f, "write-customer"),
            Scope::VulnerabilityRead => write!(f, "read-vulnerability"),
            Scope::VulnerabilityWrite => write!(f, "write-vulnerability"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid scope: {0}")]
pub struct InvalidScopeError(String);

impl FromStr for Scope {
    type Err = InvalidScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-customer" => Ok(Self::CustomerRead),
            "write-customer" => Ok(Self::CustomerWrite),
            "read-vulnerability" => Ok(Self::VulnerabilityRead),
            "write-vulnerability" => Ok(Self::VulnerabilityWrite),
            s => Err(InvalidScopeError(s.to_string())),
        }
    }
}

//--------------------------------------     CustomerId     ----------------------------------------------------------
/// A lightweight wrapper around the string identifier assigned to a customer record. Stable
/// across updates; records are never physically deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl FromStr for CustomerId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl CustomerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    CustomerKind    ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerKind {
    /// A natural person, carrying the `individual` block of the party details.
    Individual,
    /// A registered organisation, carrying the `organisation` block.
    Organisation,
}

impl Display for CustomerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerKind::Individual => write!(f, "Individual"),
            CustomerKind::Organisation => write!(f, "Organisation"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid customer kind: {0}")]
pub struct InvalidCustomerKind(String);

impl FromStr for CustomerKind {
    type Err = InvalidCustomerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Individual" => Ok(Self::Individual),
            "Organisation" => Ok(Self::Organisation),
            s => Err(InvalidCustomerKind(s.to_string())),
        }
    }
}

//--------------------------------------    Party details   ----------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndividualDetails {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deceased: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganisationDetails {
    pub registered_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub registrations: Vec<Registration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Registration {
    pub registration_type: String,
    pub registered_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostalAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,
    pub street_number: String,
    pub street_name: String,
    pub locality: String,
    pub state: String,
    pub postcode: String,
    pub country_code: String,
    pub address_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhoneContact {
    pub phone_type: String,
    pub country_code: String,
    pub phone_number: String,
    pub contact_priority: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailContact {
    pub email_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyIdReference {
    pub party_id_scheme: String,
    pub party_id_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_id_status: Option<String>,
}

//--------------------------------------  Extension fields  ----------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionField {
    pub key: String,
    pub value: String,
}

/// A group of appended key-value records attached to a customer. Audit extensions (who created
/// or modified a record, and when) are stamped into these groups by the engine; they are
/// append-only and are not part of the mergeable attribute set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionFieldGroup {
    pub extension_fields_type: String,
    pub extension_fields_category: String,
    pub extension_field: Vec<ExtensionField>,
}

impl ExtensionFieldGroup {
    fn audit(entries: Vec<(&str, String)>) -> Self {
        let extension_field =
            entries.into_iter().map(|(key, value)| ExtensionField { key: key.to_string(), value }).collect();
        Self {
            extension_fields_type: "Customer".to_string(),
            extension_fields_category: "Audit".to_string(),
            extension_field,
        }
    }

    /// The audit group stamped onto a record at creation time.
    pub fn creation_audit(actor: &str, brand: &str, at: DateTime<Utc>) -> Self {
        Self::audit(vec![
            ("createdDate", at.to_rfc3339()),
            ("createdBy", actor.to_string()),
            ("brand", brand.to_string()),
        ])
    }

    /// The audit group appended on every successful update.
    pub fn modification_audit(actor: &str, at: DateTime<Utc>) -> Self {
        Self::audit(vec![("lastModifiedDate", at.to_rfc3339()), ("lastModifiedBy", actor.to_string())])
    }

    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.extension_field.iter().find(|f| f.key == key).map(|f| f.value.as_str())
    }
}

//--------------------------------------   CustomerRecord   ----------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<IndividualDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<OrganisationDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_contact: Option<PostalAddress>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone_contact: Vec<PhoneContact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email_contact: Vec<EmailContact>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternative_party_id_references: Vec<PartyIdReference>,
    pub extension_fields: Vec<ExtensionFieldGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerAttributes {
    pub party_details: PartyDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    #[serde(rename = "type")]
    pub kind: CustomerKind,
    pub attributes: CustomerAttributes,
}

impl CustomerRecord {
    /// The creation audit groups carried by this record, in append order.
    pub fn audit_groups(&self) -> impl Iterator<Item = &ExtensionFieldGroup> {
        self.attributes
            .party_details
            .extension_fields
            .iter()
            .filter(|g| g.extension_fields_category == "Audit")
    }
}

//------------------------------------   VulnerabilityRecord   -------------------------------------------------------
/// A vulnerability sub-record attached to a customer. The owning customer id is a non-owning
/// back-reference maintained by the store index; the `attributes` payload is carried opaquely and
/// shallow-merged on update, the same policy as customer updates scoped to this one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub attributes: serde_json::Value,
    #[serde(skip)]
    pub owner_customer_id: CustomerId,
}

impl VulnerabilityRecord {
    pub fn new(owner: CustomerId, id: String, attributes: serde_json::Value) -> Self {
        Self { id, record_type: "Vulnerability".to_string(), attributes, owner_customer_id: owner }
    }
}

//--------------------------------------   LifecycleEvent   ----------------------------------------------------------
/// An immutable audit record of a lifecycle operation. Events are appended in arrival order and
/// never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub brand: String,
    pub operation: String,
    pub client_id: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLifecycleEvent {
    pub brand: String,
    pub operation: String,
    pub client_id: String,
    pub payload: serde_json::Value,
}
