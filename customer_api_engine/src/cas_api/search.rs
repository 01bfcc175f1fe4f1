use crate::db_types::CustomerRecord;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// The raw search parameters as supplied by the caller. Several criteria may be populated at
/// once; only the first non-empty criterion group (in the precedence order of
/// [`SearchQuery::criterion`]) is applied.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub registered_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub party_id_scheme: Option<String>,
    pub party_id_ref: Option<String>,
    /// Exact-equality matching when true, substring containment when false. Name fields only;
    /// email, phone and party-id matching are always exact.
    pub strict_match: bool,
    pub limit: usize,
}

/// The single effective criterion derived from a [`SearchQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    FullName { first: String, last: String },
    FirstName(String),
    LastName(String),
    RegisteredName(String),
    EmailAddress(String),
    PhoneNumber(String),
    PartyId { scheme: String, reference: String },
    /// No criterion supplied: any record matches, up to the limit. A deliberate permissive
    /// default for exploratory testing, not something to imitate in a production search API.
    Any,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

impl SearchQuery {
    /// Selects the criterion to apply. Precedence: first+last name, first name, last name,
    /// registered name, email address, phone number, party-id pair. Criteria further down the
    /// list are ignored when an earlier one is populated.
    pub fn criterion(&self) -> SearchCriterion {
        let first = non_empty(&self.first_name);
        let last = non_empty(&self.last_name);
        match (first, last) {
            (Some(first), Some(last)) => return SearchCriterion::FullName { first, last },
            (Some(first), None) => return SearchCriterion::FirstName(first),
            (None, Some(last)) => return SearchCriterion::LastName(last),
            (None, None) => {},
        }
        if let Some(name) = non_empty(&self.registered_name) {
            return SearchCriterion::RegisteredName(name);
        }
        if let Some(email) = non_empty(&self.email_address) {
            return SearchCriterion::EmailAddress(email);
        }
        if let Some(phone) = non_empty(&self.phone_number) {
            return SearchCriterion::PhoneNumber(phone);
        }
        if let (Some(scheme), Some(reference)) = (non_empty(&self.party_id_scheme), non_empty(&self.party_id_ref)) {
            return SearchCriterion::PartyId { scheme, reference };
        }
        SearchCriterion::Any
    }
}

/// Case-insensitive name matching: exact equality in strict mode, substring containment
/// otherwise.
fn name_matches(stored: &str, wanted: &str, strict: bool) -> bool {
    let stored = stored.to_uppercase();
    let wanted = wanted.to_uppercase();
    if strict {
        stored == wanted
    } else {
        stored.contains(&wanted)
    }
}

/// Applies the matching policy for a single criterion to one record. Records whose type does not
/// carry the relevant field are never eligible (a name search cannot match an organisation).
pub fn matches(record: &CustomerRecord, criterion: &SearchCriterion, strict: bool) -> bool {
    let details = &record.attributes.party_details;
    match criterion {
        SearchCriterion::FullName { first, last } => details
            .individual
            .as_ref()
            .map(|i| name_matches(&i.first_name, first, strict) && name_matches(&i.last_name, last, strict))
            .unwrap_or(false),
        SearchCriterion::FirstName(first) => {
            details.individual.as_ref().map(|i| name_matches(&i.first_name, first, strict)).unwrap_or(false)
        },
        SearchCriterion::LastName(last) => {
            details.individual.as_ref().map(|i| name_matches(&i.last_name, last, strict)).unwrap_or(false)
        },
        SearchCriterion::RegisteredName(name) => {
            details.organisation.as_ref().map(|o| name_matches(&o.registered_name, name, strict)).unwrap_or(false)
        },
        SearchCriterion::EmailAddress(email) => {
            details.email_contact.iter().any(|c| c.email_address.eq_ignore_ascii_case(email))
        },
        SearchCriterion::PhoneNumber(phone) => details.phone_contact.iter().any(|c| &c.phone_number == phone),
        SearchCriterion::PartyId { scheme, reference } => details
            .alternative_party_id_references
            .iter()
            .any(|r| &r.party_id_scheme == scheme && &r.party_id_ref == reference),
        SearchCriterion::Any => true,
    }
}
