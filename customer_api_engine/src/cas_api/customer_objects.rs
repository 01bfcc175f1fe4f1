use serde::{Deserialize, Serialize};

use crate::db_types::{
    EmailContact,
    IndividualDetails,
    OrganisationDetails,
    PartyDetails,
    PartyIdReference,
    PhoneContact,
    PostalAddress,
};

/// A partial update to a customer's party details.
///
/// This is the enumerated, bounded set of mergeable attribute groups. Merging is shallow: a group
/// that is present in the patch replaces the stored group wholesale, groups that are absent are
/// preserved untouched. Extension fields are deliberately not part of this set; audit groups are
/// appended by the engine and cannot be rewritten through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyDetailsUpdate {
    pub individual: Option<IndividualDetails>,
    pub organisation: Option<OrganisationDetails>,
    pub postal_contact: Option<PostalAddress>,
    pub phone_contact: Option<Vec<PhoneContact>>,
    pub email_contact: Option<Vec<EmailContact>>,
    pub alternative_party_id_references: Option<Vec<PartyIdReference>>,
}

impl PartyDetailsUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the shallow merge to the stored details. The caller appends the modification audit
    /// group as part of the same atomic mutation.
    pub fn apply_to(&self, details: &mut PartyDetails) {
        if let Some(individual) = &self.individual {
            details.individual = Some(individual.clone());
        }
        if let Some(organisation) = &self.organisation {
            details.organisation = Some(organisation.clone());
        }
        if let Some(postal) = &self.postal_contact {
            details.postal_contact = Some(postal.clone());
        }
        if let Some(phones) = &self.phone_contact {
            details.phone_contact = phones.clone();
        }
        if let Some(emails) = &self.email_contact {
            details.email_contact = emails.clone();
        }
        if let Some(refs) = &self.alternative_party_id_references {
            details.alternative_party_id_references = refs.clone();
        }
    }
}
