use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    cas_api::{customer_objects::PartyDetailsUpdate, search::SearchQuery},
    db_types::{
        CustomerAttributes,
        CustomerId,
        CustomerKind,
        CustomerRecord,
        ExtensionFieldGroup,
        VulnerabilityRecord,
    },
    traits::{CustomerApiError, CustomerManagement},
};

/// The customer-domain API. Wraps a storage backend and applies the policy the backend does not
/// care about: structural validation on create, audit stamping, and the no-matches rule on
/// search.
pub struct CustomerApi<B> {
    db: B,
}

impl<B: Debug> Debug for CustomerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomerApi ({:?})", self.db)
    }
}

impl<B> CustomerApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CustomerApi<B>
where B: CustomerManagement
{
    /// Creates a new customer record. The record's kind must carry its matching type-specific
    /// block (an `Individual` without an `individual` block is malformed). A creation audit group
    /// attributing the caller is stamped into the attributes before the record is stored.
    pub async fn create_customer(
        &self,
        kind: CustomerKind,
        mut attributes: CustomerAttributes,
        actor: &str,
        brand: &str,
    ) -> Result<CustomerRecord, CustomerApiError> {
        match kind {
            CustomerKind::Individual if attributes.party_details.individual.is_none() => {
                return Err(CustomerApiError::InvalidInput(
                    "An Individual customer requires an individual block in its party details".to_string(),
                ));
            },
            CustomerKind::Organisation if attributes.party_details.organisation.is_none() => {
                return Err(CustomerApiError::InvalidInput(
                    "An Organisation customer requires an organisation block in its party details".to_string(),
                ));
            },
            _ => {},
        }
        attributes.party_details.extension_fields.push(ExtensionFieldGroup::creation_audit(actor, brand, Utc::now()));
        let record = self.db.create_customer(kind, attributes).await?;
        debug!("🗃️ Created {kind} customer {}", record.id);
        Ok(record)
    }

    pub async fn fetch_customer(&self, id: &CustomerId) -> Result<Option<CustomerRecord>, CustomerApiError> {
        self.db.fetch_customer(id).await
    }

    /// Merges the patch into the stored record and appends a modification audit group, as one
    /// atomic mutation.
    pub async fn update_customer(
        &self,
        id: &CustomerId,
        update: PartyDetailsUpdate,
        actor: &str,
    ) -> Result<CustomerRecord, CustomerApiError> {
        let audit = ExtensionFieldGroup::modification_audit(actor, Utc::now());
        let record = self.db.update_customer(id, update, audit).await?;
        debug!("🗃️ Updated customer {id}");
        Ok(record)
    }

    /// Runs the single-criterion search. Zero matching records is an error so that the caller can
    /// surface it as a not-found condition.
    pub async fn search_customers(&self, query: &SearchQuery) -> Result<Vec<CustomerRecord>, CustomerApiError> {
        let results = self.db.search_customers(query).await?;
        if results.is_empty() {
            return Err(CustomerApiError::NoMatches);
        }
        Ok(results)
    }

    pub async fn fetch_vulnerabilities(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<VulnerabilityRecord>, CustomerApiError> {
        self.db.fetch_vulnerabilities(customer_id).await
    }

    pub async fn update_vulnerability(
        &self,
        customer_id: &CustomerId,
        vulnerability_id: &str,
        attributes: serde_json::Value,
    ) -> Result<VulnerabilityRecord, CustomerApiError> {
        let record = self.db.update_vulnerability(customer_id, vulnerability_id, attributes).await?;
        debug!("🗃️ Updated vulnerability {vulnerability_id} for customer {customer_id}");
        Ok(record)
    }
}
