use thiserror::Error;

use crate::{
    cas_api::{customer_objects::PartyDetailsUpdate, search::SearchQuery},
    db_types::{CustomerAttributes, CustomerId, CustomerKind, CustomerRecord, ExtensionFieldGroup, VulnerabilityRecord},
};

#[derive(Debug, Clone, Error)]
pub enum CustomerApiError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("Vulnerability {0} not found")]
    VulnerabilityNotFound(String),
    #[error("Invalid customer payload. {0}")]
    InvalidInput(String),
    #[error("No customers found matching the search criteria")]
    NoMatches,
}

/// The `CustomerManagement` trait defines the behaviour of the customer store: the in-memory
/// collection of customer records and their vulnerability sub-records.
///
/// Implementations are shared between concurrent requests. Every mutating operation must be
/// applied atomically: a logical mutation such as "merge the patch and append the audit group"
/// may never be observed half-done by a concurrent reader.
#[allow(async_fn_in_trait)]
pub trait CustomerManagement {
    /// Assigns a fresh unique id to the given attributes and stores the new record. The caller is
    /// responsible for stamping the creation audit group into the attributes beforehand.
    async fn create_customer(
        &self,
        kind: CustomerKind,
        attributes: CustomerAttributes,
    ) -> Result<CustomerRecord, CustomerApiError>;

    /// Fetches a customer by id. Returns `None` if no such customer exists.
    async fn fetch_customer(&self, id: &CustomerId) -> Result<Option<CustomerRecord>, CustomerApiError>;

    /// Merges the supplied attribute groups into the stored record and appends the audit group,
    /// as one indivisible mutation. Groups present in the patch replace the stored group; groups
    /// absent from the patch are preserved.
    async fn update_customer(
        &self,
        id: &CustomerId,
        update: PartyDetailsUpdate,
        audit: ExtensionFieldGroup,
    ) -> Result<CustomerRecord, CustomerApiError>;

    /// Returns every customer record in insertion order.
    async fn fetch_all_customers(&self) -> Result<Vec<CustomerRecord>, CustomerApiError>;

    /// Scans the store in insertion order, collecting records that match the query's single
    /// effective criterion, and stops once `query.limit` records have been collected.
    async fn search_customers(&self, query: &SearchQuery) -> Result<Vec<CustomerRecord>, CustomerApiError>;

    /// Attaches a vulnerability record to an existing customer. Fails with
    /// [`CustomerApiError::CustomerNotFound`] if the back-referenced customer does not exist.
    async fn insert_vulnerability(&self, vulnerability: VulnerabilityRecord) -> Result<String, CustomerApiError>;

    /// Fetches the vulnerabilities attached to a customer. The list may be empty; a missing
    /// customer is an error so that callers can distinguish "no vulnerabilities" from "no such
    /// customer".
    async fn fetch_vulnerabilities(&self, customer_id: &CustomerId)
        -> Result<Vec<VulnerabilityRecord>, CustomerApiError>;

    /// Shallow-merges the supplied attributes into the vulnerability's attributes group and
    /// returns the updated record.
    async fn update_vulnerability(
        &self,
        customer_id: &CustomerId,
        vulnerability_id: &str,
        attributes: serde_json::Value,
    ) -> Result<VulnerabilityRecord, CustomerApiError>;
}
