use customer_api_engine::{
    db_types::{
        CustomerAttributes,
        CustomerId,
        CustomerKind,
        CustomerRecord,
        ExtensionFieldGroup,
        LifecycleEvent,
        NewLifecycleEvent,
        VulnerabilityRecord,
    },
    traits::{CustomerApiError, CustomerManagement, LifecycleApiError, LifecycleManagement},
    PartyDetailsUpdate,
    SearchQuery,
};
use mockall::mock;

mock! {
    pub CustomerManager {}
    impl CustomerManagement for CustomerManager {
        async fn create_customer(&self, kind: CustomerKind, attributes: CustomerAttributes) -> Result<CustomerRecord, CustomerApiError>;
        async fn fetch_customer(&self, id: &CustomerId) -> Result<Option<CustomerRecord>, CustomerApiError>;
        async fn update_customer(&self, id: &CustomerId, update: PartyDetailsUpdate, audit: ExtensionFieldGroup) -> Result<CustomerRecord, CustomerApiError>;
        async fn fetch_all_customers(&self) -> Result<Vec<CustomerRecord>, CustomerApiError>;
        async fn search_customers(&self, query: &SearchQuery) -> Result<Vec<CustomerRecord>, CustomerApiError>;
        async fn insert_vulnerability(&self, vulnerability: VulnerabilityRecord) -> Result<String, CustomerApiError>;
        async fn fetch_vulnerabilities(&self, customer_id: &CustomerId) -> Result<Vec<VulnerabilityRecord>, CustomerApiError>;
        async fn update_vulnerability(&self, customer_id: &CustomerId, vulnerability_id: &str, attributes: serde_json::Value) -> Result<VulnerabilityRecord, CustomerApiError>;
    }
}

mock! {
    pub LifecycleManager {}
    impl LifecycleManagement for LifecycleManager {
        async fn record_event(&self, event: NewLifecycleEvent) -> Result<LifecycleEvent, LifecycleApiError>;
    }
}
