use chrono::Utc;

use super::MemoryDatabase;
use crate::{
    cas_api::search,
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
    helpers::{new_customer_id, new_object_id, shallow_merge},
    traits::{CustomerApiError, CustomerManagement, LifecycleApiError, LifecycleManagement},
    PartyDetailsUpdate,
    SearchQuery,
};

impl CustomerManagement for MemoryDatabase {
    async fn create_customer(
        &self,
        kind: CustomerKind,
        attributes: CustomerAttributes,
    ) -> Result<CustomerRecord, CustomerApiError> {
        let mut stores = self.stores.write().await;
        let mut id = new_customer_id();
        while stores.customer_index.contains_key(&id) {
            id = new_customer_id();
        }
        let record = CustomerRecord { id: CustomerId::from(id.clone()), kind, attributes };
        stores.customers.push(record.clone());
        let position = stores.customers.len() - 1;
        stores.customer_index.insert(id, position);
        Ok(record)
    }

    async fn fetch_customer(&self, id: &CustomerId) -> Result<Option<CustomerRecord>, CustomerApiError> {
        let stores = self.stores.read().await;
        Ok(stores.customer_index.get(id.as_str()).map(|&i| stores.customers[i].clone()))
    }

    async fn update_customer(
        &self,
        id: &CustomerId,
        update: PartyDetailsUpdate,
        audit: ExtensionFieldGroup,
    ) -> Result<CustomerRecord, CustomerApiError> {
        let mut stores = self.stores.write().await;
        let position =
            *stores.customer_index.get(id.as_str()).ok_or_else(|| CustomerApiError::CustomerNotFound(id.clone()))?;
        let record = &mut stores.customers[position];
        update.apply_to(&mut record.attributes.party_details);
        record.attributes.party_details.extension_fields.push(audit);
        Ok(record.clone())
    }

    async fn fetch_all_customers(&self) -> Result<Vec<CustomerRecord>, CustomerApiError> {
        Ok(self.stores.read().await.customers.clone())
    }

    async fn search_customers(&self, query: &SearchQuery) -> Result<Vec<CustomerRecord>, CustomerApiError> {
        let criterion = query.criterion();
        let stores = self.stores.read().await;
        let results = stores
            .customers
            .iter()
            .filter(|record| search::matches(record, &criterion, query.strict_match))
            .take(query.limit)
            .cloned()
            .collect();
        Ok(results)
    }

    async fn insert_vulnerability(&self, vulnerability: VulnerabilityRecord) -> Result<String, CustomerApiError> {
        let mut stores = self.stores.write().await;
        let owner = vulnerability.owner_customer_id.clone();
        if !stores.customer_index.contains_key(owner.as_str()) {
            return Err(CustomerApiError::CustomerNotFound(owner));
        }
        let id = vulnerability.id.clone();
        stores.vulnerabilities.entry(owner.0).or_default().push(vulnerability);
        Ok(id)
    }

    async fn fetch_vulnerabilities(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<VulnerabilityRecord>, CustomerApiError> {
        let stores = self.stores.read().await;
        if !stores.customer_index.contains_key(customer_id.as_str()) {
            return Err(CustomerApiError::CustomerNotFound(customer_id.clone()));
        }
        Ok(stores.vulnerabilities.get(customer_id.as_str()).cloned().unwrap_or_default())
    }

    async fn update_vulnerability(
        &self,
        customer_id: &CustomerId,
        vulnerability_id: &str,
        attributes: serde_json::Value,
    ) -> Result<VulnerabilityRecord, CustomerApiError> {
        let mut stores = self.stores.write().await;
        if !stores.customer_index.contains_key(customer_id.as_str()) {
            return Err(CustomerApiError::CustomerNotFound(customer_id.clone()));
        }
        let record = stores
            .vulnerabilities
            .get_mut(customer_id.as_str())
            .and_then(|vulns| vulns.iter_mut().find(|v| v.id == vulnerability_id))
            .ok_or_else(|| CustomerApiError::VulnerabilityNotFound(vulnerability_id.to_string()))?;
        shallow_merge(&mut record.attributes, attributes);
        Ok(record.clone())
    }
}

impl LifecycleManagement for MemoryDatabase {
    async fn record_event(&self, event: NewLifecycleEvent) -> Result<LifecycleEvent, LifecycleApiError> {
        let mut stores = self.stores.write().await;
        let stored = LifecycleEvent {
            id: new_object_id(),
            timestamp: Utc::now(),
            brand: event.brand,
            operation: event.operation,
            client_id: event.client_id,
            payload: event.payload,
        };
        stores.lifecycle_events.push(stored.clone());
        Ok(stored)
    }
}
