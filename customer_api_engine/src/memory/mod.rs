//! The in-memory storage backend.
//!
//! All a test double needs: customers, vulnerability sub-records and the lifecycle log live in a
//! single set of process-local stores behind one `RwLock`, so every logical mutation (including
//! "merge attributes and append the audit group") is indivisible to concurrent readers. Nothing
//! is persisted; restarting the server resets the world.
mod memory_impl;

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::db_types::{CustomerRecord, LifecycleEvent, VulnerabilityRecord};

#[derive(Debug, Default)]
pub(crate) struct MemoryStores {
    /// Customer records in insertion order. Search-scan order and therefore result order follow
    /// this ordering.
    pub customers: Vec<CustomerRecord>,
    /// Customer id -> position in `customers`.
    pub customer_index: HashMap<String, usize>,
    /// Vulnerabilities keyed by owner customer id, then scanned by their own id.
    pub vulnerabilities: HashMap<String, Vec<VulnerabilityRecord>>,
    /// Append-only lifecycle log in arrival order.
    pub lifecycle_events: Vec<LifecycleEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    pub(crate) stores: Arc<RwLock<MemoryStores>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of customer records currently held.
    pub async fn customer_count(&self) -> usize {
        self.stores.read().await.customers.len()
    }

    #[cfg(test)]
    pub(crate) async fn lifecycle_events(&self) -> Vec<LifecycleEvent> {
        self.stores.read().await.lifecycle_events.clone()
    }
}
