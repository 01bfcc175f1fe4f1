use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{LifecycleEvent, NewLifecycleEvent},
    traits::{LifecycleApiError, LifecycleManagement},
};

/// The lifecycle audit API: a pure append over the backend's event log.
pub struct LifecycleApi<B> {
    db: B,
}

impl<B: Debug> Debug for LifecycleApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LifecycleApi ({:?})", self.db)
    }
}

impl<B> LifecycleApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> LifecycleApi<B>
where B: LifecycleManagement
{
    /// Appends an event to the log. The only failure mode is a malformed payload: an event
    /// without an operation name is not auditable.
    pub async fn record_event(&self, event: NewLifecycleEvent) -> Result<LifecycleEvent, LifecycleApiError> {
        if event.operation.trim().is_empty() {
            return Err(LifecycleApiError::InvalidPayload("The lifecycle operation must be supplied".to_string()));
        }
        let stored = self.db.record_event(event).await?;
        debug!("📒️ Recorded lifecycle event {} ({})", stored.id, stored.operation);
        Ok(stored)
    }
}
