use thiserror::Error;

use crate::db_types::{LifecycleEvent, NewLifecycleEvent};

#[derive(Debug, Clone, Error)]
pub enum LifecycleApiError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Invalid lifecycle payload. {0}")]
    InvalidPayload(String),
}

/// The `LifecycleManagement` trait defines the append-only lifecycle audit log.
///
/// There is deliberately no read or query contract here: the log exists for auditing, and the
/// sequence is monotonically append-only in arrival order.
#[allow(async_fn_in_trait)]
pub trait LifecycleManagement {
    /// Appends an event to the log and returns the stored record with its assigned id and
    /// timestamp.
    async fn record_event(&self, event: NewLifecycleEvent) -> Result<LifecycleEvent, LifecycleApiError>;
}
