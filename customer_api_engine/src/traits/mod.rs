//! Storage backend contracts.
//!
//! This module defines the interfaces that a storage backend must implement in order to act as a
//! backend for the customer API stub.
//!
//! * [`CustomerManagement`] owns the customer collection and its vulnerability sub-records:
//!   creation with audit stamping, point reads, typed attribute-group merging on update, and the
//!   single-criterion search scan.
//! * [`LifecycleManagement`] owns the append-only lifecycle event log.
//!
//! The stub ships a single in-memory implementation ([`crate::MemoryDatabase`]); server code is
//! written against these traits so that endpoint tests can substitute mocks.
mod customer_management;
mod lifecycle_management;

pub use customer_management::{CustomerApiError, CustomerManagement};
pub use lifecycle_management::{LifecycleApiError, LifecycleManagement};
