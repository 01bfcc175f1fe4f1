//! Customer API Stub Engine
//!
//! This library contains the core logic for the customer API stub server: a test double that
//! emulates a customer-management API for performance and integration testing. It is
//! transport-agnostic; the HTTP layer lives in the `customer_api_server` crate.
//!
//! The library is divided into three main sections:
//! 1. Storage traits ([`mod@traits`]). These define the contracts that a storage backend must
//!    fulfil in order to act as a backend for the stub server. The only backend shipped here is
//!    the in-memory [`MemoryDatabase`], which is all a test double needs, but the server code only
//!    ever talks to the traits.
//! 2. The engine public API ([`mod@cas_api`]). This provides the public-facing functionality:
//!    customer creation and retrieval, attribute merging, single-criterion search, vulnerability
//!    sub-records and the append-only lifecycle log. It is also home to the OAuth client registry
//!    and the scope negotiation policy used by the token endpoint.
//! 3. Helpers ([`mod@helpers`]): identifier generation, JSON merging and the sample-data
//!    generator used to seed the server with realistic-looking fake customers at startup.
pub mod cas_api;
pub mod db_types;
pub mod helpers;
pub mod traits;

mod memory;

pub use cas_api::{
    auth_api::{negotiate_scopes, ClientCredential, ClientRegistry},
    customer_objects::PartyDetailsUpdate,
    customers_api::CustomerApi,
    lifecycle_api::LifecycleApi,
    search::{SearchCriterion, SearchQuery},
};
pub use memory::MemoryDatabase;
pub use traits::{CustomerApiError, CustomerManagement, LifecycleApiError, LifecycleManagement};
