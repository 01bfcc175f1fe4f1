//! # Customer API stub server
//!
//! An HTTP test double for a customer-management API (v3) and its OAuth2 client-credentials
//! authorization layer. It serves deterministic, realistic-looking fake data for performance and
//! integration testing; there is no real backend and no real customer data anywhere in this
//! crate.
//!
//! ## Configuration
//! The server is configured via `CAS_*` environment variables. See [config](config/index.html)
//! for details.
//!
//! ## Routes
//! * `/oauth/token`: client-credentials token issuance (no auth required).
//! * `/api/health`: liveness check (no auth required).
//! * `/v3/brands/{brand}/customers...`: the customer domain; every route requires a bearer token
//!   with the scope it lists.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
