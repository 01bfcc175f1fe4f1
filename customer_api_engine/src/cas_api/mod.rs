//! The engine public API.
//!
//! This module provides the public-facing functionality of the customer API stub: the OAuth
//! client registry and scope negotiation policy, the customer and lifecycle APIs that wrap a
//! storage backend, the typed update objects with their merge semantics, and the
//! single-criterion search matcher.
pub mod auth_api;
pub mod customer_objects;
pub mod customers_api;
pub mod lifecycle_api;
pub mod search;
