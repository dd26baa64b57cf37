//! Data models representing the service's entities.
//!
//! This module contains the structures persisted by the stores and the
//! request/response types exchanged with API clients.

/// Catalog item model
pub mod catalog;
/// Transaction ledger entity and API types
pub mod transaction;
/// Wallet-holding user model
pub mod user;
