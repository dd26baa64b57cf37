//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the processing services
//! 3. Returns an HTTP response (JSON, status code)

/// Liveness endpoint
pub mod health;
/// Deposit and top-up endpoints
pub mod transactions;
/// Balance and history endpoints
pub mod wallet;
