//! Wallet Top-Up Service
//!
//! A REST service for prepaid wallets: users deposit funds via an external
//! payment method and spend them (or the external method directly) on
//! catalog items fulfilled by a third-party provider.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries); an in-memory store
//!   backs the deterministic test suite
//! - **Processing core**: deposit and top-up processors drive each ledger
//!   entry through a `pending -> completed | failed` transition while the
//!   wallet service keeps balances consistent under concurrent access
//! - **Collaborators**: the provider gateway and the payment method are
//!   injected trait objects, replaceable with deterministic doubles

pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod ids;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::services::deposit_service::DepositService;
use crate::services::topup_service::TopUpService;
use crate::services::wallet_service::WalletService;
use crate::store::LedgerStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<WalletService>,
    pub deposits: Arc<DepositService>,
    pub topups: Arc<TopUpService>,
    pub ledger: Arc<dyn LedgerStore>,
}

/// Build the HTTP router over the given state.
///
/// Shared between the binary and the HTTP-level tests so both exercise the
/// same wiring.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Transaction routes
        .route("/api/v1/deposits", post(handlers::transactions::create_deposit))
        .route("/api/v1/topups", post(handlers::transactions::create_topup))
        .route(
            "/api/v1/transactions/{id}",
            get(handlers::transactions::get_transaction),
        )
        // Wallet routes
        .route("/api/v1/users/{id}/balance", get(handlers::wallet::get_balance))
        .route(
            "/api/v1/users/{id}/transactions",
            get(handlers::wallet::list_transactions),
        )
        // Add tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
