//! Wallet HTTP handlers.
//!
//! This module implements the wallet-facing read endpoints:
//! - GET /api/v1/users/:id/balance - Current wallet balance
//! - GET /api/v1/users/:id/transactions - Transaction history, newest first

use crate::{
    AppState,
    error::AppError,
    models::{
        transaction::{HistoryQuery, TransactionResponse},
        user::BalanceResponse,
    },
    store::LedgerStore,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

/// Largest page size the history endpoint will serve.
const MAX_PAGE_SIZE: i64 = 100;

/// Get a user's current wallet balance.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "user_id": "550e8400-...",
///   "balance_cents": 100000
/// }
/// ```
pub async fn get_balance(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance_cents = state.wallet.balance_of(user_id).await?;

    Ok(Json(BalanceResponse {
        user_id,
        balance_cents,
    }))
}

/// List a user's transactions, newest first.
///
/// # Query Parameters
///
/// - `limit` - page size, defaults to 50, capped at 100
/// - `offset` - records to skip, defaults to 0; makes the listing
///   restartable
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<TransactionResponse>>, AppError> {
    // 404 for unknown users rather than an empty page.
    state.wallet.balance_of(user_id).await?;

    let limit = query.limit.unwrap_or(50).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let transactions = state.ledger.list_for_user(user_id, limit, offset).await?;

    Ok(Json(transactions.into_iter().map(Into::into).collect()))
}
