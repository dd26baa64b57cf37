//! Transaction HTTP handlers.
//!
//! This module implements the transaction-related API endpoints:
//! - POST /api/v1/deposits - Add funds to a wallet
//! - POST /api/v1/topups - Purchase a catalog item
//! - GET /api/v1/transactions/:id - Get transaction details

use crate::{
    AppState,
    error::AppError,
    models::transaction::{DepositRequest, TopUpRequest, TransactionResponse},
    store::LedgerStore,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// Deposit funds into a wallet.
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": "550e8400-...",
///   "amount_cents": 100000
/// }
/// ```
///
/// # Response
///
/// The finalized transaction. A declined payment is not an error: the
/// response carries `"status": "failed"` and the balance is untouched.
pub async fn create_deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = state
        .deposits
        .deposit(request.user_id, request.amount_cents, request.payment_method)
        .await?;

    Ok(Json(transaction.into()))
}

/// Purchase a catalog item.
///
/// # Request Body
///
/// ```json
/// {
///   "user_id": "550e8400-...",
///   "catalog_item_id": "660e8400-...",
///   "target_identifier": "+15550001234",
///   "payment_method": "wallet"
/// }
/// ```
///
/// # Validation
///
/// - Item must exist and be active (404 otherwise)
/// - User must exist (404 otherwise)
/// - For wallet payment the balance must cover the price (422 otherwise)
///
/// A provider decline or timeout is returned as a `failed` transaction,
/// not an error status.
pub async fn create_topup(
    State(state): State<AppState>,
    Json(request): Json<TopUpRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = state
        .topups
        .topup(
            request.user_id,
            request.catalog_item_id,
            request.target_identifier,
            request.payment_method,
        )
        .await?;

    Ok(Json(transaction.into()))
}

/// Get transaction by ID.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = state
        .ledger
        .get(transaction_id)
        .await?
        .ok_or(AppError::TransactionNotFound)?;

    Ok(Json(transaction.into()))
}
