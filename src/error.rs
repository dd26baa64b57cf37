//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Validation errors** (`UserNotFound`, `ItemNotFound`, `InvalidAmount`,
///   `InsufficientBalance`): raised before any transaction row is created.
///   They surface as rejected requests and never produce a ledger entry.
/// - **Persistence errors** (`Database`, `Storage`): hard failures from the
///   backing store. A gateway decline is *not* an error — processors return
///   a `failed` transaction instead.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested user does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("User not found")]
    UserNotFound,

    /// Requested catalog item does not exist or is not active.
    ///
    /// An inactive item is indistinguishable from a missing one on purpose:
    /// neither is purchasable. Returns HTTP 404 Not Found.
    #[error("Catalog item not found")]
    ItemNotFound,

    /// Wallet balance is lower than the requested debit.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Insufficient balance")]
    InsufficientBalance,

    /// Monetary amount is zero or negative.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Requested transaction does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Transaction not found")]
    TransactionNotFound,

    /// The store holds or returned state the core refuses to act on,
    /// e.g. finalizing a row that is no longer `pending` or decoding an
    /// unknown status string.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", self.to_string()),
            AppError::ItemNotFound => (StatusCode::NOT_FOUND, "item_not_found", self.to_string()),
            AppError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                self.to_string(),
            ),
            AppError::InsufficientBalance => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_balance",
                self.to_string(),
            ),
            AppError::InvalidAmount => {
                (StatusCode::BAD_REQUEST, "invalid_amount", self.to_string())
            }
            // Internal details are hidden from the client
            AppError::Database(_) | AppError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
