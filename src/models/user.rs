//! User data model and API response types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user holding a prepaid wallet.
///
/// # Balance Storage
///
/// The balance is stored as `i64` cents to avoid floating-point precision
/// issues. For example, $10.50 is stored as 1050 cents.
///
/// The balance must never go negative (enforced by the wallet service and,
/// in PostgreSQL, by a CHECK constraint). It is mutated exclusively through
/// the wallet service, never written directly by a processor.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    /// Unique identifier for this user
    pub id: Uuid,

    /// Display name
    pub full_name: String,

    /// Contact email (unique)
    pub email: String,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Current wallet balance in cents
    pub balance_cents: i64,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last balance mutation
    pub updated_at: DateTime<Utc>,
}

/// Response body for the wallet balance endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": "550e8400-e29b-41d4-a716-446655440000",
///   "balance_cents": 100000
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub user_id: Uuid,
    pub balance_cents: i64,
}
