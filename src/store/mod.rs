//! Storage abstractions for users, catalog items, and the transaction ledger.
//!
//! The processors only ever see these traits. `PgStore` is the production
//! implementation; `MemoryStore` backs the deterministic test suite.
//!
//! # Atomicity
//!
//! `credit_balance` / `debit_balance` are atomic check-and-mutate operations:
//! implementations must guarantee that concurrent calls for the same user
//! behave as if executed in some serial order, and that a failed debit
//! leaves the balance untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::catalog::CatalogItem;
use crate::models::transaction::{Transaction, TransactionStatus};
use crate::models::user::User;

/// In-memory store used by tests
pub mod memory;
/// PostgreSQL store used in production
pub mod postgres;

/// Read and mutate wallet-holding users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by id.
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Atomically add `amount_cents` to the user's balance and touch
    /// `updated_at`. Returns the new balance.
    async fn credit_balance(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Atomically subtract `amount_cents` from the user's balance and touch
    /// `updated_at`. Returns the new balance, `InsufficientBalance` if the
    /// balance would go negative (no mutation in that case).
    async fn debit_balance(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError>;
}

/// Read-only catalog lookups.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get_item(&self, item_id: Uuid) -> Result<Option<CatalogItem>, AppError>;
}

/// Durable append/update store for transaction records.
///
/// Each row is owned by exactly one processor invocation from `insert` to
/// `finalize`; the store never moves a row between states on its own.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist a freshly created `pending` transaction.
    async fn insert(&self, transaction: &Transaction) -> Result<(), AppError>;

    /// Move a `pending` transaction to a terminal status, recording the
    /// gateway reference when one was produced. Refuses with a `Storage`
    /// error if the row is not `pending` anymore. Returns the updated row.
    async fn finalize(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
        gateway_reference: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<Transaction, AppError>;

    /// Fetch a transaction by id.
    async fn get(&self, transaction_id: Uuid) -> Result<Option<Transaction>, AppError>;

    /// List a user's transactions, newest first, restartable via `offset`.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, AppError>;
}
