//! Wallet balance manager.
//!
//! Owns every read and mutation of a user's balance. Processors never write
//! a balance directly; they go through this service, which validates the
//! amount and delegates the atomic check-and-mutate to the store.
//!
//! # Atomicity Guarantees
//!
//! The store executes each credit/debit as an atomic unit per user (a single
//! lock hold in memory, a conditioned single-statement UPDATE in PostgreSQL),
//! so the net effect of concurrent operations on one user is equivalent to
//! some serial order: no lost updates, no overdraft from a stale read.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::ids::Clock;
use crate::store::UserStore;

/// Read/adjust operations on user balances.
pub struct WalletService {
    users: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
}

impl WalletService {
    pub fn new(users: Arc<dyn UserStore>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Current balance in cents.
    ///
    /// # Errors
    ///
    /// - `UserNotFound`: user doesn't exist
    pub async fn balance_of(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.users
            .get_user(user_id)
            .await?
            .map(|user| user.balance_cents)
            .ok_or(AppError::UserNotFound)
    }

    /// Add `amount_cents` to the user's balance.
    ///
    /// Returns the new balance and touches the user's `updated_at`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is zero or negative
    /// - `UserNotFound`: user doesn't exist
    pub async fn credit(&self, user_id: Uuid, amount_cents: i64) -> Result<i64, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let balance = self
            .users
            .credit_balance(user_id, amount_cents, self.clock.now())
            .await?;

        tracing::debug!(%user_id, amount_cents, balance, "credited wallet");
        Ok(balance)
    }

    /// Subtract `amount_cents` from the user's balance.
    ///
    /// Returns the new balance and touches the user's `updated_at`.
    /// The balance is left untouched on any failure.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount`: amount is zero or negative
    /// - `UserNotFound`: user doesn't exist
    /// - `InsufficientBalance`: balance would go negative
    pub async fn debit(&self, user_id: Uuid, amount_cents: i64) -> Result<i64, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let balance = self
            .users
            .debit_balance(user_id, amount_cents, self.clock.now())
            .await?;

        tracing::debug!(%user_id, amount_cents, balance, "debited wallet");
        Ok(balance)
    }
}
