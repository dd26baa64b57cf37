//! In-memory store implementation.
//!
//! Backs the deterministic test suite and keeps the per-user serialization
//! guarantee by construction: every balance check-and-mutate happens under a
//! single lock hold, so concurrent credits and debits for one user are
//! equivalent to some serial order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::catalog::CatalogItem;
use crate::models::transaction::{Transaction, TransactionStatus};
use crate::models::user::User;

use super::{CatalogStore, LedgerStore, UserStore};

/// In-memory store over tokio locks.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    items: RwLock<HashMap<Uuid, CatalogItem>>,
    // Insertion-ordered; newest entries at the back.
    ledger: Mutex<Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub async fn put_user(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }

    /// Insert or replace a catalog item.
    pub async fn put_item(&self, item: CatalogItem) {
        self.items.write().await.insert(item.id, item);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn credit_balance(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(&user_id).ok_or(AppError::UserNotFound)?;
        user.balance_cents += amount_cents;
        user.updated_at = now;
        Ok(user.balance_cents)
    }

    async fn debit_balance(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let mut users = self.users.lock().await;
        let user = users.get_mut(&user_id).ok_or(AppError::UserNotFound)?;
        // Check and mutate under the same lock hold.
        if user.balance_cents < amount_cents {
            return Err(AppError::InsufficientBalance);
        }
        user.balance_cents -= amount_cents;
        user.updated_at = now;
        Ok(user.balance_cents)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_item(&self, item_id: Uuid) -> Result<Option<CatalogItem>, AppError> {
        Ok(self.items.read().await.get(&item_id).cloned())
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert(&self, transaction: &Transaction) -> Result<(), AppError> {
        self.ledger.lock().await.push(transaction.clone());
        Ok(())
    }

    async fn finalize(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
        gateway_reference: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<Transaction, AppError> {
        let mut ledger = self.ledger.lock().await;
        let transaction = ledger
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or(AppError::TransactionNotFound)?;

        if !transaction.status.can_transition_to(status) {
            return Err(AppError::Storage(format!(
                "cannot finalize transaction {transaction_id}: {} -> {status}",
                transaction.status
            )));
        }

        transaction.status = status;
        if gateway_reference.is_some() {
            transaction.gateway_reference = gateway_reference;
        }
        transaction.updated_at = updated_at;
        Ok(transaction.clone())
    }

    async fn get(&self, transaction_id: Uuid) -> Result<Option<Transaction>, AppError> {
        Ok(self
            .ledger
            .lock()
            .await
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, AppError> {
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
