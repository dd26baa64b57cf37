//! PostgreSQL store implementation.
//!
//! Balance mutations use single-statement conditioned `UPDATE ... RETURNING`
//! queries, so the database row update is the atomic check-and-mutate unit
//! and no two concurrent operations can act on a stale balance read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::catalog::CatalogItem;
use crate::models::transaction::{Transaction, TransactionStatus};
use crate::models::user::User;

use super::{CatalogStore, LedgerStore, UserStore};

/// Store backed by a PostgreSQL connection pool.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, phone, balance_cents, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn credit_balance(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let new_balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET balance_cents = balance_cents + $1,
                updated_at = $2
            WHERE id = $3
            RETURNING balance_cents
            "#,
        )
        .bind(amount_cents)
        .bind(now)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        new_balance.ok_or(AppError::UserNotFound)
    }

    async fn debit_balance(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        // The balance condition is part of the UPDATE itself: either the row
        // still covers the amount and is debited, or nothing happens.
        let new_balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET balance_cents = balance_cents - $1,
                updated_at = $2
            WHERE id = $3 AND balance_cents >= $1
            RETURNING balance_cents
            "#,
        )
        .bind(amount_cents)
        .bind(now)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match new_balance {
            Some(balance) => Ok(balance),
            None => {
                // Distinguish a missing user from an uncovered debit.
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                        .bind(user_id)
                        .fetch_one(&self.pool)
                        .await?;

                if exists {
                    Err(AppError::InsufficientBalance)
                } else {
                    Err(AppError::UserNotFound)
                }
            }
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn get_item(&self, item_id: Uuid) -> Result<Option<CatalogItem>, AppError> {
        let item = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT id, category_id, name, price_cents, active, created_at
            FROM catalog_items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }
}

/// Raw transaction row; enums travel as text columns.
#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    kind: String,
    amount_cents: i64,
    status: String,
    payment_method: String,
    gateway_reference: Option<String>,
    external_payment_reference: Option<String>,
    target_identifier: Option<String>,
    catalog_item_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind.parse()?,
            amount_cents: row.amount_cents,
            status: row.status.parse()?,
            payment_method: row.payment_method.parse()?,
            gateway_reference: row.gateway_reference,
            external_payment_reference: row.external_payment_reference,
            target_identifier: row.target_identifier,
            catalog_item_id: row.catalog_item_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const TRANSACTION_COLUMNS: &str = "id, user_id, kind, amount_cents, status, payment_method, \
     gateway_reference, external_payment_reference, target_identifier, catalog_item_id, \
     created_at, updated_at";

#[async_trait]
impl LedgerStore for PgStore {
    async fn insert(&self, transaction: &Transaction) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, user_id, kind, amount_cents, status, payment_method,
                gateway_reference, external_payment_reference,
                target_identifier, catalog_item_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.user_id)
        .bind(transaction.kind.to_string())
        .bind(transaction.amount_cents)
        .bind(transaction.status.to_string())
        .bind(transaction.payment_method.to_string())
        .bind(&transaction.gateway_reference)
        .bind(&transaction.external_payment_reference)
        .bind(&transaction.target_identifier)
        .bind(transaction.catalog_item_id)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn finalize(
        &self,
        transaction_id: Uuid,
        status: TransactionStatus,
        gateway_reference: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<Transaction, AppError> {
        // The status guard in the WHERE clause enforces pending-only
        // finalization at the storage level as well.
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            UPDATE transactions
            SET status = $2,
                gateway_reference = COALESCE($3, gateway_reference),
                updated_at = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(transaction_id)
        .bind(status.to_string())
        .bind(gateway_reference)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM transactions WHERE id = $1)")
                        .bind(transaction_id)
                        .fetch_one(&self.pool)
                        .await?;

                if exists {
                    Err(AppError::Storage(format!(
                        "cannot finalize transaction {transaction_id}: not pending"
                    )))
                } else {
                    Err(AppError::TransactionNotFound)
                }
            }
        }
    }

    async fn get(&self, transaction_id: Uuid) -> Result<Option<Transaction>, AppError> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, AppError> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }
}
