//! Top-up processor.
//!
//! Turns a purchase request into a ledger entry, invokes the provider
//! gateway, and reconciles the wallet balance with the outcome, driving the
//! entry through `pending -> completed | failed`.
//!
//! # Failure Semantics
//!
//! Validation failures (missing/inactive item, unknown user, uncovered
//! wallet balance) reject the request before any transaction row exists.
//! A provider decline or timeout is a business outcome: the call returns a
//! `failed` transaction. If the provider succeeds but the wallet debit loses
//! a concurrent race, the wallet is authoritative: the transaction is
//! finalized `failed` and the mismatch is logged for reconciliation.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::error::AppError;
use crate::gateway::{FulfilmentOutcome, ProviderGateway};
use crate::ids::{Clock, ReferenceGenerator};
use crate::models::transaction::{PaymentMethod, Transaction, TransactionStatus};
use crate::store::{CatalogStore, LedgerStore};

use super::wallet_service::WalletService;

/// Processes catalog item purchases.
pub struct TopUpService {
    catalog: Arc<dyn CatalogStore>,
    ledger: Arc<dyn LedgerStore>,
    wallet: Arc<WalletService>,
    provider: Arc<dyn ProviderGateway>,
    clock: Arc<dyn Clock>,
    references: Arc<dyn ReferenceGenerator>,
    provider_timeout: Duration,
}

impl TopUpService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        ledger: Arc<dyn LedgerStore>,
        wallet: Arc<WalletService>,
        provider: Arc<dyn ProviderGateway>,
        clock: Arc<dyn Clock>,
        references: Arc<dyn ReferenceGenerator>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            ledger,
            wallet,
            provider,
            clock,
            references,
            provider_timeout,
        }
    }

    /// Purchase a catalog item for delivery to `target_identifier`.
    ///
    /// # Process
    ///
    /// 1. Look up the item; it must exist and be active
    /// 2. Look up the user
    /// 3. For wallet payment, check the balance covers the price
    /// 4. Persist a `pending` top-up with the price snapshotted
    /// 5. Ask the provider to fulfil, bounded by the configured timeout
    /// 6. For wallet payment on provider success, debit the wallet;
    ///    a lost balance race finalizes the transaction `failed`
    /// 7. Finalize and return the transaction, recording the provider
    ///    reference whenever one was produced
    ///
    /// The item's `active` flag and price are evaluated once, at step 1; a
    /// concurrent deactivation or price change does not abort an in-flight
    /// purchase.
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` / `UserNotFound` / `InsufficientBalance`:
    ///   validation failures, no ledger row
    /// - `Database` / `Storage`: persistence failures, surfaced as-is
    pub async fn topup(
        &self,
        user_id: Uuid,
        catalog_item_id: Uuid,
        target_identifier: String,
        method: PaymentMethod,
    ) -> Result<Transaction, AppError> {
        // Fail-fast validation; nothing is persisted past this point unless
        // every check holds.
        let item = self
            .catalog
            .get_item(catalog_item_id)
            .await?
            .filter(|item| item.active)
            .ok_or(AppError::ItemNotFound)?;

        let balance = self.wallet.balance_of(user_id).await?;
        if method == PaymentMethod::Wallet && balance < item.price_cents {
            return Err(AppError::InsufficientBalance);
        }

        let external_reference = match method {
            PaymentMethod::ExternalGateway => Some(self.references.payment_reference()),
            PaymentMethod::Wallet => None,
        };
        let transaction = Transaction::topup(
            user_id,
            item.price_cents,
            method,
            catalog_item_id,
            target_identifier.clone(),
            external_reference,
            self.clock.now(),
        );
        self.ledger.insert(&transaction).await?;

        let outcome = self
            .fulfil_with_timeout(transaction.id, catalog_item_id, &target_identifier)
            .await;

        let status = match &outcome {
            Some(outcome) if outcome.success => {
                self.settle(&transaction, method, outcome).await?
            }
            Some(outcome) => {
                tracing::info!(
                    transaction_id = %transaction.id,
                    gateway_reference = %outcome.reference,
                    "provider declined top-up"
                );
                TransactionStatus::Failed
            }
            None => TransactionStatus::Failed,
        };

        self.ledger
            .finalize(
                transaction.id,
                status,
                outcome.map(|o| o.reference),
                self.clock.now(),
            )
            .await
    }

    /// Invoke the provider, treating a timeout as a failure with no
    /// reference. The transaction is never left `pending` because of a slow
    /// provider.
    async fn fulfil_with_timeout(
        &self,
        transaction_id: Uuid,
        item_id: Uuid,
        target_identifier: &str,
    ) -> Option<FulfilmentOutcome> {
        match tokio::time::timeout(
            self.provider_timeout,
            self.provider.fulfil(transaction_id, item_id, target_identifier),
        )
        .await
        {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                tracing::warn!(
                    %transaction_id,
                    timeout_ms = self.provider_timeout.as_millis() as u64,
                    "provider gateway timed out"
                );
                None
            }
        }
    }

    /// Charge the wallet for a fulfilled top-up.
    ///
    /// The balance may have changed since the pre-check; the debit is the
    /// authoritative decision. A lost race means the provider already
    /// recorded success on its side, so the mismatch is logged as a
    /// reconciliation anomaly.
    async fn settle(
        &self,
        transaction: &Transaction,
        method: PaymentMethod,
        outcome: &FulfilmentOutcome,
    ) -> Result<TransactionStatus, AppError> {
        if method != PaymentMethod::Wallet {
            return Ok(TransactionStatus::Completed);
        }

        match self
            .wallet
            .debit(transaction.user_id, transaction.amount_cents)
            .await
        {
            Ok(_) => Ok(TransactionStatus::Completed),
            Err(AppError::InsufficientBalance) => {
                tracing::warn!(
                    transaction_id = %transaction.id,
                    user_id = %transaction.user_id,
                    gateway_reference = %outcome.reference,
                    "provider fulfilled but wallet debit failed; flagging for reconciliation"
                );
                Ok(TransactionStatus::Failed)
            }
            Err(e) => Err(e),
        }
    }
}
