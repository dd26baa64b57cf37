//! Deposit processor.
//!
//! Turns a deposit request into a ledger entry and a balance increase,
//! driving the entry through `pending -> completed | failed`.
//!
//! # Failure Semantics
//!
//! Validation failures (unknown user, non-positive amount) reject the
//! request before any transaction row exists. A declined charge is a
//! business outcome, not an error: the call returns a `failed` transaction
//! and the balance is untouched.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::gateway::PaymentMethodGateway;
use crate::ids::{Clock, ReferenceGenerator};
use crate::models::transaction::{PaymentMethod, Transaction, TransactionStatus};
use crate::store::LedgerStore;

use super::wallet_service::WalletService;

/// Processes wallet deposits.
pub struct DepositService {
    ledger: Arc<dyn LedgerStore>,
    wallet: Arc<WalletService>,
    payments: Arc<dyn PaymentMethodGateway>,
    clock: Arc<dyn Clock>,
    references: Arc<dyn ReferenceGenerator>,
}

impl DepositService {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        wallet: Arc<WalletService>,
        payments: Arc<dyn PaymentMethodGateway>,
        clock: Arc<dyn Clock>,
        references: Arc<dyn ReferenceGenerator>,
    ) -> Self {
        Self {
            ledger,
            wallet,
            payments,
            clock,
            references,
        }
    }

    /// Deposit `amount_cents` into a user's wallet.
    ///
    /// # Process
    ///
    /// 1. Validate the user exists (no row is created otherwise)
    /// 2. Validate the amount is positive
    /// 3. Persist a `pending` deposit with a generated payment reference
    /// 4. Charge the external payment method
    /// 5. On approval credit the wallet and finalize `completed`;
    ///    on decline finalize `failed` with no balance mutation
    ///
    /// # Errors
    ///
    /// - `UserNotFound` / `InvalidAmount`: validation failures, no ledger row
    /// - `Database` / `Storage`: persistence failures, surfaced as-is
    pub async fn deposit(
        &self,
        user_id: Uuid,
        amount_cents: i64,
        method: PaymentMethod,
    ) -> Result<Transaction, AppError> {
        // Fail-fast validation; nothing is persisted past this point unless
        // both checks hold.
        self.wallet.balance_of(user_id).await?;
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let transaction = Transaction::deposit(
            user_id,
            amount_cents,
            method,
            self.references.payment_reference(),
            self.clock.now(),
        );
        self.ledger.insert(&transaction).await?;

        let outcome = self.payments.charge(user_id, amount_cents).await;

        let status = if outcome.success {
            self.wallet.credit(user_id, amount_cents).await?;
            TransactionStatus::Completed
        } else {
            tracing::info!(
                transaction_id = %transaction.id,
                %user_id,
                reference = %outcome.reference,
                "payment method declined deposit"
            );
            TransactionStatus::Failed
        };

        self.ledger
            .finalize(
                transaction.id,
                status,
                Some(outcome.reference),
                self.clock.now(),
            )
            .await
    }
}
