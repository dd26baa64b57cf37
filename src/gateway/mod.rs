//! External gateway collaborators.
//!
//! The transaction core never talks to a real provider or payment network;
//! it defines the contract those integrations must satisfy (an outcome plus
//! an external reference) and treats them as pluggable collaborators. The
//! provider call is the single point of external nondeterminism in the
//! system, so every implementation must be swappable for a deterministic
//! test double.

use async_trait::async_trait;
use uuid::Uuid;

/// Simulated and deterministic gateway implementations
pub mod simulated;

/// Result of asking the provider to fulfil a top-up.
#[derive(Debug, Clone)]
pub struct FulfilmentOutcome {
    /// Whether the provider delivered the top-up
    pub success: bool,

    /// Provider-side reference, recorded on the transaction regardless of
    /// outcome
    pub reference: String,
}

/// Result of charging an external payment method.
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    /// Whether the charge was approved
    pub success: bool,

    /// Payment-side reference for support diagnosis
    pub reference: String,
}

/// External system that fulfils top-up purchases.
///
/// Implementations may be slow or unreliable; the top-up processor bounds
/// the wait and treats a timeout as a failure.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    async fn fulfil(
        &self,
        transaction_id: Uuid,
        item_id: Uuid,
        target_identifier: &str,
    ) -> FulfilmentOutcome;
}

/// External payment method used to fund deposits.
#[async_trait]
pub trait PaymentMethodGateway: Send + Sync {
    async fn charge(&self, user_id: Uuid, amount_cents: i64) -> ChargeOutcome;
}
