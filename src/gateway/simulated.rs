//! Gateway implementations: probability-based simulators for the reference
//! deployment and fixed-outcome doubles for deterministic testing.

use async_trait::async_trait;
use uuid::Uuid;

use super::{ChargeOutcome, FulfilmentOutcome, PaymentMethodGateway, ProviderGateway};

/// Provider simulator that succeeds with a configured probability.
///
/// The default deployment runs this at 0.9. The probability is a
/// configuration detail of this implementation, not part of the provider
/// contract.
pub struct SimulatedProviderGateway {
    success_rate: f64,
}

impl SimulatedProviderGateway {
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl ProviderGateway for SimulatedProviderGateway {
    async fn fulfil(
        &self,
        transaction_id: Uuid,
        item_id: Uuid,
        target_identifier: &str,
    ) -> FulfilmentOutcome {
        let roll: f64 = rand::random();
        let success = roll < self.success_rate;
        let reference = format!("prv_{}", Uuid::new_v4().simple());

        tracing::debug!(
            %transaction_id,
            %item_id,
            target_identifier,
            success,
            %reference,
            "simulated provider fulfilment"
        );

        FulfilmentOutcome { success, reference }
    }
}

/// Deterministic provider double returning a fixed outcome on every call.
pub struct FixedProviderGateway {
    succeed: bool,
    reference: String,
}

impl FixedProviderGateway {
    /// Double that always fulfils.
    pub fn success() -> Self {
        Self {
            succeed: true,
            reference: "prv_fixed_ok".to_string(),
        }
    }

    /// Double that always declines.
    pub fn failure() -> Self {
        Self {
            succeed: false,
            reference: "prv_fixed_err".to_string(),
        }
    }
}

#[async_trait]
impl ProviderGateway for FixedProviderGateway {
    async fn fulfil(&self, _transaction_id: Uuid, _item_id: Uuid, _target: &str) -> FulfilmentOutcome {
        FulfilmentOutcome {
            success: self.succeed,
            reference: self.reference.clone(),
        }
    }
}

/// Payment method that approves every charge, mirroring the reference
/// deployment where the external payment step always reports success.
pub struct AutoApprovePaymentGateway;

#[async_trait]
impl PaymentMethodGateway for AutoApprovePaymentGateway {
    async fn charge(&self, user_id: Uuid, amount_cents: i64) -> ChargeOutcome {
        let reference = format!("chg_{}", Uuid::new_v4().simple());
        tracing::debug!(%user_id, amount_cents, %reference, "auto-approved charge");
        ChargeOutcome {
            success: true,
            reference,
        }
    }
}

/// Deterministic payment double with a fixed approve/decline answer.
pub struct FixedPaymentGateway {
    approve: bool,
}

impl FixedPaymentGateway {
    pub fn approving() -> Self {
        Self { approve: true }
    }

    pub fn declining() -> Self {
        Self { approve: false }
    }
}

#[async_trait]
impl PaymentMethodGateway for FixedPaymentGateway {
    async fn charge(&self, _user_id: Uuid, _amount_cents: i64) -> ChargeOutcome {
        ChargeOutcome {
            success: self.approve,
            reference: "chg_fixed".to_string(),
        }
    }
}
