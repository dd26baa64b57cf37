//! Transaction ledger entity and API request/response types.
//!
//! This module defines:
//! - `Transaction`: the ledger entry driven from `pending` to a terminal state
//! - The closed `TransactionKind` / `TransactionStatus` / `PaymentMethod` enums
//! - Request types for deposit and top-up operations
//! - `TransactionResponse`: response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// Kind of ledger entry.
///
/// `Withdrawal` exists as a ledger kind for manual/administrative bookings;
/// no processor produces it automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    #[serde(rename = "topup")]
    TopUp,
    Withdrawal,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::TopUp => write!(f, "topup"),
            TransactionKind::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "topup" => Ok(TransactionKind::TopUp),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            _ => Err(AppError::Storage(format!("unknown transaction kind: {s}"))),
        }
    }
}

/// Lifecycle state of a transaction.
///
/// The only legal transitions are `Pending -> Completed`,
/// `Pending -> Failed` and `Pending -> Cancelled`; everything else is
/// rejected. `Cancelled` is reserved for manual/administrative action and is
/// never produced by the processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    /// Whether this status ends the transaction lifecycle.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        matches!(self, TransactionStatus::Pending) && next.is_terminal()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
            TransactionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            _ => Err(AppError::Storage(format!(
                "unknown transaction status: {s}"
            ))),
        }
    }
}

/// How a transaction is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// The user's internal prepaid balance
    Wallet,
    /// An external payment method (card, bank, ...)
    ExternalGateway,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Wallet => write!(f, "wallet"),
            PaymentMethod::ExternalGateway => write!(f, "external_gateway"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wallet" => Ok(PaymentMethod::Wallet),
            "external_gateway" => Ok(PaymentMethod::ExternalGateway),
            _ => Err(AppError::Storage(format!("unknown payment method: {s}"))),
        }
    }
}

/// A ledger entry.
///
/// Each transaction is created `pending` by exactly one processor invocation
/// and finalized to a terminal status inside the same logical operation.
/// The amount is always positive; for top-ups it is the catalog item's price
/// snapshotted at creation time.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    /// Unique identifier for this transaction
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Deposit, top-up, or withdrawal
    pub kind: TransactionKind,

    /// Amount in cents; always positive
    pub amount_cents: i64,

    /// Current lifecycle state
    pub status: TransactionStatus,

    /// How the transaction is funded
    pub payment_method: PaymentMethod,

    /// Reference reported by the provider gateway, success or failure.
    /// Kept for support diagnosis of failed transactions.
    pub gateway_reference: Option<String>,

    /// Reference generated by this service for the external payment method
    pub external_payment_reference: Option<String>,

    /// Delivery target for top-ups (e.g. a phone number)
    pub target_identifier: Option<String>,

    /// Purchased catalog item (top-ups only)
    pub catalog_item_id: Option<Uuid>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction last changed state
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a pending deposit entry.
    pub fn deposit(
        user_id: Uuid,
        amount_cents: i64,
        payment_method: PaymentMethod,
        external_payment_reference: String,
        now: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            user_id,
            kind: TransactionKind::Deposit,
            amount_cents,
            status: TransactionStatus::Pending,
            payment_method,
            gateway_reference: None,
            external_payment_reference: Some(external_payment_reference),
            target_identifier: None,
            catalog_item_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a pending top-up entry with the item price snapshotted into
    /// `amount_cents`.
    pub fn topup(
        user_id: Uuid,
        amount_cents: i64,
        payment_method: PaymentMethod,
        catalog_item_id: Uuid,
        target_identifier: String,
        external_payment_reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            user_id,
            kind: TransactionKind::TopUp,
            amount_cents,
            status: TransactionStatus::Pending,
            payment_method,
            gateway_reference: None,
            external_payment_reference,
            target_identifier: Some(target_identifier),
            catalog_item_id: Some(catalog_item_id),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to deposit funds into a wallet.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": "550e8400-e29b-41d4-a716-446655440000",
///   "amount_cents": 100000
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// User whose wallet receives the funds
    pub user_id: Uuid,

    /// Amount to add in cents; must be positive
    pub amount_cents: i64,

    /// Funding method; deposits always come from an external method
    #[serde(default = "default_deposit_method")]
    pub payment_method: PaymentMethod,
}

fn default_deposit_method() -> PaymentMethod {
    PaymentMethod::ExternalGateway
}

/// Request to purchase a catalog item.
///
/// # JSON Example
///
/// ```json
/// {
///   "user_id": "550e8400-e29b-41d4-a716-446655440000",
///   "catalog_item_id": "660e8400-e29b-41d4-a716-446655440001",
///   "target_identifier": "+15550001234",
///   "payment_method": "wallet"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct TopUpRequest {
    /// Purchasing user
    pub user_id: Uuid,

    /// Item to purchase; must be active
    pub catalog_item_id: Uuid,

    /// Where the provider should deliver the top-up (e.g. phone number)
    pub target_identifier: String,

    /// `wallet` or `external_gateway`
    pub payment_method: PaymentMethod,
}

/// Query parameters for the transaction history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Page size; defaults to 50, capped at 100
    pub limit: Option<i64>,

    /// Number of records to skip; defaults to 0
    pub offset: Option<i64>,
}

/// Response returned for transaction operations.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "user_id": "550e8400-e29b-41d4-a716-446655440000",
///   "kind": "topup",
///   "amount_cents": 10000,
///   "status": "completed",
///   "payment_method": "wallet",
///   "gateway_reference": "prv_c0ffee",
///   "target_identifier": "+15550001234",
///   "created_at": "2026-08-06T12:00:00Z",
///   "updated_at": "2026-08-06T12:00:01Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
    pub gateway_reference: Option<String>,
    pub external_payment_reference: Option<String>,
    pub target_identifier: Option<String>,
    pub catalog_item_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            user_id: transaction.user_id,
            kind: transaction.kind,
            amount_cents: transaction.amount_cents,
            status: transaction.status,
            payment_method: transaction.payment_method,
            gateway_reference: transaction.gateway_reference,
            external_payment_reference: transaction.external_payment_reference,
            target_identifier: transaction.target_identifier,
            catalog_item_id: transaction.catalog_item_id,
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}
