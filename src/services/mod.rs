//! Business logic services.
//!
//! Services contain the transaction processing core separated from HTTP
//! handlers: balance management, deposit processing, and top-up processing.

pub mod deposit_service;
pub mod topup_service;
pub mod wallet_service;
