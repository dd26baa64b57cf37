//! Injectable clock and reference-generation capabilities.
//!
//! Timestamps and externally-visible payment references are the two sources
//! of nondeterminism besides the provider gateway. Both are injected so
//! tests can assert exact values.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock that always reports the same instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Generator for external payment references attached to transactions that
/// are funded through an external method.
pub trait ReferenceGenerator: Send + Sync {
    fn payment_reference(&self) -> String;
}

/// Production generator backed by random UUIDs.
pub struct UuidReferences;

impl ReferenceGenerator for UuidReferences {
    fn payment_reference(&self) -> String {
        format!("pay_{}", Uuid::new_v4().simple())
    }
}

/// Deterministic generator producing `pay_1`, `pay_2`, ... in call order.
#[derive(Default)]
pub struct SequentialReferences {
    counter: AtomicU64,
}

impl SequentialReferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReferenceGenerator for SequentialReferences {
    fn payment_reference(&self) -> String {
        format!("pay_{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
