//! Shared test harness: an application wired over the in-memory store with
//! deterministic collaborators.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use wallet_topup_service::{
    AppState,
    gateway::ProviderGateway,
    gateway::simulated::FixedPaymentGateway,
    ids::{Clock, FixedClock, ReferenceGenerator, SequentialReferences},
    models::{catalog::CatalogItem, user::User},
    services::{
        deposit_service::DepositService, topup_service::TopUpService,
        wallet_service::WalletService,
    },
    store::memory::MemoryStore,
};

pub const PROVIDER_TIMEOUT: Duration = Duration::from_millis(200);

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub wallet: Arc<WalletService>,
    pub user_id: Uuid,
    pub item_id: Uuid,
}

/// Build an application over the in-memory store with one seeded user and
/// one active catalog item. The payment method always approves; the
/// provider behavior is injected per test.
pub async fn test_app(
    balance_cents: i64,
    price_cents: i64,
    provider: Arc<dyn ProviderGateway>,
) -> TestApp {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let store = Arc::new(MemoryStore::new());

    let user_id = Uuid::new_v4();
    store
        .put_user(User {
            id: user_id,
            full_name: "Integration User".to_string(),
            email: "integration@example.com".to_string(),
            phone: Some("+15550001234".to_string()),
            balance_cents,
            created_at: now,
            updated_at: now,
        })
        .await;

    let item_id = Uuid::new_v4();
    store
        .put_item(CatalogItem {
            id: item_id,
            category_id: Uuid::new_v4(),
            name: "Mobile credit".to_string(),
            price_cents,
            active: true,
            created_at: now,
        })
        .await;

    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
    let references: Arc<dyn ReferenceGenerator> = Arc::new(SequentialReferences::new());

    let wallet = Arc::new(WalletService::new(store.clone(), clock.clone()));
    let deposits = Arc::new(DepositService::new(
        store.clone(),
        wallet.clone(),
        Arc::new(FixedPaymentGateway::approving()),
        clock.clone(),
        references.clone(),
    ));
    let topups = Arc::new(TopUpService::new(
        store.clone(),
        store.clone(),
        wallet.clone(),
        provider,
        clock,
        references,
        PROVIDER_TIMEOUT,
    ));

    let state = AppState {
        wallet: wallet.clone(),
        deposits,
        topups,
        ledger: store.clone(),
    };

    TestApp {
        state,
        store,
        wallet,
        user_id,
        item_id,
    }
}
