//! Wallet Top-Up Service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create the database connection pool and run migrations
//! 3. Wire the processing services over the PostgreSQL store and the
//!    simulated gateways
//! 4. Build the HTTP router and start serving

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use wallet_topup_service::{
    AppState, config, db,
    gateway::simulated::{AutoApprovePaymentGateway, SimulatedProviderGateway},
    ids::{Clock, ReferenceGenerator, SystemClock, UuidReferences},
    router,
    services::{
        deposit_service::DepositService, topup_service::TopUpService,
        wallet_service::WalletService,
    },
    store::postgres::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment
    // variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Wire the processing core over the PostgreSQL store
    let store = Arc::new(PgStore::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let references: Arc<dyn ReferenceGenerator> = Arc::new(UuidReferences);

    let wallet = Arc::new(WalletService::new(store.clone(), clock.clone()));
    let deposits = Arc::new(DepositService::new(
        store.clone(),
        wallet.clone(),
        Arc::new(AutoApprovePaymentGateway),
        clock.clone(),
        references.clone(),
    ));
    let topups = Arc::new(TopUpService::new(
        store.clone(),
        store.clone(),
        wallet.clone(),
        Arc::new(SimulatedProviderGateway::new(config.provider_success_rate)),
        clock,
        references,
        Duration::from_millis(config.provider_timeout_ms),
    ));

    let state = AppState {
        wallet,
        deposits,
        topups,
        ledger: store,
    };

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    axum::serve(listener, router(state)).await?;

    Ok(())
}
