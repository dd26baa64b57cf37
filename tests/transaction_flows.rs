//! Service-level integration tests for the transaction processing core:
//! ledger reconciliation, concurrency guarantees, and history paging.

mod support;

use std::sync::Arc;

use wallet_topup_service::{
    error::AppError,
    gateway::simulated::FixedProviderGateway,
    models::transaction::{PaymentMethod, TransactionKind, TransactionStatus},
    store::LedgerStore,
};

use support::test_app;

#[tokio::test]
async fn ledger_exactly_reconciles_the_balance() {
    // Start empty, deposit 100_000, then buy three 10_000 top-ups.
    let app = test_app(0, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let deposit = app
        .state
        .deposits
        .deposit(app.user_id, 100_000, PaymentMethod::ExternalGateway)
        .await
        .unwrap();
    assert_eq!(deposit.status, TransactionStatus::Completed);

    for _ in 0..3 {
        let tx = app
            .state
            .topups
            .topup(
                app.user_id,
                app.item_id,
                "+15550001234".to_string(),
                PaymentMethod::Wallet,
            )
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    let final_balance = app.wallet.balance_of(app.user_id).await.unwrap();
    assert_eq!(final_balance, 70_000);

    // initial - final + completed deposits == completed wallet top-ups
    let history = app.store.list_for_user(app.user_id, 100, 0).await.unwrap();
    let completed_deposits: i64 = history
        .iter()
        .filter(|t| t.kind == TransactionKind::Deposit && t.status == TransactionStatus::Completed)
        .map(|t| t.amount_cents)
        .sum();
    let completed_topups: i64 = history
        .iter()
        .filter(|t| {
            t.kind == TransactionKind::TopUp
                && t.status == TransactionStatus::Completed
                && t.payment_method == PaymentMethod::Wallet
        })
        .map(|t| t.amount_cents)
        .sum();

    assert_eq!(completed_topups, 0 - final_balance + completed_deposits);
    assert_eq!(completed_topups, 30_000);
}

#[tokio::test]
async fn concurrent_topups_for_one_user_never_overspend() {
    // Balance 25_000 and price 10_000: of 10 concurrent wallet purchases,
    // exactly 2 can complete no matter how the calls interleave.
    let app = test_app(25_000, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let topups = app.state.topups.clone();
        let user_id = app.user_id;
        let item_id = app.item_id;
        handles.push(tokio::spawn(async move {
            topups
                .topup(
                    user_id,
                    item_id,
                    "+15550001234".to_string(),
                    PaymentMethod::Wallet,
                )
                .await
        }));
    }

    let mut completed = 0;
    let mut rejected = 0;
    let mut failed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(tx) if tx.status == TransactionStatus::Completed => completed += 1,
            // Lost the balance race after passing the pre-check: finalized
            // failed rather than rejected.
            Ok(tx) => {
                assert_eq!(tx.status, TransactionStatus::Failed);
                failed += 1;
            }
            Err(AppError::InsufficientBalance) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(completed, 2);
    assert_eq!(completed + rejected + failed, 10);

    let final_balance = app.wallet.balance_of(app.user_id).await.unwrap();
    assert_eq!(final_balance, 5_000);
    assert!(final_balance >= 0);

    // The ledger agrees with the outcome counts.
    let history = app.store.list_for_user(app.user_id, 100, 0).await.unwrap();
    let ledger_completed = history
        .iter()
        .filter(|t| t.status == TransactionStatus::Completed)
        .count();
    assert_eq!(ledger_completed, 2);
    // No row is ever left pending.
    assert!(history.iter().all(|t| t.status.is_terminal()));
}

#[tokio::test]
async fn completed_and_failed_purchases_share_one_wallet_truth() {
    // Forced failure: the ledger records the attempt, the wallet is
    // untouched, and a rerun against a succeeding provider still works.
    let app = test_app(20_000, 10_000, Arc::new(FixedProviderGateway::failure())).await;

    let tx = app
        .state
        .topups
        .topup(
            app.user_id,
            app.item_id,
            "+15550001234".to_string(),
            PaymentMethod::Wallet,
        )
        .await
        .unwrap();
    assert_eq!(tx.status, TransactionStatus::Failed);
    assert_eq!(app.wallet.balance_of(app.user_id).await.unwrap(), 20_000);

    let history = app.store.list_for_user(app.user_id, 10, 0).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TransactionStatus::Failed);
    assert_eq!(history[0].gateway_reference.as_deref(), Some("prv_fixed_err"));
}

#[tokio::test]
async fn history_is_newest_first_and_restartable() {
    let app = test_app(0, 10_000, Arc::new(FixedProviderGateway::success())).await;

    let mut ids = Vec::new();
    for amount in [1_000, 2_000, 3_000, 4_000, 5_000] {
        let tx = app
            .state
            .deposits
            .deposit(app.user_id, amount, PaymentMethod::ExternalGateway)
            .await
            .unwrap();
        ids.push(tx.id);
    }

    // Newest first...
    let first_page = app.store.list_for_user(app.user_id, 2, 0).await.unwrap();
    assert_eq!(
        first_page.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![ids[4], ids[3]]
    );

    // ...and restartable via offset.
    let second_page = app.store.list_for_user(app.user_id, 2, 2).await.unwrap();
    assert_eq!(
        second_page.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![ids[2], ids[1]]
    );

    let tail = app.store.list_for_user(app.user_id, 10, 4).await.unwrap();
    assert_eq!(tail.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ids[0]]);
}
