//! Bank account behavior tests
//!
//! Run with: cargo test --test bank_account_tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::Notify;
use uuid::Uuid;

use passbook_core::adapters::FixedBalanceProvider;
use passbook_core::config::{Config, ProviderKind};
use passbook_core::ports::BalanceProvider;
use passbook_core::{BankAccount, Error, PassbookContext};

const INITIAL_BALANCE: i64 = 100;

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

fn open(balance: i64, provider: Arc<dyn BalanceProvider>) -> BankAccount {
    BankAccount::open(dec(balance), provider).unwrap()
}

fn no_provider() -> Arc<dyn BalanceProvider> {
    Arc::new(FixedBalanceProvider::failing())
}

/// Provider that blocks until released, to hold a synchronization mid-flight
struct GatedProvider {
    started: Notify,
    release: Notify,
    balance: Decimal,
}

impl GatedProvider {
    fn new(balance: Decimal) -> Self {
        Self {
            started: Notify::new(),
            release: Notify::new(),
            balance,
        }
    }
}

#[async_trait]
impl BalanceProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    async fn fetch_balance(&self, _account_id: Uuid) -> Option<Decimal> {
        self.started.notify_one();
        self.release.notified().await;
        Some(self.balance)
    }
}

/// Provider that never answers in time
struct SlowProvider;

#[async_trait]
impl BalanceProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn fetch_balance(&self, _account_id: Uuid) -> Option<Decimal> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Some(Decimal::from(1))
    }
}

#[tokio::test]
async fn test_withdraw_more_than_balance_keeps_balance() {
    let account = open(INITIAL_BALANCE, no_provider());

    let err = account.withdraw(dec(200)).await.unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds { .. }));
    assert_eq!(account.get_balance().await, dec(100));
}

#[tokio::test]
async fn test_transfer_scenario() {
    let account1 = open(100, no_provider());
    let account2 = open(50, no_provider());

    account1.transfer(dec(50), &account2).await.unwrap();
    assert_eq!(account1.get_balance().await, dec(50));
    assert_eq!(account2.get_balance().await, dec(100));
}

#[tokio::test]
async fn test_transfer_to_self_fails_even_with_funds() {
    let account = open(INITIAL_BALANCE, no_provider());

    for amount in [1, 50, 100, 500] {
        let err = account.transfer(dec(amount), &account).await.unwrap_err();
        assert!(matches!(err, Error::TransferFailed(_)));
    }
    assert_eq!(account.get_balance().await, dec(INITIAL_BALANCE));
}

#[tokio::test]
async fn test_synchronize_scenario() {
    let provider = Arc::new(FixedBalanceProvider::returning(dec(80)));
    let account = open(INITIAL_BALANCE, provider.clone());

    account.synchronize_balance().await.unwrap();
    assert_eq!(provider.calls(), 1);
    assert_eq!(account.get_balance().await, dec(80));
}

#[tokio::test]
async fn test_synchronize_with_missing_balance() {
    let provider = Arc::new(FixedBalanceProvider::failing());
    let account = open(INITIAL_BALANCE, provider.clone());

    let err = account.synchronize_balance().await.unwrap_err();
    assert!(matches!(err, Error::SynchronizationFailed(_)));
    assert_eq!(provider.calls(), 1);
    assert_eq!(account.get_balance().await, dec(INITIAL_BALANCE));
}

#[tokio::test]
async fn test_withdraw_waits_for_pending_synchronization() {
    let provider = Arc::new(GatedProvider::new(dec(80)));
    let account = open(INITIAL_BALANCE, provider.clone());

    let syncing = tokio::spawn({
        let account = account.clone();
        async move { account.synchronize_balance().await }
    });
    provider.started.notified().await;

    let withdrawing = tokio::spawn({
        let account = account.clone();
        async move { account.withdraw(dec(30)).await }
    });
    tokio::task::yield_now().await;
    assert!(!withdrawing.is_finished());

    provider.release.notify_one();
    assert_eq!(syncing.await.unwrap().unwrap(), dec(80));
    assert_eq!(withdrawing.await.unwrap().unwrap(), dec(50));
    assert_eq!(account.get_balance().await, dec(50));
}

#[tokio::test(start_paused = true)]
async fn test_synchronize_times_out() {
    let account = open(INITIAL_BALANCE, Arc::new(SlowProvider))
        .with_fetch_timeout(Duration::from_secs(5));

    assert_eq!(account.fetch_balance().await, None);

    let err = account.synchronize_balance().await.unwrap_err();
    assert!(matches!(err, Error::SynchronizationFailed(_)));
    assert_eq!(account.get_balance().await, dec(INITIAL_BALANCE));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_opposing_transfers_do_not_deadlock() {
    let a = open(1_000, no_provider());
    let b = open(1_000, no_provider());

    let mut handles = Vec::new();
    for i in 0..200 {
        let (from, to) = if i % 2 == 0 {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        handles.push(tokio::spawn(async move { from.transfer(dec(3), &to).await }));
    }

    let all = async {
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(10), all)
        .await
        .expect("transfers deadlocked");

    assert_eq!(a.get_balance().await + b.get_balance().await, dec(2_000));
    assert_eq!(a.get_balance().await, dec(1_000));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_withdrawals_never_overdraw() {
    let account = open(INITIAL_BALANCE, no_provider());

    let mut handles = Vec::new();
    for _ in 0..50 {
        let account = account.clone();
        handles.push(tokio::spawn(async move { account.withdraw(dec(7)).await }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(Error::InsufficientFunds { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    // 14 * 7 = 98, the 15th would overdraw
    assert_eq!(succeeded, 14);
    assert_eq!(account.get_balance().await, dec(2));
}

#[tokio::test]
async fn test_context_opens_accounts_on_configured_provider() {
    let mut config = Config::default();
    config.provider.kind = ProviderKind::Fixed;
    config.provider.fixed_balance = Some(dec(42));
    config.currency = "EUR".to_string();

    let ctx = PassbookContext::from_config(config).unwrap();
    let account = ctx.open_account(dec(10)).unwrap();
    assert_eq!(account.provider_name(), "fixed");
    assert_eq!(account.snapshot().await.currency, "EUR");

    assert_eq!(account.synchronize_balance().await.unwrap(), dec(42));
    assert_eq!(account.get_balance().await, dec(42));
}

#[tokio::test]
async fn test_context_rejects_negative_initial_balance() {
    let ctx = PassbookContext::with_provider(Config::default(), no_provider());
    let err = ctx.open_account(dec(-5)).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
