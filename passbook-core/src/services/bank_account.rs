//! Bank account service - serialized access to a single account
//!
//! `BankAccount` is a cheap, cloneable handle. All operations on one account
//! go through its lock, so a transfer or withdrawal can never interleave with
//! a balance synchronization that is waiting on the provider.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::BalanceProvider;

/// Handle to a bank account backed by a balance provider
#[derive(Clone)]
pub struct BankAccount {
    id: Uuid,
    state: Arc<Mutex<Account>>,
    provider: Arc<dyn BalanceProvider>,
    fetch_timeout: Option<Duration>,
}

impl std::fmt::Debug for BankAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankAccount")
            .field("id", &self.id)
            .field("provider", &self.provider.name())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl BankAccount {
    /// Open an account with `initial_balance`
    pub fn open(initial_balance: Decimal, provider: Arc<dyn BalanceProvider>) -> Result<Self> {
        Ok(Self::from_account(Account::new(initial_balance)?, provider))
    }

    /// Wrap an existing account
    pub fn from_account(account: Account, provider: Arc<dyn BalanceProvider>) -> Self {
        Self {
            id: account.id,
            state: Arc::new(Mutex::new(account)),
            provider,
            fetch_timeout: None,
        }
    }

    /// Give up on provider lookups that take longer than `timeout`
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the provider used for synchronization
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Current balance
    pub async fn get_balance(&self) -> Decimal {
        self.state.lock().await.balance()
    }

    /// Copy of the current account state
    pub async fn snapshot(&self) -> Account {
        self.state.lock().await.clone()
    }

    /// Deposit `amount`, returning the new balance
    pub async fn deposit(&self, amount: Decimal) -> Result<Decimal> {
        let mut account = self.state.lock().await;
        account.deposit(amount)?;
        tracing::debug!(account_id = %self.id, %amount, balance = %account.balance(), "deposit applied");
        Ok(account.balance())
    }

    /// Withdraw `amount`, returning the new balance
    pub async fn withdraw(&self, amount: Decimal) -> Result<Decimal> {
        let mut account = self.state.lock().await;
        account.withdraw(amount)?;
        tracing::debug!(account_id = %self.id, %amount, balance = %account.balance(), "withdrawal applied");
        Ok(account.balance())
    }

    /// Move `amount` from this account into `destination`
    ///
    /// Both accounts are locked for the whole operation, always in ascending
    /// id order, so opposing transfers between the same pair cannot deadlock.
    pub async fn transfer(&self, amount: Decimal, destination: &BankAccount) -> Result<()> {
        if Arc::ptr_eq(&self.state, &destination.state) || self.id == destination.id {
            return Err(Error::transfer_failed(format!(
                "cannot transfer from account {} to itself",
                self.id
            )));
        }

        let (mut source, mut target) = if self.id < destination.id {
            let source = self.state.lock().await;
            let target = destination.state.lock().await;
            (source, target)
        } else {
            let target = destination.state.lock().await;
            let source = self.state.lock().await;
            (source, target)
        };

        source.transfer(amount, &mut target)?;
        tracing::debug!(
            from = %self.id,
            to = %destination.id,
            %amount,
            "transfer applied"
        );
        Ok(())
    }

    /// Ask the provider for the authoritative balance
    ///
    /// Does not touch local state. A timed-out lookup counts as failed.
    pub async fn fetch_balance(&self) -> Option<Decimal> {
        let lookup = self.provider.fetch_balance(self.id);
        match self.fetch_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, lookup).await {
                Ok(balance) => balance,
                Err(_) => {
                    tracing::warn!(account_id = %self.id, ?timeout, "balance lookup timed out");
                    None
                }
            },
            None => lookup.await,
        }
    }

    /// Replace the local balance with the provider's value
    ///
    /// The account stays locked while the provider is consulted. Returns the
    /// new balance; a failed lookup leaves the balance untouched. Not retried.
    pub async fn synchronize_balance(&self) -> Result<Decimal> {
        let mut account = self.state.lock().await;

        let Some(balance) = self.fetch_balance().await else {
            tracing::warn!(
                account_id = %self.id,
                provider = self.provider.name(),
                "synchronization failed: no balance returned"
            );
            return Err(Error::synchronization_failed(format!(
                "provider '{}' returned no balance for account {}",
                self.provider.name(),
                self.id
            )));
        };

        account.apply_synchronized(balance)?;
        tracing::info!(account_id = %self.id, %balance, "balance synchronized");
        Ok(balance)
    }
}
