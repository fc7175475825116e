//! Passbook Core - bank account logic
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: The Account entity and the error taxonomy
//! - **ports**: Trait definitions for external dependencies (BalanceProvider)
//! - **services**: Serialized, shareable account handles
//! - **adapters**: Concrete providers (HTTP, demo, fixed)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use adapters::{DemoBalanceProvider, FixedBalanceProvider, HttpBalanceProvider};
use config::{Config, ProviderKind};
use ports::BalanceProvider;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::Account;
pub use services::BankAccount;

/// Main context for Passbook operations
///
/// Holds the configuration and the balance provider every account opened
/// through it synchronizes against.
pub struct PassbookContext {
    pub config: Config,
    pub provider: Arc<dyn BalanceProvider>,
}

impl PassbookContext {
    /// Create a context from the settings in `passbook_dir`
    pub fn new(passbook_dir: &Path) -> Result<Self> {
        let config = Config::load(passbook_dir)?;
        Self::from_config(config)
    }

    /// Create a context from an already loaded configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let provider = build_provider(&config)?;
        tracing::debug!(provider = provider.name(), "balance provider ready");
        Ok(Self { config, provider })
    }

    /// Create a context around a caller-supplied provider
    pub fn with_provider(config: Config, provider: Arc<dyn BalanceProvider>) -> Self {
        Self { config, provider }
    }

    /// Open an account with `initial_balance` using the configured provider
    pub fn open_account(&self, initial_balance: Decimal) -> domain::result::Result<BankAccount> {
        let account = Account::new(initial_balance)?.with_currency(&self.config.currency);
        let handle = BankAccount::from_account(account, Arc::clone(&self.provider));
        Ok(match self.config.fetch_timeout {
            Some(timeout) => handle.with_fetch_timeout(timeout),
            None => handle,
        })
    }
}

fn build_provider(config: &Config) -> Result<Arc<dyn BalanceProvider>> {
    let settings = &config.provider;
    let provider: Arc<dyn BalanceProvider> = match settings.kind {
        ProviderKind::Demo => match settings.seed {
            Some(seed) => Arc::new(DemoBalanceProvider::seeded(seed)),
            None => Arc::new(DemoBalanceProvider::new()),
        },
        ProviderKind::Fixed => match settings.fixed_balance {
            Some(balance) => Arc::new(FixedBalanceProvider::returning(balance)),
            None => Arc::new(FixedBalanceProvider::failing()),
        },
        ProviderKind::Http => {
            let base_url = settings
                .base_url
                .as_deref()
                .context("The http provider requires provider.baseUrl")?;
            Arc::new(HttpBalanceProvider::new(base_url)?)
        }
    };
    Ok(provider)
}
