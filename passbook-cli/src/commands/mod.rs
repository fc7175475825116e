//! CLI command implementations

pub mod config;
pub mod deposit;
pub mod fetch;
pub mod sync;
pub mod transfer;
pub mod withdraw;

use std::path::PathBuf;

use anyhow::{Context, Result};
use passbook_core::{BankAccount, PassbookContext};
use rust_decimal::Decimal;
use serde::Serialize;

/// Get the passbook directory from environment or default
pub fn get_passbook_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PASSBOOK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".passbook"))
}

/// Build the passbook context from the settings directory
pub fn get_context() -> Result<PassbookContext> {
    let passbook_dir = get_passbook_dir()?;
    PassbookContext::new(&passbook_dir).context("Failed to initialize passbook context")
}

/// Balance of one account after a command
#[derive(Debug, Serialize)]
pub struct AccountReport {
    pub account_id: String,
    pub balance: Decimal,
    pub currency: String,
}

impl AccountReport {
    pub async fn of(account: &BankAccount) -> Self {
        let snapshot = account.snapshot().await;
        Self {
            account_id: snapshot.id.to_string(),
            balance: snapshot.balance(),
            currency: snapshot.currency,
        }
    }
}
