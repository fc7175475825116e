//! Account domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// A bank account holding a single non-negative balance
///
/// All mutations check first and write second, so a failed call never
/// leaves a partially applied change behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AccountRecord")]
pub struct Account {
    pub id: Uuid,
    balance: Decimal,
    /// ISO 4217 currency code, normalized to uppercase
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When the balance was last overwritten from a provider
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// Serialized form of an account, validated before it becomes an `Account`
#[derive(Deserialize)]
struct AccountRecord {
    id: Uuid,
    balance: Decimal,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    last_synced_at: Option<DateTime<Utc>>,
}

impl TryFrom<AccountRecord> for Account {
    type Error = Error;

    fn try_from(record: AccountRecord) -> Result<Self> {
        let mut account = Account::with_id(record.id, record.balance)?.with_currency(&record.currency);
        account.created_at = record.created_at;
        account.updated_at = record.updated_at;
        account.last_synced_at = record.last_synced_at;
        Ok(account)
    }
}

impl Account {
    /// Create a new account with a random id
    pub fn new(initial_balance: Decimal) -> Result<Self> {
        Self::with_id(Uuid::new_v4(), initial_balance)
    }

    /// Create a new account with a known id
    pub fn with_id(id: Uuid, initial_balance: Decimal) -> Result<Self> {
        if initial_balance < Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "initial balance cannot be negative: {}",
                initial_balance
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            balance: initial_balance,
            currency: "USD".to_string(),
            created_at: now,
            updated_at: now,
            last_synced_at: None,
        })
    }

    /// Set the account currency
    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = Self::normalize_currency(currency);
        self
    }

    /// Normalize currency code to uppercase
    pub fn normalize_currency(currency: &str) -> String {
        currency.trim().to_uppercase()
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Add `amount` to the balance
    pub fn deposit(&mut self, amount: Decimal) -> Result<()> {
        require_positive("deposit", amount)?;
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| Error::invalid_input(format!("deposit of {} overflows balance", amount)))?;
        self.set_balance(balance);
        Ok(())
    }

    /// Take `amount` out of the balance
    pub fn withdraw(&mut self, amount: Decimal) -> Result<()> {
        require_positive("withdrawal", amount)?;
        self.ensure_covers(amount)?;
        self.set_balance(self.balance - amount);
        Ok(())
    }

    /// Move `amount` from this account into `destination`
    ///
    /// Self-transfer is rejected before any amount or funds check.
    pub fn transfer(&mut self, amount: Decimal, destination: &mut Account) -> Result<()> {
        if self.id == destination.id {
            return Err(Error::transfer_failed(format!(
                "cannot transfer from account {} to itself",
                self.id
            )));
        }
        require_positive("transfer", amount)?;
        self.ensure_covers(amount)?;
        let credited = destination.balance.checked_add(amount).ok_or_else(|| {
            Error::invalid_input(format!("transfer of {} overflows destination balance", amount))
        })?;

        self.set_balance(self.balance - amount);
        destination.set_balance(credited);
        Ok(())
    }

    /// Overwrite the balance with an authoritative value from a provider
    pub fn apply_synchronized(&mut self, balance: Decimal) -> Result<()> {
        if balance < Decimal::ZERO {
            return Err(Error::synchronization_failed(format!(
                "provider returned a negative balance: {}",
                balance
            )));
        }
        self.set_balance(balance);
        self.last_synced_at = Some(self.updated_at);
        Ok(())
    }

    fn ensure_covers(&self, amount: Decimal) -> Result<()> {
        if amount > self.balance {
            return Err(Error::insufficient_funds(amount, self.balance));
        }
        Ok(())
    }

    fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
        self.updated_at = Utc::now();
    }
}

fn require_positive(operation: &str, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "{} amount must be greater than zero, got {}",
            operation, amount
        )));
    }
    Ok(())
}
