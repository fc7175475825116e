//! Balance provider port
//!
//! Defines the interface for fetching an authoritative account balance from
//! an external source (remote service, demo generator, scripted stub, etc.)

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Balance provider trait
///
/// Implementations look up the current balance of an account somewhere
/// outside this process. A failed lookup is reported as `None`, never as an
/// error: the caller decides what a missing balance means.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Provider name (e.g., "http", "demo", "fixed")
    fn name(&self) -> &str;

    /// Fetch the authoritative balance for an account
    ///
    /// # Arguments
    /// * `account_id` - Id of the account being looked up
    ///
    /// # Returns
    /// The balance, or `None` when the lookup failed
    async fn fetch_balance(&self, account_id: Uuid) -> Option<Decimal>;
}
