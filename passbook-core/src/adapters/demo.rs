//! Demo balance provider
//!
//! Simulates an unreliable remote service: answers with a whole balance
//! between 0 and 100, and fails roughly half of the time.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ports::BalanceProvider;

/// Upper bound (inclusive) of generated balances
pub const DEMO_MAX_BALANCE: i64 = 100;

const DEFAULT_FAILURE_RATE: f64 = 0.5;

/// Random balance provider for demos
pub struct DemoBalanceProvider {
    rng: Mutex<StdRng>,
    failure_rate: f64,
}

impl DemoBalanceProvider {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            failure_rate: DEFAULT_FAILURE_RATE,
        }
    }

    /// Deterministic provider for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            failure_rate: DEFAULT_FAILURE_RATE,
        }
    }

    /// Override the probability of a failed lookup (clamped to 0..=1)
    ///
    /// A NaN rate falls back to the default of one half.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = if failure_rate.is_nan() {
            DEFAULT_FAILURE_RATE
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        self
    }
}

impl Default for DemoBalanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BalanceProvider for DemoBalanceProvider {
    fn name(&self) -> &str {
        "demo"
    }

    async fn fetch_balance(&self, account_id: Uuid) -> Option<Decimal> {
        let mut rng = self.rng.lock().ok()?;
        // Draw the balance first so the failure coin does not shift the sequence
        let balance = rng.gen_range(0..=DEMO_MAX_BALANCE);
        let failed = rng.gen_bool(self.failure_rate);

        if failed {
            tracing::debug!(%account_id, "demo provider simulated a failed lookup");
            return None;
        }
        Some(Decimal::from(balance))
    }
}
