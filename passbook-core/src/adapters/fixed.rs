//! Scripted balance provider
//!
//! Answers from a queue of prepared responses and records every call. Tests
//! use it in place of a real provider; the CLI exposes it for offline runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ports::BalanceProvider;

/// Provider returning prepared responses
#[derive(Debug)]
pub struct FixedBalanceProvider {
    queued: Mutex<VecDeque<Option<Decimal>>>,
    fallback: Option<Decimal>,
    calls: AtomicUsize,
    requested: Mutex<Vec<Uuid>>,
}

impl FixedBalanceProvider {
    /// Always answer with `balance`
    pub fn returning(balance: Decimal) -> Self {
        Self::with_fallback(Some(balance))
    }

    /// Always answer with a failed lookup
    pub fn failing() -> Self {
        Self::with_fallback(None)
    }

    /// Answer with `responses` in order, then with `fallback` forever
    pub fn sequence(responses: impl IntoIterator<Item = Option<Decimal>>, fallback: Option<Decimal>) -> Self {
        let provider = Self::with_fallback(fallback);
        if let Ok(mut queued) = provider.queued.lock() {
            queued.extend(responses);
        }
        provider
    }

    fn with_fallback(fallback: Option<Decimal>) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Number of times `fetch_balance` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Account ids passed to `fetch_balance`, oldest first
    pub fn requested_ids(&self) -> Vec<Uuid> {
        self.requested
            .lock()
            .map(|ids| ids.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BalanceProvider for FixedBalanceProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn fetch_balance(&self, account_id: Uuid) -> Option<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(account_id);
        }

        let next = self.queued.lock().ok().and_then(|mut q| q.pop_front());
        next.unwrap_or(self.fallback)
    }
}
