//! Remote balance provider
//!
//! Looks up balances from a JSON HTTP endpoint:
//!
//! ```text
//! GET {base_url}/accounts/{id}/balance
//! -> { "balance": { "amount": 80.0, "currency": "USD" } }
//! ```
//!
//! Every failure (transport, status, decoding) is logged and reported as a
//! missing balance.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::ports::BalanceProvider;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key sent as `x-api-key`
pub const BALANCE_API_KEY_ENV: &str = "PASSBOOK_API_KEY";

#[derive(Debug, Clone, Deserialize)]
struct BalanceResponse {
    balance: BalanceData,
}

#[derive(Debug, Clone, Deserialize)]
struct BalanceData {
    #[serde(deserialize_with = "deserialize_amount")]
    amount: Decimal,
    #[serde(default)]
    #[allow(dead_code)]
    currency: Option<String>,
}

/// Deserialize amount that can be number or string
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|e| D::Error::custom(format!("invalid decimal: {}", e))),
        JsonValue::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| D::Error::custom(format!("invalid decimal: {}", e))),
        _ => Err(D::Error::custom("expected number or string for amount")),
    }
}

/// HTTP balance provider
#[derive(Debug)]
pub struct HttpBalanceProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpBalanceProvider {
    /// Create a provider for `base_url`
    ///
    /// Picks up an API key from `PASSBOOK_API_KEY` when set.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a provider with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url)
            .with_context(|| format!("Invalid balance provider URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: std::env::var(BALANCE_API_KEY_ENV).ok().filter(|k| !k.is_empty()),
        })
    }

    /// Send `key` as the `x-api-key` header
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_balance(&self, account_id: Uuid) -> Result<Decimal> {
        let url = format!("{}/accounts/{}/balance", self.base_url, account_id);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Balance request to {} failed", url))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                anyhow::bail!("Balance provider rejected authentication")
            }
            StatusCode::NOT_FOUND => anyhow::bail!("Account {} not known to provider", account_id),
            status => anyhow::bail!("Balance provider returned HTTP {}", status),
        }

        let body: BalanceResponse = response
            .json()
            .await
            .context("Failed to parse balance response")?;
        Ok(body.balance.amount)
    }
}

#[async_trait]
impl BalanceProvider for HttpBalanceProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_balance(&self, account_id: Uuid) -> Option<Decimal> {
        match self.request_balance(account_id).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(%account_id, %error, "balance lookup failed");
                None
            }
        }
    }
}
