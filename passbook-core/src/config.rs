//! Configuration management
//!
//! Settings live in `settings.json` inside the passbook directory:
//! ```json
//! {
//!   "provider": { "kind": "http", "baseUrl": "https://bank.example/api" },
//!   "fetchTimeoutMs": 5000,
//!   "currency": "USD"
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the provider kind
pub const PROVIDER_ENV: &str = "PASSBOOK_PROVIDER";

/// Environment variable overriding the fetch timeout (milliseconds)
pub const FETCH_TIMEOUT_ENV: &str = "PASSBOOK_FETCH_TIMEOUT_MS";

const SETTINGS_FILE: &str = "settings.json";

/// Which balance provider accounts synchronize against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Demo,
    Fixed,
    Http,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Demo => "demo",
            ProviderKind::Fixed => "fixed",
            ProviderKind::Http => "http",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "demo" => Ok(ProviderKind::Demo),
            "fixed" => Ok(ProviderKind::Fixed),
            "http" => Ok(ProviderKind::Http),
            other => anyhow::bail!("Unknown balance provider: {}", other),
        }
    }
}

/// Provider section of settings.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Base URL of the remote service (http provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Balance answered by the fixed provider; absent means it always fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_balance: Option<Decimal>,
    /// Seed for the demo provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    provider: ProviderSettings,
    #[serde(default)]
    fetch_timeout_ms: Option<u64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Passbook configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderSettings,
    pub fetch_timeout: Option<Duration>,
    pub currency: String,
    // Keep unknown settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderSettings::default(),
            fetch_timeout: None,
            currency: "USD".to_string(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the passbook directory
    ///
    /// A missing settings file yields the defaults. `PASSBOOK_PROVIDER` and
    /// `PASSBOOK_FETCH_TIMEOUT_MS` override the file.
    pub fn load(passbook_dir: &Path) -> Result<Self> {
        let settings_path = passbook_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {:?}", settings_path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {:?}", settings_path))?
        } else {
            SettingsFile::default()
        };

        let mut provider = raw.provider.clone();
        if let Ok(kind) = std::env::var(PROVIDER_ENV) {
            provider.kind = kind.parse()?;
        }

        let fetch_timeout_ms = match std::env::var(FETCH_TIMEOUT_ENV) {
            Ok(ms) => Some(
                ms.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a number of milliseconds", FETCH_TIMEOUT_ENV))?,
            ),
            Err(_) => raw.fetch_timeout_ms,
        };

        let config = Self {
            provider,
            fetch_timeout: fetch_timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis),
            currency: raw
                .currency
                .as_deref()
                .map(crate::domain::Account::normalize_currency)
                .unwrap_or_else(|| "USD".to_string()),
            _raw_settings: raw,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to the passbook directory
    /// Preserves other settings that passbook doesn't manage
    pub fn save(&self, passbook_dir: &Path) -> Result<()> {
        let mut settings = self._raw_settings.clone();
        settings.provider = self.provider.clone();
        settings.fetch_timeout_ms = self
            .fetch_timeout
            .map(|t| u64::try_from(t.as_millis()))
            .transpose()
            .context("fetch timeout does not fit in milliseconds")?;
        settings.currency = Some(self.currency.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(passbook_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// Check that the selected provider has what it needs
    pub fn validate(&self) -> Result<()> {
        if self.provider.kind == ProviderKind::Http {
            let base_url = self
                .provider
                .base_url
                .as_deref()
                .context("The http provider requires provider.baseUrl")?;
            url::Url::parse(base_url)
                .with_context(|| format!("Invalid provider.baseUrl: {}", base_url))?;
        }
        if self.currency.is_empty() {
            anyhow::bail!("currency cannot be empty");
        }
        Ok(())
    }
}
