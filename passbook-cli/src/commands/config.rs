//! Config command - show or change settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use rust_decimal::Decimal;

use super::get_passbook_dir;
use crate::output;
use passbook_core::config::{Config, ProviderKind};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show,
    /// Select the balance provider
    Provider {
        /// Provider kind (demo, fixed, http)
        kind: ProviderKind,
        /// Base URL for the http provider
        #[arg(long)]
        url: Option<String>,
        /// Balance answered by the fixed provider
        #[arg(long)]
        balance: Option<Decimal>,
        /// Seed for the demo provider
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Set the provider lookup timeout in milliseconds (0 disables it)
    Timeout { millis: u64 },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    let passbook_dir = get_passbook_dir()?;
    std::fs::create_dir_all(&passbook_dir)?;
    let mut config = Config::load(&passbook_dir)?;

    match command {
        Some(ConfigCommands::Provider { kind, url, balance, seed }) => {
            config.provider.kind = kind;
            config.provider.base_url = url.or(config.provider.base_url);
            config.provider.fixed_balance = balance.or(config.provider.fixed_balance);
            config.provider.seed = seed.or(config.provider.seed);
            config.validate()?;
            config.save(&passbook_dir)?;
            output::success(&format!("Balance provider set to {}", kind.as_str()));
            Ok(())
        }
        Some(ConfigCommands::Timeout { millis }) => {
            config.fetch_timeout = (millis > 0).then(|| std::time::Duration::from_millis(millis));
            config.save(&passbook_dir)?;
            output::success("Fetch timeout updated");
            Ok(())
        }
        Some(ConfigCommands::Show) | None => {
            println!("{}", "Passbook Settings".bold());
            println!();

            let mut table = output::create_table();
            table.add_row(vec!["Directory", &passbook_dir.display().to_string()]);
            table.add_row(vec!["Provider", config.provider.kind.as_str()]);
            if let Some(url) = &config.provider.base_url {
                table.add_row(vec!["Base URL", url]);
            }
            if let Some(balance) = config.provider.fixed_balance {
                table.add_row(vec!["Fixed balance", &balance.to_string()]);
            }
            let timeout = config
                .fetch_timeout
                .map(|t| format!("{} ms", t.as_millis()))
                .unwrap_or_else(|| "none".to_string());
            table.add_row(vec!["Fetch timeout", &timeout]);
            table.add_row(vec!["Currency", &config.currency]);
            println!("{}", table);
            Ok(())
        }
    }
}
