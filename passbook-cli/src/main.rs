//! Passbook CLI - exercise bank account operations from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;
mod logging;
mod output;

use commands::{config, deposit, fetch, sync, transfer, withdraw};

/// Passbook - bank account operations in your terminal
#[derive(Parser)]
#[command(name = "pb", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deposit money into an account
    Deposit {
        /// Amount to deposit
        amount: Decimal,
        /// Starting balance of the account
        #[arg(long, default_value = "0")]
        balance: Decimal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Amount to withdraw
        amount: Decimal,
        /// Starting balance of the account
        #[arg(long)]
        balance: Decimal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Amount to transfer
        amount: Decimal,
        /// Starting balance of the source account
        #[arg(long)]
        from: Decimal,
        /// Starting balance of the destination account
        #[arg(long)]
        to: Decimal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synchronize an account's balance from the balance provider
    Sync {
        /// Starting balance of the account
        #[arg(long, default_value = "0")]
        balance: Decimal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the balance provider for a balance without applying it
    Fetch {
        /// Number of lookups to perform
        #[arg(long, short = 'n', default_value_t = 1)]
        count: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deposit { amount, balance, json } => deposit::run(amount, balance, json).await,
        Commands::Withdraw { amount, balance, json } => withdraw::run(amount, balance, json).await,
        Commands::Transfer { amount, from, to, json } => transfer::run(amount, from, to, json).await,
        Commands::Sync { balance, json } => sync::run(balance, json).await,
        Commands::Fetch { count, json } => fetch::run(count, json).await,
        Commands::Config { command } => config::run(command),
    }
}
