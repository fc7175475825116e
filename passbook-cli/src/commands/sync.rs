//! Sync command - replace an account's balance with the provider's value

use anyhow::Result;
use colored::Colorize;
use passbook_core::Error;
use rust_decimal::Decimal;

use super::{get_context, AccountReport};
use crate::output;

pub async fn run(balance: Decimal, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let provider = ctx.provider.name().to_string();

    let result = async {
        let account = ctx.open_account(balance)?;
        account.synchronize_balance().await?;
        Ok::<_, Error>(AccountReport::of(&account).await)
    }
    .await;

    if json {
        return output::print_json(result);
    }

    let report = result?;
    output::success(&format!("Synchronized from {}", provider.as_str().bold()));
    println!(
        "Balance: {} -> {}",
        output::format_amount(balance, &report.currency),
        output::format_amount(report.balance, &report.currency)
    );
    Ok(())
}
