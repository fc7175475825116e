//! Deposit command - add money to an account

use anyhow::Result;
use passbook_core::Error;
use rust_decimal::Decimal;

use super::{get_context, AccountReport};
use crate::output;

pub async fn run(amount: Decimal, balance: Decimal, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let result = async {
        let account = ctx.open_account(balance)?;
        account.deposit(amount).await?;
        Ok::<_, Error>(AccountReport::of(&account).await)
    }
    .await;

    if json {
        return output::print_json(result);
    }

    let report = result?;
    output::success(&format!(
        "Deposited {}",
        output::format_amount(amount, &report.currency)
    ));
    println!(
        "New balance: {}",
        output::format_amount(report.balance, &report.currency)
    );
    Ok(())
}
