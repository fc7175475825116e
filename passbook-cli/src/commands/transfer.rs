//! Transfer command - move money between two accounts

use anyhow::Result;
use passbook_core::Error;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{get_context, AccountReport};
use crate::output;

#[derive(Debug, Serialize)]
struct TransferReport {
    amount: Decimal,
    source: AccountReport,
    destination: AccountReport,
}

pub async fn run(amount: Decimal, from: Decimal, to: Decimal, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let result = async {
        let source = ctx.open_account(from)?;
        let destination = ctx.open_account(to)?;
        source.transfer(amount, &destination).await?;
        Ok::<_, Error>(TransferReport {
            amount,
            source: AccountReport::of(&source).await,
            destination: AccountReport::of(&destination).await,
        })
    }
    .await;

    if json {
        return output::print_json(result);
    }

    let report = result?;
    output::success(&format!(
        "Transferred {}",
        output::format_amount(report.amount, &report.source.currency)
    ));

    let mut table = output::create_table();
    table.set_header(vec!["Account", "Id", "Balance"]);
    for (label, account) in [("Source", &report.source), ("Destination", &report.destination)] {
        table.add_row(vec![
            label.to_string(),
            account.account_id.clone(),
            output::format_amount(account.balance, &account.currency),
        ]);
    }
    println!("{}", table);
    Ok(())
}
