//! Fetch command - query the balance provider without touching any account

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use super::get_context;
use crate::output;

#[derive(Debug, Serialize)]
struct FetchReport {
    provider: String,
    /// One entry per lookup; `null` marks a failed lookup
    balances: Vec<Option<Decimal>>,
}

pub async fn run(count: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let account = ctx.open_account(Decimal::ZERO)?;

    let mut balances = Vec::with_capacity(count);
    for _ in 0..count {
        balances.push(account.fetch_balance().await);
    }

    let report = FetchReport {
        provider: account.provider_name().to_string(),
        balances,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["#", "Balance"]);
    for (i, balance) in report.balances.iter().enumerate() {
        let cell = match balance {
            Some(b) => output::format_amount(*b, &ctx.config.currency),
            None => "failed".to_string(),
        };
        table.add_row(vec![(i + 1).to_string(), cell]);
    }
    println!("{}", table);

    let failures = report.balances.iter().filter(|b| b.is_none()).count();
    if failures > 0 {
        output::warning(&format!(
            "{} of {} lookups from '{}' failed",
            failures, count, report.provider
        ));
    }
    Ok(())
}
