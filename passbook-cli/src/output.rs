//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use passbook_core::{Error, OperationResult};
use rust_decimal::Decimal;
use serde::Serialize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an amount with two decimal places
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Print an operation outcome as JSON
///
/// Domain errors are part of the JSON payload; the command still fails so
/// the exit code reflects the outcome.
pub fn print_json<T: Serialize>(result: passbook_core::domain::result::Result<T>) -> anyhow::Result<()> {
    let failed = result.as_ref().err().map(Error::to_string);
    let envelope: OperationResult<T> = result.into();
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    match failed {
        Some(message) => anyhow::bail!(message),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(80), "USD"), "80.00 USD");
        assert_eq!(format_amount(Decimal::new(125, 1), "EUR"), "12.50 EUR");
    }
}
