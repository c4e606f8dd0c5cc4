use super::ui;
use crate::core::currency::Currency;
use crate::core::ledger::Ledger;
use crate::core::transaction::{self, NewTransaction, Transaction, TransactionKind};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Raw `add` arguments as typed on the command line.
#[derive(Debug, Clone)]
pub struct AddArgs {
    pub kind: TransactionKind,
    pub amount: String,
    pub category: String,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl AddArgs {
    /// Validates the arguments. Amounts are entered in the active currency and
    /// stored in base units.
    pub fn parse(&self, currency: &Currency, now: DateTime<Utc>) -> Result<NewTransaction> {
        let entered = Decimal::from_str(self.amount.trim())
            .with_context(|| format!("Invalid amount: {}", self.amount))?;
        let date = match &self.date {
            Some(date) => transaction::parse_date(date)?,
            None => now,
        };
        let amount = entered
            .checked_div(currency.rate)
            .with_context(|| format!("Amount {} is too large", self.amount))?;
        let new = NewTransaction::new(
            self.kind,
            &self.category,
            amount,
            date,
            self.description.clone().unwrap_or_default(),
        )?;
        Ok(new)
    }
}

pub fn add(ledger: &mut Ledger, args: &AddArgs, currency: &Currency) -> Result<()> {
    let new = args.parse(currency, Utc::now())?;
    let tx = ledger.add(new);
    println!(
        "Added {} {} in {} ({})",
        tx.kind,
        currency.format_grouped(tx.amount),
        tx.category,
        tx.id
    );
    Ok(())
}

pub fn list(transactions: &[Transaction], currency: &Currency, count: Option<usize>) {
    let shown = match count {
        Some(count) => &transactions[..count.min(transactions.len())],
        None => transactions,
    };
    if shown.is_empty() {
        println!("{}", ui::style_text("No transactions yet.", ui::StyleType::Subtle));
        return;
    }
    println!("{}", ui::transactions_table(shown, currency));
    println!(
        "{}",
        ui::style_text(
            &format!("{} of {} transactions", shown.len(), transactions.len()),
            ui::StyleType::Subtle
        )
    );
}

/// Prints the suggested categories for both kinds.
pub fn categories() {
    for kind in [TransactionKind::Income, TransactionKind::Expense] {
        println!(
            "{}: {}",
            ui::style_text(&kind.to_string(), ui::StyleType::TotalLabel),
            kind.suggested_categories().join(", ")
        );
    }
}
