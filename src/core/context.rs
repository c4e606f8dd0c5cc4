//! Renders the financial snapshot that accompanies every assistant message.
use crate::core::analytics::{self, Summary};
use crate::core::currency::Currency;
use crate::core::transaction::{Transaction, TransactionKind};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Number of recent transactions included when the configuration does not say otherwise.
pub const DEFAULT_RECENT_COUNT: usize = 5;

#[derive(Serialize)]
struct RecentEntry<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: TransactionKind,
    category: &'a str,
    amount: String,
    date: DateTime<Utc>,
    description: &'a str,
}

/// Builds the context block: income, expense, savings, expense breakdown and the
/// `recent_count` most recent transactions, always in that order.
///
/// Totals cover every transaction in the ledger. Amounts are converted into
/// `currency` and formatted with two decimals.
pub fn build_context(
    transactions: &[Transaction],
    currency: &Currency,
    recent_count: usize,
) -> Result<String> {
    let summary: Summary = analytics::summarize(transactions);
    let expenses = analytics::category_breakdown(transactions);
    let breakdown: BTreeMap<&str, String> = expenses
        .iter()
        .map(|(category, amount)| (category, currency.format_amount(amount)))
        .collect();
    let recent: Vec<RecentEntry> = analytics::recent(transactions, recent_count)
        .iter()
        .map(|tx| RecentEntry {
            id: &tx.id,
            kind: tx.kind,
            category: &tx.category,
            amount: currency.format_amount(tx.amount),
            date: tx.date,
            description: &tx.description,
        })
        .collect();

    let mut out = String::new();
    writeln!(
        out,
        "Here is a summary of my recent financial activity (in {}):",
        currency.code
    )?;
    writeln!(out, "- Total Income: {}", currency.format_amount(summary.income))?;
    writeln!(out, "- Total Expense: {}", currency.format_amount(summary.expense))?;
    writeln!(out, "- Net Savings: {}", currency.format_amount(summary.savings()))?;
    writeln!(
        out,
        "- Expense Breakdown: {}",
        serde_json::to_string(&breakdown).context("Failed to serialize expense breakdown")?
    )?;
    write!(
        out,
        "- Recent Transactions: {}",
        serde_json::to_string_pretty(&recent).context("Failed to serialize recent transactions")?
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction {
                id: "2".to_string(),
                kind: TransactionKind::Expense,
                category: "Travel".to_string(),
                amount: Decimal::from(250),
                date: Utc.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap(),
                description: "Weekend trip".to_string(),
            },
            Transaction {
                id: "1".to_string(),
                kind: TransactionKind::Income,
                category: "Salary".to_string(),
                amount: Decimal::from(5000),
                date: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
                description: "Monthly Salary".to_string(),
            },
        ]
    }

    #[test]
    fn test_context_layout() {
        let eur = Currency::new("EUR", "€", Decimal::new(92, 2));
        let context = build_context(&sample(), &eur, 5).unwrap();

        let expected = r#"Here is a summary of my recent financial activity (in EUR):
- Total Income: €4600.00
- Total Expense: €230.00
- Net Savings: €4370.00
- Expense Breakdown: {"Travel":"€230.00"}
- Recent Transactions: [
  {
    "id": "2",
    "type": "expense",
    "category": "Travel",
    "amount": "€230.00",
    "date": "2024-05-03T08:00:00Z",
    "description": "Weekend trip"
  },
  {
    "id": "1",
    "type": "income",
    "category": "Salary",
    "amount": "€4600.00",
    "date": "2024-05-01T08:00:00Z",
    "description": "Monthly Salary"
  }
]"#;
        assert_eq!(context, expected);
    }

    #[test]
    fn test_context_is_deterministic() {
        let usd = Currency::new("USD", "$", Decimal::ONE);
        let first = build_context(&sample(), &usd, 5).unwrap();
        let second = build_context(&sample(), &usd, 5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_context_for_empty_ledger() {
        let usd = Currency::new("USD", "$", Decimal::ONE);
        let context = build_context(&[], &usd, 5).unwrap();

        assert!(context.contains("- Total Income: $0.00\n"));
        assert!(context.contains("- Net Savings: $0.00\n"));
        assert!(context.contains("- Expense Breakdown: {}\n"));
        assert!(context.ends_with("- Recent Transactions: []"));
    }

    #[test]
    fn test_context_limits_recent_transactions() {
        let usd = Currency::new("USD", "$", Decimal::ONE);
        let context = build_context(&sample(), &usd, 1).unwrap();
        assert!(context.contains(r#""id": "2""#));
        assert!(!context.contains(r#""id": "1""#));
        // Totals still cover the whole ledger
        assert!(context.contains("- Total Income: $5000.00\n"));
    }
}
