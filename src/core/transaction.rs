//! Ledger records and the validated input used to create them.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Travel",
    "Personal",
    "Utilities",
    "Subscriptions",
    "Shopping",
    "Tech items",
    "Other",
];

const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Investment", "Gift", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Categories offered to the user for this kind. Any other label is still accepted.
    pub fn suggested_categories(self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => INCOME_CATEGORIES,
            TransactionKind::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionKind::Income => "income",
                TransactionKind::Expense => "expense",
            }
        )
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(anyhow::anyhow!("Invalid transaction type: {}", s)),
        }
    }
}

/// Largest amount a single transaction may carry, in base units.
///
/// Together with the registry's rate ceiling this keeps every conversion and any
/// realistic ledger total far inside `Decimal`'s range.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Rejects amounts outside `(0, MAX_AMOUNT]`.
fn check_amount(amount: Decimal) -> Result<(), InvalidTransaction> {
    if amount <= Decimal::ZERO {
        return Err(InvalidTransaction::NonPositiveAmount(amount));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(InvalidTransaction::AmountTooLarge(amount));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTransaction {
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("amount {0} exceeds the maximum of {MAX_AMOUNT}")]
    AmountTooLarge(Decimal),
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
}

/// A recorded income or expense. Amounts are always in the base currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// True when the transaction date falls in the same calendar month and year as `reference`.
    pub fn occurs_in_month_of(&self, reference: NaiveDate) -> bool {
        let date = self.date.date_naive();
        date.year() == reference.year() && date.month() == reference.month()
    }

    /// Re-checks the invariants of a record that did not come through [`NewTransaction`],
    /// e.g. one read back from a snapshot.
    pub fn check(&self) -> Result<(), InvalidTransaction> {
        check_amount(self.amount)?;
        if self.category.trim().is_empty() {
            return Err(InvalidTransaction::EmptyCategory);
        }
        Ok(())
    }
}

/// Everything needed to record a transaction except its id.
///
/// Construction validates the input, so the ledger never holds an invalid record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    kind: TransactionKind,
    category: String,
    amount: Decimal,
    date: DateTime<Utc>,
    description: String,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Decimal,
        date: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Result<Self, InvalidTransaction> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(InvalidTransaction::EmptyCategory);
        }
        check_amount(amount)?;
        Ok(Self {
            kind,
            category,
            amount,
            date,
            description: description.into(),
        })
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub(crate) fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

/// Parses a user supplied date. A bare `YYYY-MM-DD` is taken as midnight UTC.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, InvalidTransaction> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| InvalidTransaction::InvalidDate(input.to_string()));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| InvalidTransaction::InvalidDate(input.to_string()))
}
