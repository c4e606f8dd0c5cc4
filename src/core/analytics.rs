//! Derived views over the ledger: monthly totals, expense breakdown and recent activity.
//!
//! Everything here is a pure function of its inputs. Nothing is cached; callers
//! recompute on every read so the views always match the live ledger.
use crate::core::transaction::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Income and expense totals in the base currency unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Summary {
    /// Net savings. Negative when expenses exceed income.
    pub fn savings(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Sums income and expense over the given transactions.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(Summary::default(), |mut acc, tx| {
            if tx.is_income() {
                acc.income += tx.amount;
            } else {
                acc.expense += tx.amount;
            }
            acc
        })
}

/// Totals for the calendar month and year containing `reference`.
pub fn monthly_summary(transactions: &[Transaction], reference: NaiveDate) -> Summary {
    summarize(
        transactions
            .iter()
            .filter(|tx| tx.occurs_in_month_of(reference)),
    )
}

/// Expense totals grouped by category, iterated in category order.
///
/// Only categories with at least one expense are present, so an empty breakdown
/// means there is nothing to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    categories: BTreeMap<String, Decimal>,
}

impl Breakdown {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.categories.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn total(&self) -> Decimal {
        self.categories.values().sum()
    }
}

/// Groups expense amounts by category. Income is ignored.
pub fn category_breakdown<'a, I>(transactions: I) -> Breakdown
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut categories = BTreeMap::new();
    for tx in transactions.into_iter().filter(|tx| tx.is_expense()) {
        *categories
            .entry(tx.category.clone())
            .or_insert(Decimal::ZERO) += tx.amount;
    }
    Breakdown { categories }
}

/// The first `count` transactions in ledger (insertion) order.
pub fn recent(transactions: &[Transaction], count: usize) -> &[Transaction] {
    &transactions[..count.min(transactions.len())]
}
