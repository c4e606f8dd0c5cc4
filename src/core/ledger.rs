//! The ledger store: owns the transaction sequence and persists every change.
use crate::core::storage::{KeyValueStore, TRANSACTIONS_KEY};
use crate::core::transaction::{NewTransaction, Transaction, TransactionKind};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Proof that the user agreed to an irreversible removal.
///
/// Not `Clone`: every reset consumes its own confirmation.
#[derive(Debug)]
pub struct Confirmed {
    _private: (),
}

impl Confirmed {
    /// Returns a confirmation only for an affirmative answer.
    pub fn from_answer(affirmative: bool) -> Option<Self> {
        affirmative.then_some(Self { _private: () })
    }
}

pub struct Ledger {
    transactions: Vec<Transaction>,
    store: Arc<dyn KeyValueStore>,
    last_id: i64,
}

impl Ledger {
    /// Loads the persisted snapshot, or the seed set when it is missing or unusable.
    ///
    /// A missing or unusable snapshot is replaced by the seed in the store. When
    /// the store cannot be read at all, the seed is only held in memory.
    /// `now` anchors the dates of the seed set.
    pub fn load(store: Arc<dyn KeyValueStore>, now: DateTime<Utc>) -> Self {
        let (transactions, seeded) = match store.get(TRANSACTIONS_KEY) {
            Ok(Some(json)) => match parse_snapshot(&json) {
                Ok(transactions) => {
                    debug!("Loaded {} transactions from snapshot", transactions.len());
                    (transactions, false)
                }
                Err(e) => {
                    warn!(error = %e, "Ledger snapshot is unusable, starting from seed data");
                    (seed_transactions(now), true)
                }
            },
            Ok(None) => {
                info!("No ledger snapshot found, starting from seed data");
                (seed_transactions(now), true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read ledger snapshot, using seed data without saving it");
                (seed_transactions(now), false)
            }
        };

        let ledger = Self {
            transactions,
            store,
            last_id: 0,
        };
        if seeded {
            ledger.persist();
        }
        ledger
    }

    /// Transactions in insertion order, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Records a transaction at the front of the ledger, whatever its date.
    pub fn add(&mut self, new: NewTransaction) -> &Transaction {
        let id = self.next_id();
        let transaction = new.into_transaction(id);
        info!(
            id = %transaction.id,
            kind = %transaction.kind,
            category = %transaction.category,
            "Adding transaction"
        );
        self.transactions.insert(0, transaction);
        self.persist();
        &self.transactions[0]
    }

    /// Removes every transaction matching `predicate`, keeping the order of the rest.
    pub fn remove_where<P>(&mut self, _confirmed: Confirmed, mut predicate: P) -> usize
    where
        P: FnMut(&Transaction) -> bool,
    {
        let before = self.transactions.len();
        self.transactions.retain(|tx| !predicate(tx));
        let removed = before - self.transactions.len();
        info!(removed, remaining = self.transactions.len(), "Removed transactions");
        self.persist();
        removed
    }

    /// Removes the transactions dated in the calendar month of `reference`.
    pub fn reset_month(&mut self, confirmed: Confirmed, reference: NaiveDate) -> usize {
        self.remove_where(confirmed, |tx| tx.occurs_in_month_of(reference))
    }

    pub fn reset_all(&mut self, confirmed: Confirmed) -> usize {
        self.remove_where(confirmed, |_| true)
    }

    /// Makes all previous saves durable.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    /// Ids derive from the creation time in milliseconds, bumped past any id already used.
    fn next_id(&mut self) -> String {
        let existing: HashSet<&str> = self.transactions.iter().map(|t| t.id.as_str()).collect();
        let mut candidate = Utc::now().timestamp_millis().max(self.last_id + 1);
        while existing.contains(candidate.to_string().as_str()) {
            candidate += 1;
        }
        self.last_id = candidate;
        candidate.to_string()
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.transactions)
            .context("Failed to serialize transactions")
            .and_then(|json| self.store.put(TRANSACTIONS_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "Failed to save ledger snapshot");
        }
    }
}

fn parse_snapshot(json: &str) -> Result<Vec<Transaction>> {
    let transactions: Vec<Transaction> =
        serde_json::from_str(json).context("Failed to parse ledger snapshot")?;

    let mut ids = HashSet::new();
    for tx in &transactions {
        tx.check()
            .with_context(|| format!("Invalid transaction {} in snapshot", tx.id))?;
        if !ids.insert(tx.id.as_str()) {
            bail!("Duplicate transaction id {} in snapshot", tx.id);
        }
    }
    Ok(transactions)
}

/// Fixture used when no usable snapshot exists.
pub fn seed_transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    let entry = |id: &str, kind, category: &str, amount: i64, days_ago: i64, description: &str| {
        Transaction {
            id: id.to_string(),
            kind,
            category: category.to_string(),
            amount: Decimal::from(amount),
            date: now - Duration::days(days_ago),
            description: description.to_string(),
        }
    };

    vec![
        entry("1", TransactionKind::Income, "Salary", 5000, 0, "Monthly Salary"),
        entry("2", TransactionKind::Expense, "Travel", 250, 2, "Weekend trip"),
        entry("3", TransactionKind::Expense, "Food", 80, 3, "Groceries"),
        entry("4", TransactionKind::Expense, "Personal", 120, 5, "New headphones"),
        entry("5", TransactionKind::Expense, "Utilities", 150, 10, "Electricity Bill"),
        entry("6", TransactionKind::Income, "Freelance", 750, 12, "Web Design Project"),
    ]
}
