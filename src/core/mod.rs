//! Ledger state, derived views and the assistant contract

pub mod analytics;
pub mod assistant;
pub mod config;
pub mod context;
pub mod currency;
pub mod ledger;
pub mod log;
pub mod session;
pub mod storage;
pub mod transaction;

// Re-export main types for cleaner imports
pub use assistant::{AssistantProvider, ChatMessage, Role};
pub use currency::{Currency, CurrencyRegistry};
pub use ledger::{Confirmed, Ledger};
pub use session::{AssistantSession, SessionError, SessionState};
pub use storage::KeyValueStore;
pub use transaction::{NewTransaction, Transaction, TransactionKind};
