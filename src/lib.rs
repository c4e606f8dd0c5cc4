pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::transactions::AddArgs;
use crate::core::config::AppConfig;
use crate::core::ledger::Ledger;
use crate::providers::GeminiProvider;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Add(AddArgs),
    List { count: Option<usize> },
    Summary,
    Categories,
    Currency { code: Option<String> },
    ResetMonth { assume_yes: bool },
    ResetAll { assume_yes: bool },
    Chat,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finledger starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let registry = config.registry()?;
    let store = store::open_default(&config)?;
    let currency = registry
        .load_selected(store.as_ref(), config.currency.as_deref())
        .clone();
    let now = Utc::now();
    let mut ledger = Ledger::load(Arc::clone(&store), now);
    let today = now.date_naive();

    match command {
        AppCommand::Add(args) => cli::transactions::add(&mut ledger, &args, &currency)?,
        AppCommand::List { count } => {
            cli::transactions::list(ledger.transactions(), &currency, count)
        }
        AppCommand::Summary => {
            cli::summary::run(ledger.transactions(), &currency, today, config.recent_count)
        }
        AppCommand::Categories => cli::transactions::categories(),
        AppCommand::Currency { code } => {
            cli::currency::run(&registry, store.as_ref(), &currency, code.as_deref())
        }
        AppCommand::ResetMonth { assume_yes } => {
            cli::reset::reset_month(&mut ledger, today, assume_yes)?
        }
        AppCommand::ResetAll { assume_yes } => cli::reset::reset_all(&mut ledger, assume_yes)?,
        AppCommand::Chat => {
            let provider = Arc::new(GeminiProvider::from_config(&config.assistant)?);
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            cli::chat::run(&ledger, &currency, config.recent_count, provider, input).await?;
        }
    }

    ledger.flush()
}
