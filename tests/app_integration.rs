use finledger::cli::transactions::AddArgs;
use finledger::core::context::build_context;
use finledger::core::storage::{CURRENCY_KEY, KeyValueStore, TRANSACTIONS_KEY};
use finledger::core::{
    AssistantSession, CurrencyRegistry, Ledger, Role, SessionState, Transaction, TransactionKind,
};
use finledger::store::disk::DiskStore;
use finledger::store::memory::MemoryStore;
use finledger::{AppCommand, run_command};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const MODEL: &str = "test-model";

    pub fn reply_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })
        .to_string()
    }

    pub async fn create_gemini_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{MODEL}:generateContent")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }
}

/// Writes a config pointing the ledger at a temporary data directory.
fn write_config(dir: &Path) -> PathBuf {
    let config_path = dir.join("config.yaml");
    let data_path = dir.join("data");
    fs::write(
        &config_path,
        format!("data_path: {:?}\nrecent_count: 3\n", data_path.display().to_string()),
    )
    .unwrap();
    config_path
}

fn stored_transactions(dir: &Path) -> Vec<Transaction> {
    let store = DiskStore::open(&dir.join("data").join("ledger")).unwrap();
    let raw = store.get(TRANSACTIONS_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn add_args(kind: TransactionKind, amount: &str, category: &str) -> AddArgs {
    AddArgs {
        kind,
        amount: amount.to_string(),
        category: category.to_string(),
        description: Some("integration".to_string()),
        date: None,
    }
}

#[test_log::test(tokio::test)]
async fn test_first_run_seeds_and_add_prepends() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path());
    let config = config_path.to_str().unwrap();

    run_command(AppCommand::Summary, Some(config)).await.unwrap();
    let seeded = stored_transactions(dir.path());
    assert_eq!(seeded.len(), 6);

    run_command(
        AppCommand::Add(add_args(TransactionKind::Expense, "12.50", "Food")),
        Some(config),
    )
    .await
    .unwrap();

    let stored = stored_transactions(dir.path());
    info!(count = stored.len(), "Ledger after add");
    assert_eq!(stored.len(), 7);
    assert_eq!(stored[0].category, "Food");
    assert_eq!(stored[0].amount, Decimal::new(1250, 2));
    assert_eq!(&stored[1..], &seeded[..]);
}

#[test_log::test(tokio::test)]
async fn test_amounts_are_entered_in_selected_currency() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path());
    let config = config_path.to_str().unwrap();

    run_command(AppCommand::Currency { code: Some("eur".to_string()) }, Some(config))
        .await
        .unwrap();
    run_command(
        AppCommand::Add(add_args(TransactionKind::Income, "92", "Gift")),
        Some(config),
    )
    .await
    .unwrap();

    let store = DiskStore::open(&dir.path().join("data").join("ledger")).unwrap();
    assert_eq!(store.get(CURRENCY_KEY).unwrap().as_deref(), Some("EUR"));
    drop(store);

    let stored = stored_transactions(dir.path());
    assert_eq!(stored[0].kind, TransactionKind::Income);
    assert_eq!(stored[0].amount, Decimal::from(100));
}

#[test_log::test(tokio::test)]
async fn test_invalid_add_leaves_ledger_untouched() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path());
    let config = config_path.to_str().unwrap();

    let result = run_command(
        AppCommand::Add(add_args(TransactionKind::Expense, "0", "Food")),
        Some(config),
    )
    .await;
    assert!(result.is_err());
    assert_eq!(stored_transactions(dir.path()).len(), 6);
}

#[test_log::test(tokio::test)]
async fn test_reset_all_persists_empty_ledger() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path());
    let config = config_path.to_str().unwrap();

    run_command(AppCommand::ResetAll { assume_yes: true }, Some(config))
        .await
        .unwrap();
    assert!(stored_transactions(dir.path()).is_empty());

    // An empty ledger is a valid snapshot, not a reason to reseed
    run_command(AppCommand::List { count: None }, Some(config))
        .await
        .unwrap();
    assert!(stored_transactions(dir.path()).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_reset_month_keeps_older_transactions() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(dir.path());
    let config = config_path.to_str().unwrap();

    run_command(AppCommand::ResetMonth { assume_yes: true }, Some(config))
        .await
        .unwrap();

    let today = chrono::Utc::now().date_naive();
    let remaining = stored_transactions(dir.path());
    assert!(remaining.iter().all(|t| !t.occurs_in_month_of(today)));
}

#[test_log::test(tokio::test)]
async fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yaml");
    let result = run_command(AppCommand::Summary, missing.to_str()).await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_assistant_session_against_gemini() {
    use finledger::providers::GeminiProvider;

    let mock_server =
        test_utils::create_gemini_mock_server(200, &test_utils::reply_body("Hi, I'm FinancAI.")).await;
    let provider = GeminiProvider::new(&mock_server.uri(), test_utils::MODEL, "key")
        .unwrap()
        .with_retry_policy(0, 1);

    let ledger = Ledger::load(Arc::new(MemoryStore::new()), chrono::Utc::now());
    let registry = CurrencyRegistry::default();
    let context = build_context(ledger.transactions(), registry.resolve("GBP"), 3).unwrap();

    let mut session = AssistantSession::new(Arc::new(provider));
    session.open(&context).unwrap();
    let greeting = session.wait_reply().await.unwrap();
    assert_eq!(greeting.content, "Hi, I'm FinancAI.");

    session.exchange("Where does my money go?", &context).await.unwrap();
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.transcript().len(), 3);

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[1].body_json().unwrap();
    let last_turn = body["contents"][2]["parts"][0]["text"].as_str().unwrap();
    assert!(last_turn.starts_with("Where does my money go?\n\nHere is my current financial context:\n"));
    assert!(last_turn.contains("(in GBP)"));
}

#[test_log::test(tokio::test)]
async fn test_assistant_outage_yields_fallback_reply() {
    use finledger::core::assistant::FALLBACK_REPLY;
    use finledger::providers::GeminiProvider;

    let mock_server = test_utils::create_gemini_mock_server(503, "").await;
    let provider = GeminiProvider::new(&mock_server.uri(), test_utils::MODEL, "key")
        .unwrap()
        .with_retry_policy(1, 1);

    let mut session = AssistantSession::new(Arc::new(provider));
    session.open("context").unwrap();
    let reply = session.wait_reply().await.unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.content, FALLBACK_REPLY);
    assert_eq!(session.state(), SessionState::Idle);

    // Still usable after a failure
    session.send("Anyone there?", "context").unwrap();
    assert_eq!(session.state(), SessionState::AwaitingResponse);
    session.close();
    assert_eq!(session.state(), SessionState::Closed);
}
