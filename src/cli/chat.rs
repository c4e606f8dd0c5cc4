use super::ui;
use crate::core::assistant::{AssistantProvider, ChatMessage};
use crate::core::context::build_context;
use crate::core::currency::Currency;
use crate::core::ledger::Ledger;
use crate::core::session::AssistantSession;
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

fn print_reply(message: &ChatMessage) {
    println!(
        "\n{} {}\n",
        ui::style_text("FinancAI:", ui::StyleType::TotalValue),
        message.content
    );
}

/// Waits for the pending reply behind a spinner. Returns `false` when the user
/// interrupted, in which case the session has been closed.
async fn await_reply(session: &mut AssistantSession) -> Result<bool> {
    let spinner = ui::new_spinner("Thinking...");
    let reply = tokio::select! {
        reply = session.wait_reply() => Some(reply.map(ChatMessage::clone)),
        _ = tokio::signal::ctrl_c() => None,
    };
    spinner.finish_and_clear();

    match reply {
        Some(reply) => {
            print_reply(&reply?);
            Ok(true)
        }
        None => {
            debug!("Interrupted while waiting for the assistant");
            session.close();
            Ok(false)
        }
    }
}

/// Runs an interactive conversation, reading user lines from `input` until it
/// ends or a quit command is entered. The financial context is rebuilt from the
/// ledger for every message.
pub async fn run<R>(
    ledger: &Ledger,
    currency: &Currency,
    recent_count: usize,
    provider: Arc<dyn AssistantProvider>,
    input: R,
) -> Result<Vec<ChatMessage>>
where
    R: AsyncBufRead + Unpin,
{
    let mut session = AssistantSession::new(provider);
    let context = build_context(ledger.transactions(), currency, recent_count)?;
    session.open(&context)?;
    if !await_reply(&mut session).await? {
        return Ok(session.transcript().to_vec());
    }

    println!(
        "{}",
        ui::style_text("Type /quit to leave the conversation.", ui::StyleType::Subtle)
    );
    let mut lines = input.lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if QUIT_COMMANDS.contains(&text) {
            break;
        }
        if text.is_empty() {
            continue;
        }

        let context = build_context(ledger.transactions(), currency, recent_count)?;
        session.send(text, &context)?;
        if !await_reply(&mut session).await? {
            break;
        }
    }

    session.close();
    Ok(session.transcript().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assistant::Role;
    use crate::core::currency::CurrencyRegistry;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct RecordingProvider {
        received: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AssistantProvider for RecordingProvider {
        async fn send(&self, message: &str) -> Result<String> {
            let mut received = self.received.lock().unwrap();
            received.push(message.to_string());
            Ok(format!("reply {}", received.len()))
        }
    }

    #[tokio::test]
    async fn test_conversation_until_quit() {
        let ledger = Ledger::load(Arc::new(MemoryStore::new()), Utc::now());
        let registry = CurrencyRegistry::default();
        let provider = Arc::new(RecordingProvider {
            received: Mutex::new(Vec::new()),
        });

        let input: &[u8] = b"How am I doing?\n\n   \n/quit\nnever sent\n";
        let transcript = run(
            &ledger,
            registry.default_currency(),
            5,
            provider.clone(),
            input,
        )
        .await
        .unwrap();

        let roles: Vec<Role> = transcript.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(transcript[1].content, "How am I doing?");
        assert_eq!(transcript[2].content, "reply 2");

        let received = provider.received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert!(received[0].starts_with("Hello\n\nHere is my current financial context:\n"));
        assert!(received[1].contains("Total Income:"));
    }

    #[tokio::test]
    async fn test_end_of_input_ends_conversation() {
        let ledger = Ledger::load(Arc::new(MemoryStore::new()), Utc::now());
        let registry = CurrencyRegistry::default();
        let provider = Arc::new(RecordingProvider {
            received: Mutex::new(Vec::new()),
        });

        let input: &[u8] = b"";
        let transcript = run(&ledger, registry.default_currency(), 5, provider, input)
            .await
            .unwrap();
        assert_eq!(transcript.len(), 1);
    }
}
