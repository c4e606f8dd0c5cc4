use crate::core::assistant::AssistantProvider;
use crate::core::config::AssistantConfig;
use crate::providers::util::{is_transient, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

const SYSTEM_INSTRUCTION: &str = "You are a friendly and insightful personal financial advisor AI named FinancAI.
Your goal is to provide helpful, general financial guidance based on the user's provided data.
Analyze their spending, identify trends, and offer actionable tips for saving money and managing their budget.
You can answer questions about financial concepts.
IMPORTANT: You must not provide certified or professional financial advice. Always include a disclaimer that your advice is for informational purposes only and the user should consult a professional financial advisor for personalized advice.
Start your first message with a friendly greeting and introduce yourself.";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Content {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content,
    contents: &'a [Content],
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<Content>,
}

/// Talks to a Gemini `generateContent` endpoint and keeps the chat history,
/// so every request carries the whole conversation.
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    retries: usize,
    retry_delay_ms: u64,
    history: Mutex<Vec<Content>>,
}

impl GeminiProvider {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("finledger/0.1")
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(GeminiProvider {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            retries: 2,
            retry_delay_ms: 500,
            history: Mutex::new(Vec::new()),
        })
    }

    /// Builds a provider from config, reading the API key from the configured variable.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).with_context(|| {
            format!("{} environment variable not set", config.api_key_env)
        })?;
        Self::new(&config.base_url, &config.model, &api_key)
    }

    pub fn with_retry_policy(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self
    }
}

#[async_trait]
impl AssistantProvider for GeminiProvider {
    #[instrument(name = "GeminiSend", skip_all, fields(model = %self.model))]
    async fn send(&self, message: &str) -> Result<String> {
        // Held for the whole exchange so turns are recorded in order
        let mut history = self.history.lock().await;
        let mut contents = history.clone();
        contents.push(Content::text(Some("user"), message));

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            system_instruction: Content::text(None, SYSTEM_INSTRUCTION),
            contents: &contents,
        };
        debug!("Sending {} turns to {}", contents.len(), url);

        let response = with_retry(
            || {
                let request = self
                    .client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&body);
                async move { request.send().await?.error_for_status() }
            },
            self.retries,
            self.retry_delay_ms,
            is_transient,
        )
        .await
        .map_err(|e| match e.status() {
            Some(status) => anyhow!("HTTP error: {} from assistant", status),
            None => anyhow!("Request error: {} for model: {}", e, self.model),
        })?;

        let text = response.text().await?;
        let data: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse assistant response: {}", e))?;

        let reply: String = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if reply.trim().is_empty() {
            return Err(anyhow!("Assistant returned no reply"));
        }

        contents.push(Content::text(Some("model"), &reply));
        *history = contents;
        Ok(reply)
    }
}
