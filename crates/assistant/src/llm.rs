//! Generative fallback client.
//!
//! One POST to an OpenAI-style chat-completion endpoint, with a bounded
//! timeout and a typed error for every way it can go wrong. The client
//! never silently returns an empty string: a 2xx response without usable
//! completion text is an error, distinct from transport failures, so the
//! orchestrator can log the precise cause.

use std::time::Duration;

use async_trait::async_trait;
use crumb_core::config::LlmConfig;
use crumb_core::errors::GenerativeError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The external text-completion boundary. A trait so the pipeline can be
/// exercised with scripted fakes.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GenerativeError>;
}

pub struct HttpGenerativeClient {
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpGenerativeClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
            client: reqwest::Client::new(),
        }
    }

    /// True when a request could actually be issued.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl GenerativeClient for HttpGenerativeClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, GenerativeError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(GenerativeError::NotConfigured);
        };

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatRequestMessage { role: "system", content: system_prompt },
                ChatRequestMessage { role: "user", content: user_text },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            event_name = "assistant.llm.request",
            model = %self.model,
            "issuing generative completion request"
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key.expose_secret())
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerativeError::Timeout { timeout_secs: self.timeout_secs }
                } else {
                    GenerativeError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerativeError::Api { status_code: status.as_u16() });
        }

        let raw = response.text().await.map_err(|err| {
            if err.is_timeout() {
                GenerativeError::Timeout { timeout_secs: self.timeout_secs }
            } else {
                GenerativeError::Transport(err.to_string())
            }
        })?;

        extract_completion(&raw)
    }
}

/// Pulls the single completion string out of a raw response body.
/// Separated from the network call so shape handling is testable on its
/// own.
fn extract_completion(raw: &str) -> Result<String, GenerativeError> {
    let parsed: ChatResponse = serde_json::from_str(raw)
        .map_err(|err| GenerativeError::MalformedResponse(err.to_string()))?;

    let completion = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if completion.is_empty() {
        return Err(GenerativeError::EmptyCompletion);
    }

    Ok(completion)
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
