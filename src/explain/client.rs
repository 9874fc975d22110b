use std::future::Future;
use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::config::ExplainConfig;

#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error("narrative service request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("narrative service returned HTTP {status}")]
    Status { status: reqwest::StatusCode },
    #[error("narrative service reply had no message content")]
    MissingContent,
    #[error("narrative service did not answer within {}", format_timeout(.0))]
    Timeout(Duration),
}

fn format_timeout(timeout: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*timeout)
}

/// The external collaborator that turns a prompt into free text.
pub trait NarrativeService: Send + Sync + 'static {
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String, ExplainError>> + Send;
}

/// Talks to an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpNarrativeService {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpNarrativeService {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Build from config, reading the API key from the environment variable
    /// the config names. A missing or blank variable means no auth header.
    pub fn from_config(config: &ExplainConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if api_key.is_none() {
            debug!(var = %config.api_key_env, "no API key set for narrative service");
        }
        Self::new(&config.endpoint, &config.model, api_key)
    }
}

impl NarrativeService for HttpNarrativeService {
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String, ExplainError>> + Send {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        async move {
            let mut request = client
                .post(&endpoint)
                .header("User-Agent", "admit-odds")
                .json(&body);
            if let Some(key) = api_key {
                request = request.header("Authorization", format!("Bearer {}", key));
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ExplainError::Status { status });
            }

            let reply: serde_json::Value = response.json().await?;
            message_content(&reply)
                .map(str::to_string)
                .ok_or(ExplainError::MissingContent)
        }
    }
}

/// Pull `choices[0].message.content` out of a chat completions reply.
fn message_content(reply: &serde_json::Value) -> Option<&str> {
    reply
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}
