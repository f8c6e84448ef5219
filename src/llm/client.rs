// file: src/llm/client.rs
// description: OpenAI-compatible chat completions client
// reference: https://platform.openai.com/docs/api-reference/chat

use super::CompletionBackend;
use crate::config::{AuthMode, LlmConfig};
use crate::error::{PipelineError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: Client,
    config: LlmConfig,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            PipelineError::Config(
                "No API key configured (set QUIZBANK__LLM__API_KEY or OPENAI_API_KEY)".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    async fn send(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(
            "Requesting completion from {} for {} prompt chars",
            self.config.model,
            user.len()
        );

        let mut builder = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json");

        builder = match self.config.auth_mode {
            AuthMode::Bearer => builder.header("Authorization", format!("Bearer {}", self.api_key)),
            AuthMode::Azure => {
                let builder = builder.header("api-key", &self.api_key);
                match &self.config.api_version {
                    Some(version) => builder.query(&[("api-version", version.as_str())]),
                    None => builder,
                }
            }
        };

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Llm(format!("Failed to send completion request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Llm(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            PipelineError::Llm(format!("Failed to parse completion response: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PipelineError::Llm("No completion content returned".to_string()))
    }
}

impl CompletionBackend for ChatCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.send(system, user).await
    }
}
