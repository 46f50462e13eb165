//! OpenAI-compatible model client.
//!
//! Talks to any `/v1/chat/completions` endpoint. This is the default path
//! for a local Ollama server, which exposes the OpenAI wire format under
//! `http://localhost:11434/v1`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stylecraft_core::{ModelClient, ModelError};
use tracing::{debug, warn};

use crate::http::{
    HEALTH_CHECK_TIMEOUT, build_client, classify_status, classify_transport, probe, with_deadline,
};

/// A model client speaking the OpenAI chat-completions protocol.
pub struct OpenAiCompatClient {
    name: String,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    health_timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 250,
            health_timeout: HEALTH_CHECK_TIMEOUT,
            client: build_client(),
        }
    }

    /// A local Ollama server (convenience constructor).
    pub fn ollama(base_url: Option<&str>, model: impl Into<String>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            model,
        )
        // Ollama ignores the key but the wire format expects one
        .with_api_key("ollama")
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Bound for `health_check`.
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Extract the completion text from a 2xx body.
    fn parse_completion(body: &str) -> Result<String, ModelError> {
        let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
            ModelError::MalformedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::MalformedResponse("No choices in response".into()))?;

        choice
            .message
            .content
            .ok_or_else(|| ModelError::MalformedResponse("Choice has no content".into()))
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(prompt);

        debug!(provider = %self.name, model = %self.model, "Sending completion request");

        with_deadline(timeout, async {
            let response = self
                .authorized(self.client.post(&url))
                .json(&body)
                .send()
                .await
                .map_err(|e| classify_transport(e, timeout))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| classify_transport(e, timeout))?;

            if !status.is_success() {
                warn!(status = status.as_u16(), "Model backend returned error");
                return Err(classify_status(status, &text));
            }

            Self::parse_completion(&text)
        })
        .await
    }

    async fn health_check(&self) -> Result<bool, ModelError> {
        let url = format!("{}/models", self.base_url);
        probe(self.authorized(self.client.get(&url)), self.health_timeout).await
    }
}

// --- OpenAI API types ---

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
