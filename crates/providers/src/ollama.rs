//! Native Ollama client using `/api/generate`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use stylecraft_core::{ModelClient, ModelError};
use tracing::{debug, warn};

use crate::http::{
    HEALTH_CHECK_TIMEOUT, build_client, classify_status, classify_transport, probe, with_deadline,
};

pub struct OllamaClient {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    health_timeout: Duration,
    client: reqwest::Client,
}

impl OllamaClient {
    /// `base_url` is the server root, e.g. `http://localhost:11434`.
    /// A trailing `/v1` (the OpenAI-compatible prefix) is stripped.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        let base_url = base_url.strip_suffix("/v1").unwrap_or(base_url);
        Self {
            base_url: base_url.to_string(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 250,
            health_timeout: HEALTH_CHECK_TIMEOUT,
            client: build_client(),
        }
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

    fn parse_generation(body: &str) -> Result<String, ModelError> {
        let json: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            ModelError::MalformedResponse(format!("Failed to parse response: {e}"))
        })?;

        json["response"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ModelError::MalformedResponse("Missing 'response' field".into()))
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, ModelError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "num_predict": self.max_tokens,
            }
        });

        debug!(model = %self.model, "Sending Ollama generate request");

        with_deadline(timeout, async {
            let response = self
                .client
                .post(&url)
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
                warn!(status = status.as_u16(), "Ollama returned error");
                return Err(classify_status(status, &text));
            }

            Self::parse_generation(&text)
        })
        .await
    }

    async fn health_check(&self) -> Result<bool, ModelError> {
        let url = format!("{}/api/tags", self.base_url);
        probe(self.client.get(&url), self.health_timeout).await
    }
}
