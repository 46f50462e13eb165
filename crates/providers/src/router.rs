//! Backend selection from configuration.

use std::sync::Arc;

use stylecraft_config::{ConfigError, ModelConfig, PROVIDERS};
use stylecraft_core::ModelClient;

use crate::http::HEALTH_CHECK_TIMEOUT;
use crate::mock::MockClient;
use crate::ollama::OllamaClient;
use crate::openai_compat::OpenAiCompatClient;

/// Build the configured model client.
pub fn build_from_config(config: &ModelConfig) -> Result<Arc<dyn ModelClient>, ConfigError> {
    let health_timeout = config.timeout().min(HEALTH_CHECK_TIMEOUT);
    let client: Arc<dyn ModelClient> = match config.provider.as_str() {
        "openai_compat" => {
            let mut client =
                OpenAiCompatClient::new("openai_compat", &config.base_url, &config.model)
                    .with_sampling(config.temperature, config.max_tokens)
                    .with_health_timeout(health_timeout);
            if let Some(key) = &config.api_key {
                client = client.with_api_key(key);
            }
            Arc::new(client)
        }
        "ollama" => Arc::new(
            OllamaClient::new(&config.base_url, &config.model)
                .with_sampling(config.temperature, config.max_tokens)
                .with_health_timeout(health_timeout),
        ),
        "mock" => Arc::new(MockClient::new()),
        other => {
            return Err(ConfigError::Invalid {
                field: "model.provider",
                reason: format!(
                    "unknown provider '{other}', expected one of {}",
                    PROVIDERS.join(", ")
                ),
            });
        }
    };

    tracing::debug!(provider = client.name(), model = client.model(), "Model client ready");
    Ok(client)
}
