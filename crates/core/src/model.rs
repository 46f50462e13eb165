//! Model client trait: the abstraction over text-completion backends.
//!
//! A model client knows how to send one prompt to a language model and get
//! the raw completion text back, within a time bound.
//!
//! Implementations: OpenAI-compatible (Ollama `/v1`), native Ollama, mock.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ModelError;

/// The core ModelClient trait.
///
/// The orchestrator calls `complete()` without knowing which backend is
/// configured. Implementations must:
/// - make exactly one outbound call per invocation, with no caching,
/// - fail with [`ModelError::Timeout`] when `timeout` elapses, releasing any
///   held connection,
/// - never retry on their own,
/// - never persist anything.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable backend name (e.g. "ollama", "openai_compat", "mock").
    fn name(&self) -> &str;

    /// The model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send `prompt` and return the raw completion text.
    async fn complete(&self, prompt: &str, timeout: Duration) -> Result<String, ModelError>;

    /// Can we reach the backend?
    async fn health_check(&self) -> Result<bool, ModelError> {
        Ok(true)
    }
}
