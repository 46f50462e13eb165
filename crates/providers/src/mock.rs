//! Offline model client for demos and wiring checks.
//!
//! Produces a deterministic, style-specific rewrite without any network
//! traffic. The style is read from the tone the prompt asks for.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use stylecraft_core::{ModelClient, ModelError, Style};

#[derive(Default)]
pub struct MockClient {
    calls: AtomicUsize,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completions served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The text between `<original>` markers, or the whole prompt.
    fn original_text(prompt: &str) -> &str {
        prompt
            .rsplit_once("<original>")
            .and_then(|(_, rest)| rest.split_once("</original>"))
            .map(|(inner, _)| inner.trim())
            .unwrap_or(prompt.trim())
    }

    /// The style named in the instructions ahead of the quoted text.
    fn requested_style(prompt: &str) -> Option<Style> {
        let instructions = prompt
            .split_once("<original>")
            .map_or(prompt, |(head, _)| head)
            .to_ascii_lowercase();
        Style::ALL
            .into_iter()
            .find(|style| instructions.contains(style.as_str()))
    }

    fn rewrite(prompt: &str) -> String {
        let text = Self::original_text(prompt);
        match Self::requested_style(prompt) {
            Some(Style::Casual) => format!("Hey there! This is a MOCKED CASUAL response to: {text}"),
            Some(Style::Formal) => format!("This is a MOCKED FORMAL response to: {text}"),
            None => format!("(mocked rewrite) {text}"),
        }
    }
}

#[async_trait]
impl ModelClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str, _timeout: Duration) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}</rewritten>", Self::rewrite(prompt)))
    }
}
