//! Model backend clients for StyleCraft.
//!
//! All clients implement the `stylecraft_core::ModelClient` trait.
//! [`build_from_config`] selects one based on configuration.

mod http;
pub mod mock;
pub mod ollama;
pub mod openai_compat;
pub mod router;

pub use mock::MockClient;
pub use ollama::OllamaClient;
pub use openai_compat::OpenAiCompatClient;
pub use router::build_from_config;

#[cfg(test)]
pub(crate) mod test_server;
