//! The StyleCraft transformation pipeline.
//!
//! `query + style` → [`prompt::build_prompt`] → model → [`normalize::normalize`]
//! → store. The [`Orchestrator`] drives one request through those stages and
//! turns every failure into a `TransformError`.

pub mod normalize;
pub mod orchestrator;
pub mod prompt;

pub use normalize::normalize;
pub use orchestrator::{Orchestrator, OrchestratorSettings, Stage, StoredTransformation};
pub use prompt::build_prompt;
