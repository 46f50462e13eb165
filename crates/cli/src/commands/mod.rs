pub mod doctor;
pub mod history;
pub mod init;
pub mod serve;
pub mod transform;

use std::path::Path;

use stylecraft_config::AppConfig;
use stylecraft_pipeline::{Orchestrator, OrchestratorSettings};

pub(crate) fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Wire the configured model backend and store into an orchestrator.
pub(crate) async fn build_orchestrator(
    config: &AppConfig,
) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let model = stylecraft_providers::build_from_config(&config.model)?;
    let store = stylecraft_store::open(&config.storage).await?;
    Ok(Orchestrator::new(
        model,
        store,
        OrchestratorSettings::from_config(config),
    ))
}
