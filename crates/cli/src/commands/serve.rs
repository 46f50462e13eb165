//! `stylecraft serve`: Start the HTTP API server.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("✍️  StyleCraft Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Model: {} via {} ({})",
        config.model.model, config.model.provider, config.model.base_url
    );
    println!("   Storage: {}", config.storage.redacted_url());

    stylecraft_gateway::start(config).await?;

    Ok(())
}
