//! `stylecraft init`: First-time setup.

use std::path::{Path, PathBuf};

use stylecraft_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    println!("✍️  StyleCraft — First-Time Setup");
    println!("================================\n");

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        } else {
            println!("  Config directory exists: {}", dir.display());
        }
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Start Ollama and pull the model: ollama pull qwen2:0.5b");
    println!("   2. Run: stylecraft doctor");
    println!("   3. Run: stylecraft serve\n");

    Ok(())
}
