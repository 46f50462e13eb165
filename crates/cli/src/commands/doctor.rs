//! `stylecraft doctor`: Diagnose system health.

use std::path::Path;

use stylecraft_config::AppConfig;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 StyleCraft Doctor — System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("     Run `stylecraft init` or set DATABASE_URL / OLLAMA_BASE_URL");
            summary(1);
            return Ok(());
        }
    };

    match stylecraft_providers::build_from_config(&config.model) {
        Ok(model) => match model.health_check().await {
            Ok(true) => println!(
                "  ✅ Model backend reachable ({} at {})",
                model.name(),
                config.model.base_url
            ),
            Ok(false) => {
                println!("  ⚠️  Model backend answered but reported unhealthy");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Model backend: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Model backend: {e}");
            issues += 1;
        }
    }

    match stylecraft_store::open(&config.storage).await {
        Ok(store) => match store.count().await {
            Ok(n) => println!("  ✅ Storage ready ({}, {n} record(s))", store.name()),
            Err(e) => {
                println!("  ❌ Storage: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Storage: {e}");
            issues += 1;
        }
    }

    summary(issues);
    Ok(())
}

fn summary(issues: usize) {
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }
}
