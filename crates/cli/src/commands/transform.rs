//! `stylecraft transform`: Rewrite one query from the command line.

use std::path::Path;

use stylecraft_core::TransformError;

pub async fn run(
    config_path: Option<&Path>,
    query: &str,
    style: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let orchestrator = super::build_orchestrator(&config).await?;

    match orchestrator.transform(query, style).await {
        Ok(done) => {
            println!("{}", done.result.response_text);
            Ok(())
        }
        Err(e) => {
            if let Some(generated) = e.generated() {
                println!("{}", generated.response_text);
            }
            Err(describe(&e).into())
        }
    }
}

/// One-line failure message for the terminal.
fn describe(e: &TransformError) -> String {
    match e {
        TransformError::PersistenceFailedAfterSuccess { source, .. } => {
            format!("[{}] response shown above was not saved: {source}", e.kind())
        }
        _ if e.is_model_failure() => {
            format!("[{}] could not generate a response: {e}", e.kind())
        }
        _ => format!("[{}] {e}", e.kind()),
    }
}
