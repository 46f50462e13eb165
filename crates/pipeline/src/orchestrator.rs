//! The transformation orchestrator.
//!
//! Drives one request through
//! `Received → PromptBuilt → ModelInvoked → Normalized → Persisted → Completed`,
//! with `Failed` reachable from any stage. Nothing is retried.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use stylecraft_config::AppConfig;
use stylecraft_core::{
    HistoryEntry, HistoryPage, ModelClient, RecordId, RecordStore, StorageError,
    TransformError, TransformationRequest, TransformationResult,
};
use tracing::{debug, info, warn};

use crate::normalize::normalize;
use crate::prompt::build_prompt;

/// Characters of the query included in log lines.
const QUERY_LOG_PREVIEW: usize = 50;

/// Per-request pipeline stage, as it appears in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    PromptBuilt,
    ModelInvoked,
    Normalized,
    Persisted,
    Completed,
    Failed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::PromptBuilt => "prompt_built",
            Stage::ModelInvoked => "model_invoked",
            Stage::Normalized => "normalized",
            Stage::Persisted => "persisted",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        }
    }
}

/// Settings fixed at construction.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Upper bound for one model call.
    pub model_timeout: Duration,
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model_timeout: config.model.timeout(),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            model_timeout: Duration::from_secs(30),
        }
    }
}

/// A completed transformation and the id the store gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTransformation {
    pub id: RecordId,
    pub result: TransformationResult,
}

/// Per-request tracing context.
struct Trace {
    request_id: String,
    started: Instant,
}

impl Trace {
    fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().simple().to_string(),
            started: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn stage(&self, stage: Stage, style: &str) {
        debug!(
            request_id = %self.request_id,
            stage = stage.as_str(),
            style,
            elapsed_ms = self.elapsed_ms(),
            "Transformation stage"
        );
    }

    fn failed(&self, style: &str, error: &TransformError) {
        warn!(
            request_id = %self.request_id,
            stage = Stage::Failed.as_str(),
            style,
            error_kind = %error.kind(),
            elapsed_ms = self.elapsed_ms(),
            "Transformation failed: {error}"
        );
    }
}

/// The first characters of a query, safe to log.
fn query_preview(query: &str) -> String {
    query.chars().take(QUERY_LOG_PREVIEW).collect()
}

/// Runs transformations against one model client and one record store.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct Orchestrator {
    model: Arc<dyn ModelClient>,
    store: Arc<dyn RecordStore>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        model: Arc<dyn ModelClient>,
        store: Arc<dyn RecordStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            model,
            store,
            settings,
        }
    }

    pub fn model(&self) -> &Arc<dyn ModelClient> {
        &self.model
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Validate raw input and run it through the pipeline.
    pub async fn transform(
        &self,
        query: &str,
        style: &str,
    ) -> Result<StoredTransformation, TransformError> {
        let trace = Trace::new();
        info!(
            request_id = %trace.request_id,
            stage = Stage::Received.as_str(),
            style,
            query_len = query.chars().count(),
            query_preview = %query_preview(query),
            "Transformation received"
        );

        let request = match TransformationRequest::parse(query, style) {
            Ok(request) => request,
            Err(e) => {
                trace.failed(style, &e);
                return Err(e);
            }
        };

        let outcome = self.run(&trace, &request).await;
        if let Err(e) = &outcome {
            trace.failed(request.style().as_str(), e);
        }
        outcome
    }

    async fn run(
        &self,
        trace: &Trace,
        request: &TransformationRequest,
    ) -> Result<StoredTransformation, TransformError> {
        let style = request.style();

        let prompt = build_prompt(request.query(), style)?;
        trace.stage(Stage::PromptBuilt, style.as_str());

        let raw = self
            .model
            .complete(&prompt, self.settings.model_timeout)
            .await?;
        trace.stage(Stage::ModelInvoked, style.as_str());

        let response_text = normalize(&raw)?;
        trace.stage(Stage::Normalized, style.as_str());

        let result = TransformationResult {
            original_query: request.query().to_string(),
            style,
            response_text,
            created_at: Utc::now(),
        };

        let id = match self.persist(result.clone()).await {
            Ok(id) => id,
            Err(source) => {
                return Err(TransformError::PersistenceFailedAfterSuccess { result, source });
            }
        };
        trace.stage(Stage::Persisted, style.as_str());

        info!(
            request_id = %trace.request_id,
            stage = Stage::Completed.as_str(),
            style = style.as_str(),
            record_id = %id,
            elapsed_ms = trace.elapsed_ms(),
            "Transformation completed"
        );
        Ok(StoredTransformation { id, result })
    }

    /// Save on a separate task so an abandoned caller cannot cut a write
    /// short.
    async fn persist(&self, result: TransformationResult) -> Result<RecordId, StorageError> {
        let store = Arc::clone(&self.store);
        let handle = tokio::spawn(async move { store.save(result).await });

        match handle.await {
            Ok(saved) => saved,
            Err(e) => Err(StorageError::Write(format!("save task failed: {e}"))),
        }
    }

    /// One page of history, newest first, plus the total count.
    pub async fn history(&self, limit: usize, offset: usize) -> Result<HistoryPage, TransformError> {
        let entries = self.store.list_history(limit, offset).await?;
        let total = self.store.count().await?;
        Ok(HistoryPage {
            entries,
            total,
            limit,
            offset,
        })
    }

    /// A single stored record.
    pub async fn record(&self, id: &RecordId) -> Result<Option<HistoryEntry>, TransformError> {
        Ok(self.store.get(id).await?)
    }
}
