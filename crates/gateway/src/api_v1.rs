//! HTTP API v1.
//!
//! Endpoints:
//!
//! - `POST /v1/transform`: Rewrite a query in a style and store it
//! - `GET  /v1/history`: Paginated history, newest first
//! - `GET  /v1/history/{id}`: A single stored transformation
//!
//! Every failure body is `{error_kind, message}`. When the rewrite succeeded
//! but could not be stored, the body also carries the generated text.

use axum::{
    Router,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use stylecraft_core::{
    ErrorKind, HistoryEntry, HistoryPage, RecordId, Style, TransformError, TransformationResult,
};

use crate::SharedState;

/// History page size when the caller gives none.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
/// Largest history page a caller may ask for.
pub const MAX_HISTORY_LIMIT: i64 = 100;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/transform", post(transform_handler))
        .route("/history", get(history_handler))
        .route("/history/{id}", get(get_record_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct TransformBody {
    query: String,
    style: String,
}

#[derive(Serialize, Deserialize)]
pub struct TransformResponse {
    pub id: String,
    pub query: String,
    pub style: Style,
    pub response_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct HistoryParams {
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    offset: Option<i64>,
}

// ── Errors ────────────────────────────────────────────────────────────────

/// The JSON failure body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// An API failure, rendered as [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: ErrorKind,
    message: String,
    generated: Option<TransformationResult>,
}

impl ApiError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: status_for(kind),
            kind,
            message: message.into(),
            generated: None,
        }
    }

    fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ModelUnreachable
        | ErrorKind::ModelMalformedResponse
        | ErrorKind::EmptyResponse => StatusCode::BAD_GATEWAY,
        ErrorKind::ModelTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::StorageWrite
        | ErrorKind::PersistenceFailedAfterSuccess
        | ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
    }
}

impl From<TransformError> for ApiError {
    fn from(e: TransformError) -> Self {
        let mut api = Self::new(e.kind(), e.to_string());
        if let TransformError::PersistenceFailedAfterSuccess { result, .. } = e {
            api.message = "The response was generated but could not be saved".into();
            api.generated = Some(result);
        }
        api
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let mut api = Self::invalid_input(rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            api.status = StatusCode::PAYLOAD_TOO_LARGE;
        }
        api
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(error_kind = %self.kind, "{}", self.message);
        }

        let (response_text, style, created_at) = match self.generated {
            Some(result) => (
                Some(result.response_text),
                Some(result.style),
                Some(result.created_at),
            ),
            None => (None, None, None),
        };

        let body = ErrorBody {
            error_kind: self.kind,
            message: self.message,
            response_text,
            style,
            created_at,
        };
        (self.status, Json(body)).into_response()
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

/// `POST /v1/transform`: run one transformation.
async fn transform_handler(
    State(state): State<SharedState>,
    body: Result<Json<TransformBody>, JsonRejection>,
) -> Result<(StatusCode, Json<TransformResponse>), ApiError> {
    let Json(body) = body?;

    let done = state
        .orchestrator
        .transform(&body.query, &body.style)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransformResponse {
            id: done.id.to_string(),
            query: done.result.original_query,
            style: done.result.style,
            response_text: done.result.response_text,
            created_at: done.result.created_at,
        }),
    ))
}

/// `GET /v1/history?limit=&offset=`: newest first.
async fn history_handler(
    State(state): State<SharedState>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryPage>, ApiError> {
    let Query(params) = params?;

    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(ApiError::invalid_input(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }
    let offset = params.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::invalid_input("offset must not be negative"));
    }

    let page = state
        .orchestrator
        .history(limit as usize, offset as usize)
        .await?;
    Ok(Json(page))
}

/// `GET /v1/history/{id}`: one record.
async fn get_record_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryEntry>, ApiError> {
    let id = RecordId(id);
    match state.orchestrator.record(&id).await? {
        Some(entry) => Ok(Json(entry)),
        None => Err(ApiError::new(
            ErrorKind::NotFound,
            format!("No transformation with id '{id}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GatewayState, build_router};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration;
    use stylecraft_config::GatewayConfig;
    use stylecraft_core::{ModelClient, ModelError, RecordStore, StorageError};
    use stylecraft_pipeline::{Orchestrator, OrchestratorSettings};
    use stylecraft_store::InMemoryStore;
    use tower::ServiceExt;

    /// Lightweight scripted model for gateway tests.
    struct ScriptedModel(Result<String, ModelError>);

    #[async_trait::async_trait]
    impl ModelClient for ScriptedModel {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        async fn complete(&self, _prompt: &str, _timeout: Duration) -> Result<String, ModelError> {
            self.0.clone()
        }
    }

    /// Accepts nothing.
    struct BrokenStore;

    #[async_trait::async_trait]
    impl RecordStore for BrokenStore {
        fn name(&self) -> &str {
            "broken"
        }

        async fn save(&self, _result: TransformationResult) -> Result<RecordId, StorageError> {
            Err(StorageError::Unavailable("database is down".into()))
        }

        async fn list_history(
            &self,
            _limit: usize,
            _offset: usize,
        ) -> Result<Vec<HistoryEntry>, StorageError> {
            Err(StorageError::Unavailable("database is down".into()))
        }

        async fn get(&self, _id: &RecordId) -> Result<Option<HistoryEntry>, StorageError> {
            Err(StorageError::Unavailable("database is down".into()))
        }

        async fn count(&self) -> Result<usize, StorageError> {
            Err(StorageError::Unavailable("database is down".into()))
        }
    }

    fn app_with(reply: Result<String, ModelError>, store: Arc<dyn RecordStore>) -> Router {
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(ScriptedModel(reply)),
            store,
            OrchestratorSettings::default(),
        ));
        build_router(
            Arc::new(GatewayState { orchestrator }),
            &GatewayConfig::default(),
        )
    }

    fn app(reply: &str) -> Router {
        app_with(Ok(reply.into()), Arc::new(InMemoryStore::new()))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_transform(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/transform")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn transform_returns_created() {
        let (status, body) = send(
            app("Please send me the report at your earliest convenience."),
            post_transform(r#"{"query":"please send me the report","style":"formal"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["query"], "please send me the report");
        assert_eq!(body["style"], "formal");
        assert_eq!(
            body["response_text"],
            "Please send me the report at your earliest convenience."
        );
        assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn transform_rejects_bad_style() {
        let (status, body) = send(
            app("unused"),
            post_transform(r#"{"query":"hello","style":"pirate"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_kind"], "invalid_input");
        assert!(body["message"].as_str().unwrap().contains("pirate"));
    }

    #[tokio::test]
    async fn transform_rejects_empty_query() {
        let (status, body) = send(
            app("unused"),
            post_transform(r#"{"query":"   ","style":"casual"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_kind"], "invalid_input");
    }

    #[tokio::test]
    async fn transform_rejects_malformed_json() {
        for raw in [r#"{"query":"hello"}"#, "not json"] {
            let (status, body) = send(app("unused"), post_transform(raw)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body["error_kind"], "invalid_input");
        }
    }

    #[tokio::test]
    async fn model_failures_map_to_gateway_statuses() {
        let cases = [
            (
                Err(ModelError::Timeout { timeout_ms: 30_000 }),
                StatusCode::GATEWAY_TIMEOUT,
                "model_timeout",
            ),
            (
                Err(ModelError::Unreachable("connection refused".into())),
                StatusCode::BAD_GATEWAY,
                "model_unreachable",
            ),
            (
                Err(ModelError::MalformedResponse("garbage".into())),
                StatusCode::BAD_GATEWAY,
                "model_malformed_response",
            ),
            (Ok("   ".to_string()), StatusCode::BAD_GATEWAY, "empty_response"),
        ];

        for (reply, expected_status, expected_kind) in cases {
            let (status, body) = send(
                app_with(reply, Arc::new(InMemoryStore::new())),
                post_transform(r#"{"query":"hello","style":"casual"}"#),
            )
            .await;
            assert_eq!(status, expected_status);
            assert_eq!(body["error_kind"], expected_kind);
            assert!(body.get("response_text").is_none());
        }
    }

    #[tokio::test]
    async fn persistence_failure_still_returns_text() {
        let (status, body) = send(
            app_with(Ok("Hey there!".into()), Arc::new(BrokenStore)),
            post_transform(r#"{"query":"hello","style":"casual"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error_kind"], "persistence_failed_after_success");
        assert_eq!(body["response_text"], "Hey there!");
        assert_eq!(body["style"], "casual");
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn history_lists_newest_first() {
        let store = Arc::new(InMemoryStore::new());
        let app = app_with(Ok("Done.".into()), store);

        for query in ["first", "second", "third"] {
            let body = format!(r#"{{"query":"{query}","style":"casual"}}"#);
            let (status, _) = send(app.clone(), post_transform(&body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, page) = send(app.clone(), get("/v1/history?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 3);
        assert_eq!(page["limit"], 2);
        let entries = page["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["original_query"], "third");

        let (_, rest) = send(app, get("/v1/history?limit=2&offset=2")).await;
        assert_eq!(rest["entries"][0]["original_query"], "first");
    }

    #[tokio::test]
    async fn history_defaults_to_ten() {
        let (status, page) = send(app("unused"), get("/v1/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["limit"], 10);
        assert_eq!(page["offset"], 0);
        assert_eq!(page["entries"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn history_validates_bounds() {
        for uri in [
            "/v1/history?limit=0",
            "/v1/history?limit=101",
            "/v1/history?offset=-1",
            "/v1/history?limit=abc",
        ] {
            let (status, body) = send(app("unused"), get(uri)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert_eq!(body["error_kind"], "invalid_input");
        }
    }

    #[tokio::test]
    async fn history_reports_unavailable_store() {
        let (status, body) = send(
            app_with(Ok("unused".into()), Arc::new(BrokenStore)),
            get("/v1/history"),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error_kind"], "storage_unavailable");
    }

    #[tokio::test]
    async fn get_record_by_id() {
        let app = app("Hi!");
        let (_, created) = send(
            app.clone(),
            post_transform(r#"{"query":"hello","style":"casual"}"#),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, entry) = send(app.clone(), get(&format!("/v1/history/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["response_text"], "Hi!");

        let (status, body) = send(app, get("/v1/history/does-not-exist")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_kind"], "not_found");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let config = GatewayConfig {
            max_body_bytes: 64,
            ..GatewayConfig::default()
        };
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(ScriptedModel(Ok("unused".into()))),
            Arc::new(InMemoryStore::new()),
            OrchestratorSettings::default(),
        ));
        let app = build_router(Arc::new(GatewayState { orchestrator }), &config);

        let query = "x".repeat(500);
        let (status, body) = send(
            app,
            post_transform(&format!(r#"{{"query":"{query}","style":"casual"}}"#)),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error_kind"], "invalid_input");
    }

    #[test]
    fn every_kind_has_a_status() {
        assert_eq!(
            status_for(ErrorKind::PersistenceFailedAfterSuccess),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(ErrorKind::StorageWrite), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::EmptyResponse), StatusCode::BAD_GATEWAY);
    }
}
