//! HTTP API gateway for StyleCraft.
//!
//! Exposes the transformation pipeline and its history over REST, plus
//! liveness and readiness probes. Built on Axum.

pub mod api_v1;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{Router, extract::State, response::Json, routing::get};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use stylecraft_config::{AppConfig, GatewayConfig};
use stylecraft_pipeline::{Orchestrator, OrchestratorSettings};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: probes at the root, the API under `/v1`.
///
/// Layers applied:
/// - Request body size limit
/// - CORS for the configured origins
/// - HTTP trace logging
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/health/ready", get(ready_handler))
        .with_state(state.clone())
        .nest("/v1", api_v1::v1_router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.allowed_origins))
                .layer(DefaultBodyLimit::max(config.max_body_bytes)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Start the gateway HTTP server and serve until Ctrl-C.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let model = stylecraft_providers::build_from_config(&config.model)?;
    let store = stylecraft_store::open(&config.storage).await?;
    info!(
        model_backend = model.name(),
        model = model.model(),
        store = store.name(),
        "Pipeline dependencies ready"
    );

    let orchestrator = Arc::new(Orchestrator::new(
        model,
        store,
        OrchestratorSettings::from_config(&config),
    ));
    let app = build_router(Arc::new(GatewayState { orchestrator }), &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
}

async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to StyleCraft AI Backend!",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct DependencyStatus {
    name: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    model: DependencyStatus,
    store: DependencyStatus,
}

async fn ready_handler(State(state): State<SharedState>) -> (StatusCode, Json<ReadyResponse>) {
    let model = state.orchestrator.model();
    let model_status = match model.health_check().await {
        Ok(true) => DependencyStatus {
            name: model.name().to_string(),
            ok: true,
            detail: None,
        },
        Ok(false) => DependencyStatus {
            name: model.name().to_string(),
            ok: false,
            detail: Some("backend answered but is not healthy".into()),
        },
        Err(e) => DependencyStatus {
            name: model.name().to_string(),
            ok: false,
            detail: Some(e.to_string()),
        },
    };

    let store = state.orchestrator.store();
    let store_status = match store.count().await {
        Ok(_) => DependencyStatus {
            name: store.name().to_string(),
            ok: true,
            detail: None,
        },
        Err(e) => DependencyStatus {
            name: store.name().to_string(),
            ok: false,
            detail: Some(e.to_string()),
        },
    };

    let ready = model_status.ok && store_status.ok;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadyResponse {
            status: if ready { "ready" } else { "not_ready" },
            model: model_status,
            store: store_status,
        }),
    )
}
