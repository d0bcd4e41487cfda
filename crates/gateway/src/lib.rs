//! HTTP gateway for Ledgerbrief.
//!
//! One POST endpoint does the real work: `/generate` accepts an enquiry,
//! runs retrieval, generation, structuring and rendering, and dispatches
//! the finished report by email. The rest of the surface is liveness
//! probes for the hosting platform.
//!
//! Built on Axum.

pub mod generate;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ledgerbrief_config::AppConfig;
use ledgerbrief_core::delivery::Dispatcher;
use ledgerbrief_delivery::MailjetDispatcher;
use ledgerbrief_knowledge::{KnowledgeIndex, Retriever};
use ledgerbrief_pipeline::Generator;

/// Shared application state for the gateway.
///
/// Everything here is built once at startup and immutable afterwards; the
/// knowledge index in particular is loaded before the server binds and
/// never reloaded.
pub struct GatewayState {
    pub config: AppConfig,
    pub generator: Generator,
    pub retriever: Retriever,
    pub dispatcher: Arc<dyn Dispatcher>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// CORS admits exactly one browser origin (the intake form), POST plus
/// preflight only.
pub fn build_router(state: SharedState) -> Router {
    let origin = state
        .config
        .gateway
        .allowed_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("https://www.ledgerbrief.uk"));

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ping", post(ping_handler))
        .route("/generate", post(generate::generate_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// The knowledge index is loaded fail-open: a missing or corrupt index
/// logs a warning and the service answers without retrieved context
/// rather than refusing to start.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let router = ledgerbrief_providers::build_from_config(&config);
    let provider = router
        .default()
        .ok_or("no generation provider configured")?;

    let index = match KnowledgeIndex::load(
        &config.knowledge.index_path,
        &config.knowledge.metadata_path,
    ) {
        Ok(index) => Some(index),
        Err(e) => {
            warn!(error = %e, "Knowledge index unavailable, continuing without retrieval");
            None
        }
    };

    let retriever = Retriever::new(
        index,
        provider.clone(),
        config.generation.embedding_model.clone(),
        config.knowledge.data_dir.clone(),
        config.knowledge.top_k,
    );
    let generator = Generator::new(provider, config.generation.clone());

    if !config.delivery.has_credentials() {
        warn!("Mail vendor credentials missing, dispatches will be rejected by the vendor");
    }
    let dispatcher: Arc<dyn Dispatcher> = Arc::new(MailjetDispatcher::new(&config.delivery));

    let state = Arc::new(GatewayState {
        config,
        generator,
        retriever,
        dispatcher,
    });
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ─── Probes ─────────────────────────────────────────────────────────────────

async fn root_handler() -> &'static str {
    "Ledgerbrief API is running"
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
struct PingResponse {
    message: &'static str,
}

async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, RecordingDispatcher};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use ledgerbrief_pipeline::test_support::SequentialMockProvider;
    use tower::ServiceExt;

    fn probe_router() -> (Router, tempfile::TempDir) {
        let provider = Arc::new(SequentialMockProvider::scripted(&[]));
        let dispatcher = Arc::new(RecordingDispatcher::with_vendor_status(200));
        let (state, dir) = test_state(provider, dispatcher);
        (build_router(state), dir)
    }

    #[tokio::test]
    async fn root_announces_the_service() {
        let (app, _dir) = probe_router();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Ledgerbrief API is running");
    }

    #[tokio::test]
    async fn health_reports_ok_and_version() {
        let (app, _dir) = probe_router();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let (app, _dir) = probe_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "pong");
    }

    #[tokio::test]
    async fn generate_requires_a_body() {
        let (app, _dir) = probe_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate")
                    .header("content-type", "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
