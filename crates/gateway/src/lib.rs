//! HTTP gateway for KASA.
//!
//! Exposes the liveness routes and `POST /ask`. Everything interesting
//! happens in `kasa-tutor`; this crate only maps HTTP to the tutor and back.
//!
//! Built on Axum.

pub mod ask;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use kasa_config::{AppConfig, GatewayConfig};
use kasa_tutor::Tutor;

/// Banner served on `GET /`.
pub const ROOT_BANNER: &str = "AI KASA backend is running ✅";

/// Shared application state for the gateway. Immutable after startup.
pub struct AppState {
    pub tutor: Tutor,
    /// Answer provider failures with 200 instead of 500.
    pub mask_provider_failures: bool,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS (any origin unless `cors_origins` is set)
/// - Request body size limit
/// - HTTP trace logging
pub fn build_router(state: SharedState, gateway: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ask", post(ask::ask_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(gateway.max_body_bytes))
        .layer(cors_layer(&gateway.cors_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

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
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// Fails before binding when no provider credential is configured.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let provider = kasa_providers::build_from_config(&config)?;
    let tutor = Tutor::from_config(&config, provider);

    let state = Arc::new(AppState {
        tutor,
        mask_provider_failures: config.gateway.mask_provider_failures,
    });
    let app = build_router(state, &config.gateway);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    info!(
        addr = %addr,
        model = %config.model,
        timeout_secs = config.request_timeout_secs,
        "Gateway starting"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// --- Handlers ---

async fn root_handler() -> &'static str {
    ROOT_BANNER
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
        }),
    )
        .into_response()
}
