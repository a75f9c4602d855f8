// Relay server — Axum endpoints that forward content to the AI gateway.
//
// Handlers are stateless: the only shared state is the gateway client and
// config, both immutable behind Arc. Every response, errors and preflight
// included, carries the same CORS headers.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::gateway::client::GatewayClient;
use crate::gateway::traits::ChatCompletion;

pub mod error;
pub mod handlers;

/// Headers browsers may send on cross-origin calls to the relay.
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Largest request body the relay buffers. Phone photos arrive as base64
/// data URLs, about 4/3 of the file size.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ChatCompletion>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn ChatCompletion>) -> Self {
        Self {
            gateway,
            config: Arc::new(config),
        }
    }
}

/// Start the relay server and block until it exits.
pub async fn run_server(config: Config, port: u16, bind: &str) -> Result<()> {
    if config.api_key.is_empty() {
        warn!("SAFEGUARD_API_KEY not set; analysis requests will fail with 500");
    }

    let gateway = GatewayClient::new(&config.gateway_url, &config.api_key)?;
    let state = AppState::new(config, Arc::new(gateway));
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("SafeGuard relay listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/analyze-text",
            post(handlers::analyze_text).options(preflight),
        )
        .route(
            "/analyze-image",
            post(handlers::analyze_image).options(preflight),
        )
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OPTIONS preflight: empty 200. The CORS headers come from the layers.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Liveness probe — always 200.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}
