//! Axum web server implementation for webpad.

use std::net::SocketAddr;

use axum::{
    extract::{ws::WebSocketUpgrade, State},
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes::api::{api_routes, preview_routes};
use super::routes::static_files::{serve_index, serve_static_file};
use super::state::WebAppState;
use super::ws::handle_websocket;
use crate::config::ServerSettings;
use crate::identity::Viewer;

/// Server configuration options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Enable CORS for development (allows any origin).
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_permissive: true,
        }
    }
}

impl From<&ServerSettings> for ServerConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            cors_permissive: settings.cors_permissive,
        }
    }
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    sessions: usize,
}

/// Health check endpoint handler.
async fn health(State(state): State<WebAppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        sessions: state.sessions().len(),
    })
}

/// WebSocket upgrade handler.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebAppState>,
    viewer: Viewer,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state, viewer))
}

/// Build the Axum router with all routes.
pub fn build_router(state: WebAppState, cors_permissive: bool) -> Router {
    let identity_header = HeaderName::try_from(state.core().config().identity.header.as_str())
        .unwrap_or(HeaderName::from_static(crate::identity::DEFAULT_IDENTITY_HEADER));

    // Build CORS layer
    let cors = if cors_permissive {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, identity_header])
    } else {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, identity_header])
    };

    let core_routes = Router::new().route("/health", get(health));

    Router::new()
        .nest("/api", core_routes.merge(api_routes()))
        .merge(preview_routes())
        .route("/ws", get(ws_handler))
        .route("/assets/{*path}", get(serve_static_file))
        .route("/", get(serve_index))
        .fallback(serve_index)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server.
///
/// This starts the Axum server and blocks until shutdown.
pub async fn run_server(state: WebAppState, config: ServerConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = build_router(state, config.cors_permissive);

    tracing::info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
