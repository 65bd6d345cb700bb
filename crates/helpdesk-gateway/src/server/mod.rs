//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod response;
mod state;

pub use handler::socket_handler;
pub use response::{ApiError, ApiResult};
pub use state::GatewayState;

use crate::connection::ConnectionManager;
use crate::hub::{spawn_hub, RelayHub};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use helpdesk_common::{AppConfig, AppError, CorsConfig};
use helpdesk_core::PresenceEntry;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/socket", get(socket_handler))
        .route("/health", get(health_check))
        .route("/presence", get(presence))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Current presence list, same shape as the `getUser` payload
async fn presence(State(state): State<GatewayState>) -> ApiResult<Json<Vec<PresenceEntry>>> {
    let snapshot = state.hub().snapshot().await?;
    Ok(Json(snapshot.into_inner()))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    let cors = create_cors_layer(&state.config().cors, state.config().app.env.is_production());

    create_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if config.allowed_origins.is_empty() {
        if is_production {
            tracing::warn!("CORS: No allowed origins configured, allowing any origin");
        }
        return base_layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS: Allowing {} configured origins", origins.len());
    base_layer.allow_origin(AllowOrigin::list(origins))
}

/// Spawn the relay hub and create `GatewayState`
///
/// Must be called inside a Tokio runtime.
pub fn create_gateway_state(config: AppConfig) -> (GatewayState, JoinHandle<()>) {
    let connection_manager = ConnectionManager::new_shared();
    let hub = RelayHub::new(connection_manager.clone());
    let (handle, task) = spawn_hub(hub, config.relay.hub_buffer);

    (GatewayState::new(handle, connection_manager, config), task)
}

/// Serve the app on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/socket", addr);

    serve(listener, app).await
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let (state, _hub_task) = create_gateway_state(config);
    let app = create_app(state);

    run_server(app, addr).await
}
