//! HTTP API: simulation, downloads and agent routes.
//!
//! - `GET /simulate` runs one simulation and stores it as the latest result
//! - `GET /download/{json,txt,csv}` renders the latest result as a file
//! - `POST /agent/{ask,autotune,forecast,report}` asks the language model
//!   about the latest result
//! - `GET /health` liveness

mod error;
mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::Agent;
use crate::sim::clock::SiteClock;
use crate::sim::{LatestResult, Simulator};
use crate::telemetry;

pub use error::ApiError;
pub use types::{AskRequest, ErrorResponse, SimulateQuery};

/// State shared by all handlers.
///
/// Everything is read-only except the latest-result slot, which swaps whole
/// snapshots behind its own lock.
pub struct AppState {
    /// Weather, random draws and the model.
    pub simulator: Simulator,
    /// Most recent simulation; overwritten by each `/simulate`.
    pub latest: LatestResult,
    /// Language-model front door.
    pub agent: Agent,
    /// Supplies the simulated time of day and download timestamps.
    pub clock: SiteClock,
}

impl AppState {
    pub fn new(simulator: Simulator, agent: Agent, clock: SiteClock) -> Self {
        Self {
            simulator,
            latest: LatestResult::new(),
            agent,
            clock,
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/simulate", get(handlers::simulate))
        .route("/download/json", get(handlers::download_json))
        .route("/download/txt", get(handlers::download_txt))
        .route("/download/csv", get(handlers::download_csv))
        .route("/agent/ask", post(handlers::agent_ask))
        .route("/agent/autotune", post(handlers::agent_autotune))
        .route("/agent/forecast", post(handlers::agent_forecast))
        .route("/agent/report", post(handlers::agent_report))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds to `addr` and serves until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let agent_enabled = state.agent.is_enabled();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, agent_enabled, "API server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await
}
