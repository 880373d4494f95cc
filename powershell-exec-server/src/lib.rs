use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use powershell_exec::{ExecutionRequest, Executor, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExecuteRequest {
    pub code: String,
    /// Timeout in seconds; defaults to 300, 0 disables the timeout.
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Engine output; failures are strings starting with `"Error: "`.
    pub output: String,
}

#[derive(Clone)]
pub struct AppState {
    executor: Executor,
}

pub fn create_app() -> Router {
    let state = AppState {
        executor: Executor::new(),
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/execute", post(execute))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("Starting PowerShell execution server on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn execute(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteRequest>,
) -> Json<ExecuteResponse> {
    let request = ExecutionRequest::new(
        payload.code,
        payload.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
    );

    let output = state.executor.execute(request).await;
    Json(ExecuteResponse { output })
}
