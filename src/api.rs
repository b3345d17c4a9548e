//! HTTP boundary built on Axum.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | `{"message": ...}` |
//! | `GET /health` | model and rule summary |
//! | `POST /api/predict` | `{"review": ..., "sentiment": ...}` |
//!
//! An empty, whitespace-only or missing review is answered with 400 and
//! `{"error": "Empty review text"}`.

/// API error types mapped to HTTP status codes.
pub mod errors;
/// HTTP request handlers and application state.
pub mod handlers;
/// Request and response data transfer objects.
pub mod models;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::Result;
use handlers::AppState;

/// Build the router over a shared engine.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::banner))
        .route("/health", get(handlers::health))
        .route("/api/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until the process receives Ctrl-C.
pub async fn serve(state: AppState, server: &ServerConfig) -> Result<()> {
    let addr = server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "sentiment api listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("sentiment api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
