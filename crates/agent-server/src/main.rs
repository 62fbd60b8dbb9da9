//! MCP Support Agent HTTP Server
//!
//! Axum-based server exposing the conversation orchestrator over a
//! REST API. The MCP session is constructed and connected here, once,
//! and torn down on shutdown; nothing in the request path manages
//! connection lifecycle.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{McpSession, Orchestrator};
use agent_runtime::{McpClient, OpenAiClient};

use crate::handlers::{chat_handler, health_check, list_capabilities};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Connect the MCP session before serving anything
    let session: Arc<dyn McpSession> = Arc::new(McpClient::from_env()?);
    session.connect().await?;
    tracing::info!("✓ Connected to MCP server");

    // Completion backend
    let completion = Arc::new(OpenAiClient::from_env()?);

    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    tracing::info!("Using model: {}", model);

    // Build application state
    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(completion, session.clone())),
        session: session.clone(),
        model,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .route("/api/tools", get(list_capabilities))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 support-agent server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health     - Health check");
    tracing::info!("  POST /api/chat   - Send conversation");
    tracing::info!("  GET  /api/tools  - List MCP capabilities");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Explicit teardown of the provider session
    if let Err(e) = session.disconnect().await {
        tracing::warn!("MCP disconnect failed: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
