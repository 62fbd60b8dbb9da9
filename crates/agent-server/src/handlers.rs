//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use agent_core::{ChatMessage, Role};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub mcp_connected: bool,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(rename = "toolsUsed")]
    pub tools_used: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub tools: Vec<agent_core::ToolDescriptor>,
    pub resources: Vec<agent_core::ResourceDescriptor>,
    pub prompts: Vec<agent_core::PromptDescriptor>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        mcp_connected: state.session.is_connected(),
        model: state.model.clone(),
    })
}

/// Main chat endpoint
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if payload.messages.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Messages array is required".into(),
                code: "EMPTY_MESSAGES".into(),
            }),
        ));
    }

    let messages: Vec<ChatMessage> = payload
        .messages
        .into_iter()
        .map(|m| ChatMessage::new(m.role, m.content))
        .collect();

    let model = payload.model.unwrap_or_else(|| state.model.clone());

    let reply = state
        .orchestrator
        .orchestrate(&messages, &model)
        .await
        .map_err(|e| {
            tracing::error!("Orchestration error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.user_message(),
                    code: "AGENT_ERROR".into(),
                }),
            )
        })?;

    Ok(Json(ChatResponse {
        message: reply.message,
        tools_used: reply.tools_used,
    }))
}

/// Capability listing endpoint: every tool, resource and prompt the
/// provider currently advertises.
pub async fn list_capabilities(
    State(state): State<AppState>,
) -> Result<Json<CapabilitiesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let discovery = tokio::try_join!(
        state.session.list_tools(),
        state.session.list_resources(),
        state.session.list_prompts(),
    );

    let (tools, resources, prompts) = discovery.map_err(|e| {
        tracing::error!("Capability discovery error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "DISCOVERY_ERROR".into(),
            }),
        )
    })?;

    Ok(Json(CapabilitiesResponse {
        tools,
        resources,
        prompts,
    }))
}
