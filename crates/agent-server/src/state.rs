//! Application State

use std::sync::Arc;

use agent_core::{McpSession, Orchestrator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Conversation orchestrator (owns the memoized context)
    pub orchestrator: Arc<Orchestrator>,

    /// MCP session, shared with the orchestrator
    pub session: Arc<dyn McpSession>,

    /// Default model when the request does not name one
    pub model: String,
}
