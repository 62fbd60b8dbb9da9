//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// MCP transport/handshake failure during connect
    #[error("Connection error: {0}")]
    Connection(String),

    /// Operation requires a connected session
    #[error("Not connected to MCP server. Call connect() first.")]
    NotConnected,

    /// Releasing the MCP transport faulted
    #[error("Disconnect failed: {0}")]
    Disconnect(String),

    /// Listing tools/resources/prompts failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Tool invocation failed at the transport/protocol level.
    /// A provider-reported application error is NOT this variant;
    /// it arrives as a successful result with the error flag set.
    #[error("Tool call failed: {0}")]
    ToolCall(String),

    /// Resource read failed or URI unknown to the provider
    #[error("Resource read failed: {0}")]
    ResourceRead(String),

    /// Prompt rendering failed or prompt unknown
    #[error("Prompt retrieval failed: {0}")]
    Prompt(String),

    /// LLM completion call failed
    #[error("Completion error: {0}")]
    Completion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Check if error is a precondition violation the caller must fix
    /// (reconnect) rather than retry.
    pub fn is_precondition(&self) -> bool {
        matches!(self, AgentError::NotConnected)
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Connection(_) | AgentError::NotConnected => {
                "The support service is currently unavailable. Please try again.".into()
            }
            AgentError::Discovery(_) => {
                "The support service could not load its capabilities. Please try again.".into()
            }
            AgentError::Completion(_) => {
                "The AI service encountered an error. Please try again.".into()
            }
            AgentError::Config(msg) => format!("Configuration error: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
