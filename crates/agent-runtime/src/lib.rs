//! # agent-runtime
//!
//! Runtime clients for the MCP support agent.
//!
//! ## Clients
//!
//! - **OpenAI**: chat-completions backend with function calling
//! - **MCP**: streamable HTTP JSON-RPC session to the capability
//!   provider
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{McpClient, OpenAiClient};
//!
//! let session = Arc::new(McpClient::from_env()?);
//! session.connect().await?;
//! let completion = Arc::new(OpenAiClient::from_env()?);
//! let orchestrator = Orchestrator::new(completion, session);
//! ```

pub mod mcp;
pub mod openai;

pub use mcp::{McpClient, McpConfig};
pub use openai::{OpenAiClient, OpenAiConfig};

// Re-export core types for convenience
pub use agent_core::{
    AgentError, AgentReply, ChatMessage, CompletionClient, McpSession, Orchestrator, Result, Role,
};
