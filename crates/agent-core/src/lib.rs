//! # agent-core
//!
//! Core orchestration logic bridging a chat-completions LLM with an
//! MCP capability provider.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Orchestrator                            │
//! │  ┌─────────────┐  ┌──────────────┐  ┌────────────────────┐   │
//! │  │   Schema    │  │    System    │  │  CompletionClient  │   │
//! │  │   Adapter   │──│Prompt Builder│──│     (Strategy)     │   │
//! │  └─────────────┘  └──────────────┘  └────────────────────┘   │
//! │         │                 │                                  │
//! │         └────────┬────────┘                                  │
//! │            ┌─────▼──────┐                                    │
//! │            │ McpSession │                                    │
//! │            └────────────┘                                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `McpSession` and `CompletionClient` traits enable swapping the
//! MCP transport and the LLM backend without changing the loop.

pub mod error;
pub mod mcp;
pub mod message;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod schema;

pub use error::{AgentError, Result};
pub use mcp::{
    McpSession, PromptDescriptor, ResourceContent, ResourceDescriptor, ToolCallResult,
    ToolDescriptor,
};
pub use message::{ChatMessage, Role, ToolCallRequest};
pub use orchestrator::{AgentReply, OrchestrationContext, Orchestrator};
pub use provider::{AssistantReply, CompletionClient, FunctionSchema};
pub use schema::functions_from_tools;
