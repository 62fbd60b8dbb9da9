//! LLM Completion Client
//!
//! Interface to the chat-completions backend. The orchestration loop
//! works exclusively through this trait so any OpenAI-compatible
//! endpoint (or an in-memory stub) can drive it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{ChatMessage, ToolCallRequest};

/// Function-calling schema derived from a tool descriptor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Function name, identical to the tool name
    pub name: String,

    /// Description shown to the model
    pub description: String,

    /// Parameter object schema
    pub parameters: FunctionParameters,
}

/// Parameters of a function schema, always an object schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FunctionParameters {
    #[serde(rename = "type")]
    pub schema_type: String,

    pub properties: serde_json::Map<String, serde_json::Value>,

    pub required: Vec<String>,
}

/// One assistant reply from the completion backend
#[derive(Clone, Debug, Default)]
pub struct AssistantReply {
    /// Natural-language content, if any
    pub content: Option<String>,

    /// Tool invocations the model requested, in emission order
    pub tool_calls: Vec<ToolCallRequest>,
}

impl AssistantReply {
    /// Reply with content only (a final answer)
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Reply requesting tool invocations
    pub fn with_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }
}

/// Strategy trait for chat-completions backends.
///
/// Tool selection is always left to the model ("auto" tool choice);
/// failures are fatal to the current orchestration and never retried
/// here.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit the full turn sequence plus the function schemas and
    /// return the assistant's next turn.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        functions: &[FunctionSchema],
    ) -> Result<AssistantReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_schema_serialization() {
        let schema = FunctionSchema {
            name: "search_products".into(),
            description: "Find products".into(),
            parameters: FunctionParameters {
                schema_type: "object".into(),
                properties: serde_json::Map::new(),
                required: Vec::new(),
            },
        };

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["parameters"]["type"], "object");
        assert!(json["parameters"]["properties"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_assistant_reply_text() {
        let reply = AssistantReply::text("done");
        assert_eq!(reply.content.as_deref(), Some("done"));
        assert!(reply.tool_calls.is_empty());
    }
}
