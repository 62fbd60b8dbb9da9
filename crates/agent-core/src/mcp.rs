//! MCP Session Contract
//!
//! Capability descriptors and the session trait the orchestration
//! loop drives. Every operation except `connect`/`disconnect`/
//! `is_connected` requires a connected session and fails fast with
//! `AgentError::NotConnected` otherwise.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Input schema of a tool, as advertised by the provider.
///
/// The shape is trusted as-is; only `properties` and `required`
/// participate in the function-schema translation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputSchema {
    /// JSON Schema type (normally "object")
    #[serde(rename = "type", default)]
    pub schema_type: String,

    /// Named argument properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,

    /// Required property names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// A callable capability advertised by the provider
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique tool name within a session
    pub name: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Accepted arguments
    #[serde(default)]
    pub input_schema: InputSchema,
}

/// Addressable provider-side content, fetched on demand
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Unique URI
    pub uri: String,

    /// Display name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// One content block of a resource read
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub uri: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Textual payload, if the resource is text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Base64 binary payload, if the resource is binary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

/// A named argument of a prompt template
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,
}

/// A parameterized prompt template the provider can render
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromptDescriptor {
    /// Unique prompt name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<PromptArgument>,
}

/// One role-tagged message of a rendered prompt
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: serde_json::Value,
}

/// One content part of a tool invocation result
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,

    /// Text payload for text-typed blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Any further block fields (images, annotations, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Result of a tool invocation.
///
/// `is_error` is the provider-reported application error flag; a
/// transport/protocol fault never produces a result at all.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    #[serde(default)]
    pub content: Vec<ContentBlock>,

    #[serde(default)]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Join all content parts into one text body. Non-text parts are
    /// serialized to their JSON representation.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|block| match &block.text {
                Some(text) => text.clone(),
                None => serde_json::to_string(block).unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One logical connection to an MCP capability provider.
///
/// Implementations own the transport exclusively; callers only ever
/// see typed descriptors and results. Discovery returns the full set
/// the provider currently advertises and may be repeated freely.
#[async_trait]
pub trait McpSession: Send + Sync {
    /// Establish the transport and protocol handshake. On failure any
    /// partial handle is released and the session stays disconnected.
    async fn connect(&self) -> Result<()>;

    /// Release the transport. No-op when already disconnected.
    async fn disconnect(&self) -> Result<()>;

    /// Pure status query
    fn is_connected(&self) -> bool;

    /// List all tools the provider advertises
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    /// List all resources the provider advertises
    async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>>;

    /// List all prompts the provider advertises
    async fn list_prompts(&self) -> Result<Vec<PromptDescriptor>>;

    /// Invoke a tool with structured arguments
    async fn call_tool(&self, name: &str, arguments: serde_json::Value)
    -> Result<ToolCallResult>;

    /// Read the first content block of a resource
    async fn read_resource(&self, uri: &str) -> Result<ResourceContent>;

    /// Render a named prompt template
    async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<Vec<PromptMessage>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_descriptor_wire_casing() {
        let descriptor: ToolDescriptor = serde_json::from_value(json!({
            "name": "search_products",
            "description": "Find products by query",
            "inputSchema": {
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }
        }))
        .unwrap();

        assert_eq!(descriptor.name, "search_products");
        assert_eq!(descriptor.input_schema.schema_type, "object");
        assert_eq!(
            descriptor.input_schema.required.as_deref(),
            Some(&["query".to_string()][..])
        );
    }

    #[test]
    fn test_joined_text_mixes_text_and_serialized_blocks() {
        let result: ToolCallResult = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "SKU123 $19.99"},
                {"type": "image", "data": "aGk=", "mimeType": "image/png"}
            ],
            "isError": false
        }))
        .unwrap();

        let joined = result.joined_text();
        let mut lines = joined.lines();
        assert_eq!(lines.next(), Some("SKU123 $19.99"));
        assert!(lines.next().unwrap().contains("\"type\":\"image\""));
    }

    #[test]
    fn test_tool_result_defaults() {
        let result: ToolCallResult = serde_json::from_value(json!({})).unwrap();
        assert!(result.content.is_empty());
        assert!(!result.is_error);
    }
}
