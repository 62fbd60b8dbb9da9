//! OpenAI-Compatible Completion Client
//!
//! Implementation of `CompletionClient` against a chat-completions
//! endpoint. Tool schemas are sent as `function` tools with automatic
//! tool choice; tool-call arguments arrive as a JSON string and are
//! parsed into an object before they reach the orchestration loop.

use agent_core::{
    error::{AgentError, Result},
    message::{ChatMessage, FunctionCall, ToolCallRequest},
    provider::{AssistantReply, CompletionClient, FunctionSchema},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// OpenAI client configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API key (bearer token)
    pub api_key: String,

    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// Build from environment variables. `OPENAI_API_KEY` is
    /// required; `OPENAI_BASE_URL` defaults to the public endpoint.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::Config("OPENAI_API_KEY is not set".into()))?;
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());

        Ok(Self {
            api_key,
            base_url,
            timeout_secs: 120,
        })
    }
}

/// OpenAI-compatible chat-completions client
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { http, config }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(OpenAiConfig::from_env()?))
    }

    /// Convert agent messages to the wire format. Tool-call arguments
    /// are re-serialized to the JSON string the API expects.
    fn convert_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
                tool_calls: if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        m.tool_calls
                            .iter()
                            .map(|call| WireToolCall {
                                id: call.id.clone(),
                                call_type: call.call_type.clone(),
                                function: WireFunctionCall {
                                    name: call.function.name.clone(),
                                    arguments: call.function.arguments.to_string(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.tool_call_id.clone(),
                name: m.name.clone(),
            })
            .collect()
    }

    /// Convert the wire response to an assistant reply. Malformed
    /// argument payloads degrade to an empty object so a single bad
    /// call cannot poison the turn.
    fn decode_reply(response: ChatCompletionResponse) -> Result<AssistantReply> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Completion("response contained no choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| ToolCallRequest {
                id: call.id,
                call_type: call.call_type,
                function: FunctionCall {
                    name: call.function.name,
                    arguments: serde_json::from_str(&call.function.arguments)
                        .unwrap_or_else(|_| serde_json::json!({})),
                },
            })
            .collect();

        Ok(AssistantReply {
            content: choice.message.content,
            tool_calls,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        functions: &[FunctionSchema],
    ) -> Result<AssistantReply> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = ChatCompletionRequest {
            model,
            messages: Self::convert_messages(messages),
            tools: functions
                .iter()
                .map(|f| WireTool {
                    tool_type: "function",
                    function: f,
                })
                .collect(),
            tool_choice: if functions.is_empty() { None } else { Some("auto") },
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Completion(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::Completion(format!(
                "status={status} body={text}"
            )));
        }

        let decoded: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Completion(format!("failed to parse response: {e}")))?;

        Self::decode_reply(decoded)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: &'a FunctionSchema,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded argument object
    arguments: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_reply_parses_argument_string() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "search_products",
                            "arguments": "{\"query\":\"mouse\"}"
                        }
                    }]
                }
            }]
        }))
        .unwrap();

        let reply = OpenAiClient::decode_reply(response).unwrap();
        assert!(reply.content.is_none());
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].function.name, "search_products");
        assert_eq!(reply.tool_calls[0].function.arguments, json!({"query": "mouse"}));
    }

    #[test]
    fn test_decode_reply_tolerates_malformed_arguments() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": "",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "get_order", "arguments": "{not json"}
                    }]
                }
            }]
        }))
        .unwrap();

        let reply = OpenAiClient::decode_reply(response).unwrap();
        assert_eq!(reply.tool_calls[0].function.arguments, json!({}));
    }

    #[test]
    fn test_decode_reply_requires_a_choice() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        let err = OpenAiClient::decode_reply(response).unwrap_err();
        assert!(matches!(err, AgentError::Completion(_)));
    }

    #[test]
    fn test_convert_messages_stringifies_arguments() {
        let messages = vec![ChatMessage::assistant_with_calls(
            "",
            vec![ToolCallRequest {
                id: "call_1".into(),
                call_type: "function".into(),
                function: FunctionCall {
                    name: "get_product".into(),
                    arguments: json!({"sku": "SKU123"}),
                },
            }],
        )];

        let wire = OpenAiClient::convert_messages(&messages);
        let calls = wire[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.arguments, "{\"sku\":\"SKU123\"}");
    }

    #[test]
    fn test_request_omits_tools_when_empty() {
        let body = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: Vec::new(),
            tools: Vec::new(),
            tool_choice: None,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
    }
}
