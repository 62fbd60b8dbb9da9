//! MCP Streamable HTTP Session
//!
//! `McpSession` implementation speaking JSON-RPC 2.0 over HTTP POST.
//! `connect` performs the initialize handshake and captures the
//! session id header when the server issues one; every subsequent
//! request echoes it. The transport handle is owned exclusively by
//! this client and never exposed to callers.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use agent_core::{
    error::{AgentError, Result},
    mcp::{
        McpSession, PromptDescriptor, PromptMessage, ResourceContent, ResourceDescriptor,
        ToolCallResult, ToolDescriptor,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SESSION_HEADER: &str = "Mcp-Session-Id";

/// MCP client configuration
#[derive(Clone, Debug)]
pub struct McpConfig {
    /// Server endpoint URL
    pub server_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl McpConfig {
    /// Build from environment variables. `MCP_SERVER_URL` is required.
    pub fn from_env() -> Result<Self> {
        let server_url = std::env::var("MCP_SERVER_URL")
            .map_err(|_| AgentError::Config("MCP_SERVER_URL is not set".into()))?;

        Ok(Self {
            server_url,
            timeout_secs: 30,
        })
    }
}

/// State of an established connection
struct SessionHandle {
    /// Session id issued by the server, echoed on every request
    session_id: Option<String>,
}

/// MCP session client over streamable HTTP
pub struct McpClient {
    http: reqwest::Client,
    config: McpConfig,
    next_id: AtomicU64,
    session: RwLock<Option<SessionHandle>>,
}

impl McpClient {
    /// Create an unconnected client for the given endpoint
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::from_config(McpConfig {
            server_url: server_url.into(),
            timeout_secs: 30,
        })
    }

    /// Create from configuration
    pub fn from_config(config: McpConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            config,
            next_id: AtomicU64::new(1),
            session: RwLock::new(None),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(McpConfig::from_env()?))
    }

    fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Session id of the active connection, or `NotConnected`.
    /// The lock is released before any I/O happens.
    fn connected_session_id(&self) -> Result<Option<String>> {
        match self.session.read().unwrap().as_ref() {
            Some(handle) => Ok(handle.session_id.clone()),
            None => Err(AgentError::NotConnected),
        }
    }

    /// Send one JSON-RPC request and return its `result` value.
    /// Failures are reported as plain strings; callers wrap them in
    /// the error variant matching the operation.
    async fn post_rpc(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> std::result::Result<Value, String> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_request_id(),
            method,
            params,
        };

        let mut http_request = self.http.post(&self.config.server_url).json(&request);
        if let Some(sid) = session_id {
            http_request = http_request.header(SESSION_HEADER, sid);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let rpc: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse JSON response: {e}"))?;

        if let Some(error) = rpc.error {
            return Err(format!("MCP error {}: {}", error.code, error.message));
        }

        rpc.result.ok_or_else(|| "No result in response".into())
    }

    /// Send one JSON-RPC notification (no id, no response body).
    async fn post_notification(
        &self,
        method: &str,
        session_id: Option<&str>,
    ) -> std::result::Result<(), String> {
        let notification = JsonRpcNotification {
            jsonrpc: "2.0",
            method,
        };

        let mut http_request = self.http.post(&self.config.server_url).json(&notification);
        if let Some(sid) = session_id {
            http_request = http_request.header(SESSION_HEADER, sid);
        }

        http_request
            .send()
            .await
            .map_err(|e| format!("Notification failed: {e}"))?;

        Ok(())
    }
}

#[async_trait]
impl McpSession for McpClient {
    async fn connect(&self) -> Result<()> {
        // Drop any previous handle before handshaking again.
        *self.session.write().unwrap() = None;

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_request_id(),
            method: "initialize",
            params: Some(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": "customer-support-agent",
                    "version": env!("CARGO_PKG_VERSION")
                }
            })),
        };

        let response = self
            .http
            .post(&self.config.server_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::Connection(format!("initialize request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AgentError::Connection(format!(
                "initialize failed: HTTP {}",
                response.status()
            )));
        }

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let rpc: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Connection(format!("invalid initialize response: {e}")))?;

        if let Some(error) = rpc.error {
            return Err(AgentError::Connection(format!(
                "initialize rejected: {}",
                error.message
            )));
        }

        self.post_notification("notifications/initialized", session_id.as_deref())
            .await
            .map_err(AgentError::Connection)?;

        *self.session.write().unwrap() = Some(SessionHandle { session_id });
        tracing::info!(url = %self.config.server_url, "Connected to MCP server");

        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let Some(handle) = self.session.write().unwrap().take() else {
            return Ok(());
        };

        // Best-effort session termination; servers without explicit
        // session management simply ignore the DELETE.
        if let Some(sid) = handle.session_id {
            self.http
                .delete(&self.config.server_url)
                .header(SESSION_HEADER, &sid)
                .send()
                .await
                .map_err(|e| AgentError::Disconnect(e.to_string()))?;
        }

        tracing::info!("Disconnected from MCP server");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.session.read().unwrap().is_some()
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let sid = self.connected_session_id()?;
        let result = self
            .post_rpc("tools/list", Some(json!({})), sid.as_deref())
            .await
            .map_err(AgentError::Discovery)?;

        let parsed: ToolsListResult = serde_json::from_value(result)
            .map_err(|e| AgentError::Discovery(format!("Failed to parse tools list: {e}")))?;
        Ok(parsed.tools)
    }

    async fn list_resources(&self) -> Result<Vec<ResourceDescriptor>> {
        let sid = self.connected_session_id()?;
        let result = self
            .post_rpc("resources/list", Some(json!({})), sid.as_deref())
            .await
            .map_err(AgentError::Discovery)?;

        let parsed: ResourcesListResult = serde_json::from_value(result)
            .map_err(|e| AgentError::Discovery(format!("Failed to parse resources list: {e}")))?;
        Ok(parsed.resources)
    }

    async fn list_prompts(&self) -> Result<Vec<PromptDescriptor>> {
        let sid = self.connected_session_id()?;
        let result = self
            .post_rpc("prompts/list", Some(json!({})), sid.as_deref())
            .await
            .map_err(AgentError::Discovery)?;

        let parsed: PromptsListResult = serde_json::from_value(result)
            .map_err(|e| AgentError::Discovery(format!("Failed to parse prompts list: {e}")))?;
        Ok(parsed.prompts)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallResult> {
        let sid = self.connected_session_id()?;
        let result = self
            .post_rpc(
                "tools/call",
                Some(json!({"name": name, "arguments": arguments})),
                sid.as_deref(),
            )
            .await
            .map_err(AgentError::ToolCall)?;

        serde_json::from_value(result)
            .map_err(|e| AgentError::ToolCall(format!("Failed to parse tool result: {e}")))
    }

    async fn read_resource(&self, uri: &str) -> Result<ResourceContent> {
        let sid = self.connected_session_id()?;
        let result = self
            .post_rpc("resources/read", Some(json!({"uri": uri})), sid.as_deref())
            .await
            .map_err(AgentError::ResourceRead)?;

        let parsed: ResourceReadResult = serde_json::from_value(result)
            .map_err(|e| AgentError::ResourceRead(format!("Failed to parse contents: {e}")))?;

        parsed
            .contents
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::ResourceRead(format!("resource {uri} has no content")))
    }

    async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<Vec<PromptMessage>> {
        let sid = self.connected_session_id()?;

        let mut params = json!({"name": name});
        if let Some(args) = arguments {
            params["arguments"] = json!(args);
        }

        let result = self
            .post_rpc("prompts/get", Some(params), sid.as_deref())
            .await
            .map_err(AgentError::Prompt)?;

        let parsed: PromptGetResult = serde_json::from_value(result)
            .map_err(|e| AgentError::Prompt(format!("Failed to parse prompt messages: {e}")))?;
        Ok(parsed.messages)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcNotification<'a> {
    jsonrpc: &'static str,
    method: &'a str,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: Option<Value>,
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[allow(dead_code)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ToolsListResult {
    #[serde(default)]
    tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ResourcesListResult {
    #[serde(default)]
    resources: Vec<ResourceDescriptor>,
}

#[derive(Debug, Deserialize)]
struct PromptsListResult {
    #[serde(default)]
    prompts: Vec<PromptDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ResourceReadResult {
    #[serde(default)]
    contents: Vec<ResourceContent>,
}

#[derive(Debug, Deserialize)]
struct PromptGetResult {
    #[serde(default)]
    messages: Vec<PromptMessage>,
}
