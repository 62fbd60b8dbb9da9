//! Orchestration Loop
//!
//! Drives the bounded multi-turn exchange between the completion
//! backend and the MCP session: discover capabilities once, let the
//! model request invocations, execute them in emission order, feed
//! results back, and terminate with a final answer or a fallback.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::Result;
use crate::mcp::{McpSession, PromptDescriptor, ResourceDescriptor, ToolDescriptor};
use crate::message::{ChatMessage, ToolCallRequest};
use crate::prompt::build_system_prompt;
use crate::provider::{CompletionClient, FunctionSchema};
use crate::schema::functions_from_tools;

/// Hard ceiling on completion iterations per orchestration. Protects
/// against a model that never stops requesting tools.
pub const MAX_TOOL_ITERATIONS: usize = 5;

const ITERATION_LIMIT_REPLY: &str = "I apologize, but I encountered an issue processing your request. Please try rephrasing your question.";

const EMPTY_COMPLETION_REPLY: &str = "I apologize, but I was unable to generate a response.";

/// Cached aggregate of everything discovery produced. Built at most
/// once per orchestrator lifetime; capability changes on the provider
/// side are not picked up until the process restarts.
#[derive(Clone, Debug)]
pub struct OrchestrationContext {
    pub tools: Vec<ToolDescriptor>,
    pub resources: Vec<ResourceDescriptor>,
    pub prompts: Vec<PromptDescriptor>,
    pub functions: Vec<FunctionSchema>,
    pub system_prompt: String,
}

/// Final outcome of one orchestration
#[derive(Clone, Debug)]
pub struct AgentReply {
    /// Natural-language answer for the end user
    pub message: String,

    /// Tool names in invocation order, duplicates preserved
    pub tools_used: Vec<String>,
}

/// The conversation orchestrator.
///
/// Stateless across `orchestrate` calls apart from the memoized
/// context; callers supply the prior turns verbatim each time.
pub struct Orchestrator {
    completion: Arc<dyn CompletionClient>,
    session: Arc<dyn McpSession>,
    context: OnceCell<OrchestrationContext>,
    max_iterations: usize,
}

impl Orchestrator {
    /// Create a new orchestrator over a completion backend and a
    /// connected MCP session.
    pub fn new(completion: Arc<dyn CompletionClient>, session: Arc<dyn McpSession>) -> Self {
        Self {
            completion,
            session,
            context: OnceCell::new(),
            max_iterations: MAX_TOOL_ITERATIONS,
        }
    }

    /// Get the orchestration context, building it on first use.
    ///
    /// Construction is single-flight: concurrent first callers share
    /// one discovery pass.
    pub async fn context(&self) -> Result<&OrchestrationContext> {
        self.context.get_or_try_init(|| self.build_context()).await
    }

    async fn build_context(&self) -> Result<OrchestrationContext> {
        let (tools, resources, prompts) = tokio::try_join!(
            self.session.list_tools(),
            self.session.list_resources(),
            self.session.list_prompts(),
        )?;

        let functions = functions_from_tools(&tools);
        let system_prompt = build_system_prompt(self.session.as_ref(), &resources).await;

        tracing::info!(
            tools = tools.len(),
            resources = resources.len(),
            prompts = prompts.len(),
            "Discovered MCP capabilities"
        );

        Ok(OrchestrationContext {
            tools,
            resources,
            prompts,
            functions,
            system_prompt,
        })
    }

    /// Run the conversation loop on the caller-supplied turns.
    ///
    /// Completion and discovery faults are fatal to this call; a
    /// failing tool invocation is converted into an error-text tool
    /// turn and the loop continues.
    pub async fn orchestrate(&self, messages: &[ChatMessage], model: &str) -> Result<AgentReply> {
        let context = self.context().await?;
        let mut tools_used: Vec<String> = Vec::new();

        let mut conversation: Vec<ChatMessage> = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(context.system_prompt.clone()));
        conversation.extend_from_slice(messages);

        for _ in 0..self.max_iterations {
            let reply = self
                .completion
                .complete(model, &conversation, &context.functions)
                .await?;

            if reply.tool_calls.is_empty() {
                return Ok(AgentReply {
                    message: reply
                        .content
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.into()),
                    tools_used,
                });
            }

            conversation.push(ChatMessage::assistant_with_calls(
                reply.content.unwrap_or_default(),
                reply.tool_calls.clone(),
            ));

            for call in &reply.tool_calls {
                if call.call_type != "function" {
                    continue;
                }
                conversation.push(self.execute_call(call, &mut tools_used).await);
            }
        }

        Ok(AgentReply {
            message: ITERATION_LIMIT_REPLY.into(),
            tools_used,
        })
    }

    /// Execute one requested invocation and produce its tool turn.
    async fn execute_call(
        &self,
        call: &ToolCallRequest,
        tools_used: &mut Vec<String>,
    ) -> ChatMessage {
        let name = &call.function.name;
        tools_used.push(name.clone());

        tracing::debug!(tool = %name, "Executing tool");

        let content = match self
            .session
            .call_tool(name, call.function.arguments.clone())
            .await
        {
            Ok(result) => result.joined_text(),
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "Tool invocation failed");
                format!("Error: {}", e)
            }
        };

        ChatMessage::tool(content, call.id.clone(), name.clone())
    }
}
