// Agent framework: role-specific reasoning units with their own tool catalog
//
// Module Organization:
// - tools.rs: Tool trait, ToolCatalog and OpenAI function definitions
// - as_tool.rs: AgentTool, which presents a whole agent as a single tool
// - config.rs: JSON agent definition files
// - loader.rs: directory-based discovery of agent definition files
// - Core Agent and AgentConfig types defined in this file

pub mod as_tool;
pub mod config;
pub mod loader;
pub mod tools;

use crate::error::{Result, TripbotError};
use crate::events::{AgentStatus, EventBus, EventKind};
use crate::llm::{LlmAdapter, LlmRequest, Message};
use crate::tool_executor::ToolExecutor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub use as_tool::AgentTool;
pub use config::{JsonAgentConfig, ModelParameters};
pub use loader::AgentLoader;
pub use tools::{
    FunctionDefinition, FunctionParameters, Tool, ToolCatalog, ToolDefinition, ToolOutput,
};

/// Default number of model turns an agent may spend before it must answer
pub const DEFAULT_MAX_TURNS: usize = 6;

/// Returned instead of an empty final answer
pub const EMPTY_ANSWER_NOTE: &str =
    "No detailed answer could be produced for this part of the trip; real-time data may be missing.";

/// Runtime configuration for an agent
///
/// Created once at startup (built-in presets or JSON files) and never changed
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique identifier; also the tool name when the agent is wrapped
    pub id: String,

    /// Display name for the agent
    pub name: String,

    /// One-line capability description shown to a delegating agent
    pub description: String,

    /// Role instructions (system prompt)
    pub instructions: String,

    /// Model override; `None` uses the adapter's default model
    pub model: Option<String>,

    pub temperature: Option<f32>,

    pub max_tokens: Option<u32>,

    /// Names of the tools this agent may call
    pub tools: Vec<String>,

    /// Model turns before the agent is forced to answer
    pub max_turns: usize,

    /// Whether this agent is currently enabled
    pub enabled: bool,
}

impl AgentConfig {
    /// Create a new agent configuration
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            instructions: String::new(),
            model: None,
            temperature: None,
            max_tokens: None,
            tools: Vec::new(),
            max_turns: DEFAULT_MAX_TURNS,
            enabled: true,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_instructions(mut self, instructions: &str) -> Self {
        self.instructions = instructions.to_string();
        self
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// A reasoning unit: instructions, an LLM and a private tool catalog
///
/// `run` is one logical thread of reasoning: tool calls requested in a turn
/// are executed one after another, in the order the model listed them.
pub struct Agent {
    config: AgentConfig,
    llm: Arc<dyn LlmAdapter>,
    tools: ToolCatalog,
    llm_timeout: Duration,
    events: Option<Arc<EventBus>>,
}

impl Agent {
    /// Create an agent
    ///
    /// # Errors
    /// - `ConfigError` when the catalog does not hold exactly the tools the
    ///   configuration names
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmAdapter>, tools: ToolCatalog) -> Result<Self> {
        let mut bound: Vec<&str> = tools.names();
        let mut wanted: Vec<&str> = config.tools.iter().map(String::as_str).collect();
        bound.sort_unstable();
        wanted.sort_unstable();

        if bound != wanted {
            return Err(TripbotError::ConfigError(format!(
                "agent '{}' expects tools [{}] but was bound to [{}]",
                config.id,
                wanted.join(", "),
                bound.join(", ")
            )));
        }

        Ok(Self {
            config,
            llm,
            tools,
            llm_timeout: Duration::from_secs(120),
            events: None,
        })
    }

    /// Time budget for each model call
    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolCatalog {
        &self.tools
    }

    fn set_status(&self, status: AgentStatus) {
        if let Some(events) = &self.events {
            events.emit(
                &self.config.id,
                EventKind::AgentStatusChange {
                    agent_id: self.config.id.clone(),
                    status,
                },
            );
        }
    }

    /// One model call under the agent's time budget
    async fn complete(&self, messages: &[Message], allow_tools: bool) -> Result<crate::llm::LlmResponse> {
        let mut request = LlmRequest::new(messages.to_vec())
            .with_model(self.config.model.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);
        if allow_tools {
            request = request.with_tools(self.tools.definitions());
        }

        tokio::time::timeout(self.llm_timeout, self.llm.complete_chat(request))
            .await
            .map_err(|_| TripbotError::AgentTimeout {
                agent: self.config.id.clone(),
                seconds: self.llm_timeout.as_secs(),
            })?
    }

    /// Answer a sub-query, calling bound tools as the model decides
    ///
    /// The last permitted turn is sent without tools so the model has to
    /// answer. Tool failures are reported back to the model as tool results.
    /// A non-blank final answer is returned exactly as the model wrote it.
    pub async fn run(&self, sub_query: &str) -> Result<String> {
        Ok(self.respond(sub_query).await?.text)
    }

    /// `run`, also returning the search degradations hit while answering
    pub async fn respond(&self, sub_query: &str) -> Result<ToolOutput> {
        self.set_status(AgentStatus::Thinking);
        let mut degraded = Vec::new();

        let mut messages = Vec::new();
        if !self.config.instructions.is_empty() {
            messages.push(Message::system(self.config.instructions.clone()));
        }
        messages.push(Message::user(sub_query));

        let max_turns = self.config.max_turns.max(1);

        for turn in 0..max_turns {
            let allow_tools = !self.tools.is_empty() && turn + 1 < max_turns;

            let response = match self.complete(&messages, allow_tools).await {
                Ok(response) => response,
                Err(e) => {
                    self.set_status(AgentStatus::Error(e.to_string()));
                    return Err(e);
                }
            };

            if !response.has_tool_calls() {
                self.set_status(AgentStatus::Idle);

                let text = if response.content.trim().is_empty() {
                    tracing::warn!("Agent '{}' produced an empty answer", self.config.id);
                    EMPTY_ANSWER_NOTE.to_string()
                } else {
                    response.content
                };
                return Ok(ToolOutput {
                    text,
                    degraded,
                });
            }

            tracing::debug!(
                "Agent '{}' turn {}: {} tool call(s)",
                self.config.id,
                turn + 1,
                response.tool_calls.len()
            );

            messages.push(Message::assistant_tool_calls(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                self.set_status(AgentStatus::ExecutingTool(call.name.clone()));

                let output = match self.tools.execute_tool(&call.name, &call.arguments).await {
                    Ok(output) => {
                        degraded.extend(output.degraded);
                        output.text
                    }
                    Err(e) => {
                        tracing::warn!("Agent '{}' tool '{}' failed: {}", self.config.id, call.name, e);
                        format!("Tool error: {}", e)
                    }
                };

                messages.push(Message::tool(call.id.clone(), output));
            }

            self.set_status(AgentStatus::Thinking);
        }

        // Unreachable in practice: the final turn carries no tools
        self.set_status(AgentStatus::Idle);
        Ok(ToolOutput {
            text: EMPTY_ANSWER_NOTE.to_string(),
            degraded,
        })
    }
}
