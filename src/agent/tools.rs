// Tools and tool catalogs for agent function calling
//
// A `Tool` is anything an agent's model may call by name: a search binding or
// a whole specialist agent wrapped by `AgentTool`. Tools are grouped into a
// `ToolCatalog`, which is what an agent hands to the model (as OpenAI function
// definitions) and what executes the calls the model requests.
//
// Reference: https://platform.openai.com/docs/guides/function-calling
// OpenRouter Docs: https://openrouter.ai/docs/features/tool-calling

use crate::error::{Result, TripbotError};
use crate::tool_executor::ToolExecutor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Tool definition in OpenAI function calling format
///
/// # Example
/// ```json
/// {
///   "type": "function",
///   "function": {
///     "name": "planner_agent",
///     "description": "Plan or outline an itinerary ...",
///     "parameters": {
///       "type": "object",
///       "properties": {
///         "input": { "type": "string", "description": "..." }
///       },
///       "required": ["input"]
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Always "function" for function calling
    #[serde(rename = "type")]
    pub tool_type: String,

    /// The function definition
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,

    /// What this function does and when to use it; the model decides on this
    pub description: String,

    pub parameters: FunctionParameters,
}

/// Parameters schema for a function (JSON Schema format)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameters {
    /// Always "object" for parameter schemas
    #[serde(rename = "type")]
    pub param_type: String,

    pub properties: serde_json::Value,

    pub required: Vec<String>,
}

impl FunctionParameters {
    /// Schema with exactly one required string parameter
    pub fn single_string(name: &str, description: &str) -> Self {
        let mut properties = serde_json::Map::new();
        properties.insert(
            name.to_string(),
            serde_json::json!({
                "type": "string",
                "description": description
            }),
        );

        Self {
            param_type: "object".to_string(),
            properties: serde_json::Value::Object(properties),
            required: vec![name.to_string()],
        }
    }

    /// Name of the parameter carrying the tool input
    pub fn primary(&self) -> &str {
        self.required.first().map(String::as_str).unwrap_or("input")
    }
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, parameters: FunctionParameters) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }

    /// Describe a tool for the model
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self::new(tool.name(), tool.description(), tool.parameters())
    }
}

/// A named callable capability exposed to an agent's reasoning loop
///
/// Implementations must not share mutable state with other tools: the
/// orchestrator runs tools of one pass concurrently.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name within a catalog
    fn name(&self) -> &str;

    /// One-line capability description used for tool selection
    fn description(&self) -> &str;

    /// JSON schema of the arguments; one string argument by default
    fn parameters(&self) -> FunctionParameters {
        FunctionParameters::single_string("input", "The request for this tool")
    }

    /// Run the tool on its string input
    async fn invoke(&self, input: &str) -> Result<String>;

    /// Like `invoke`, also reporting searches that degraded along the way
    async fn execute(&self, input: &str) -> Result<ToolOutput> {
        Ok(ToolOutput::new(self.invoke(input).await?))
    }
}

/// Text a tool handed back plus the degradations it ran into
///
/// Degradations travel with the result so each caller sees only its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    /// e.g. "search_attractions: Real-time data unavailable"
    pub degraded: Vec<String>,
}

impl ToolOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            degraded: Vec::new(),
        }
    }

    pub fn with_degraded(mut self, note: impl Into<String>) -> Self {
        self.degraded.push(note.into());
        self
    }
}

/// Read-only set of tools with unique names
///
/// Built once at startup, then shared (it is cheap to clone: tools are
/// reference counted).
#[derive(Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolCatalog {
    /// Build a catalog, rejecting duplicate tool names
    ///
    /// # Errors
    /// - `ConfigError` when two tools share a name
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for tool in &tools {
            if !seen.insert(tool.name().to_string()) {
                return Err(TripbotError::ConfigError(format!(
                    "duplicate tool name '{}' in catalog",
                    tool.name()
                )));
            }
        }

        Ok(Self { tools })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function definitions for every tool, in catalog order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::from_tool(t.as_ref()))
            .collect()
    }
}

#[async_trait]
impl ToolExecutor for ToolCatalog {
    async fn execute_tool(&self, tool_name: &str, arguments: &str) -> Result<ToolOutput> {
        let tool = self.get(tool_name).ok_or_else(|| {
            TripbotError::ConfigError(format!("tool '{}' is not bound to this agent", tool_name))
        })?;

        let call = crate::llm::ToolCall::new("", tool_name, arguments);
        let input = call.argument(tool.parameters().primary());

        tool.execute(&input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool(&'static str);

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Echo the input back"
        }

        async fn invoke(&self, input: &str) -> Result<String> {
            Ok(format!("{}: {}", self.0, input))
        }
    }

    #[test]
    fn test_tool_definition_format() {
        let tool = EchoTool("echo");
        let def = ToolDefinition::from_tool(&tool);

        assert_eq!(def.tool_type, "function");
        assert_eq!(def.function.name, "echo");
        assert_eq!(def.function.parameters.param_type, "object");
        assert_eq!(def.function.parameters.required, vec!["input"]);
        assert!(def.function.parameters.properties.get("input").is_some());
    }

    #[test]
    fn test_catalog_rejects_duplicate_names() {
        let result = ToolCatalog::new(vec![Arc::new(EchoTool("a")), Arc::new(EchoTool("a"))]);

        match result {
            Err(TripbotError::ConfigError(msg)) => assert!(msg.contains("duplicate")),
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_catalog_definitions_keep_order() {
        let catalog =
            ToolCatalog::new(vec![Arc::new(EchoTool("b")), Arc::new(EchoTool("a"))]).unwrap();

        assert_eq!(catalog.names(), vec!["b", "a"]);
        let defs = catalog.definitions();
        assert_eq!(defs[0].function.name, "b");
        assert_eq!(defs[1].function.name, "a");
    }

    #[tokio::test]
    async fn test_execute_tool_extracts_primary_argument() {
        let catalog = ToolCatalog::new(vec![Arc::new(EchoTool("echo"))]).unwrap();

        let out = catalog
            .execute_tool("echo", r#"{"input": "Kyoto"}"#)
            .await
            .unwrap();
        assert_eq!(out.text, "echo: Kyoto");
        assert!(out.degraded.is_empty());
    }

    #[tokio::test]
    async fn test_execute_unbound_tool_fails() {
        let catalog = ToolCatalog::new(vec![Arc::new(EchoTool("echo"))]).unwrap();

        let result = catalog.execute_tool("search_local_tips", "{}").await;
        assert!(matches!(result, Err(TripbotError::ConfigError(_))));
    }
}
