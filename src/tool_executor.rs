// Tool execution abstraction for agent delegation
// Lets an agent loop run the calls its model requests without knowing what
// sits behind a tool name

use crate::agent::ToolOutput;
use crate::error::Result;
use async_trait::async_trait;

/// Trait for executing tool calls requested by a model
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool call and return its text and any degradations
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool to call (e.g., "search_attractions")
    /// * `arguments` - Raw JSON arguments produced by the model
    async fn execute_tool(&self, tool_name: &str, arguments: &str) -> Result<ToolOutput>;
}
