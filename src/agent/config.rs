use super::{AgentConfig, DEFAULT_MAX_TURNS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON agent definition
///
/// Lets a deployment replace a built-in agent's prompt, model or tool
/// bindings without recompiling. A file whose `name` matches a built-in agent
/// id overrides that agent.
///
/// ```json
/// {
///   "name": "budget_agent",
///   "displayName": "Budget Agent",
///   "description": "Calculate and estimate the cost of a trip ...",
///   "model": "${BUDGET_MODEL:-openai/gpt-4.1-mini}",
///   "instruction": "You estimate costs for lodging, food, transport ...",
///   "tools": ["search_accommodation_prices", "search_transport_costs"],
///   "parameters": { "temperature": 0.3 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonAgentConfig {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: String,

    /// Unique agent identifier (used as agent ID and tool name)
    pub name: String,

    #[serde(rename = "displayName")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Capability description shown to the orchestrator
    #[serde(default)]
    pub description: String,

    /// Model identifier (supports ${ENV_VAR} syntax)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// System prompt defining agent behavior
    pub instruction: String,

    /// Search tools bound to this agent
    #[serde(default)]
    pub tools: Vec<String>,

    #[serde(default)]
    pub parameters: ModelParameters,

    #[serde(rename = "maxTurns")]
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}

fn default_enabled() -> bool {
    true
}

/// Model generation parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelParameters {
    /// Sampling temperature (0.0 = deterministic, 2.0 = very random)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(rename = "maxTokens")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl JsonAgentConfig {
    /// Load agent configuration from JSON file
    ///
    /// # Errors
    /// - File I/O errors (file not found, permission denied)
    /// - JSON parsing errors (invalid syntax, missing required fields)
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read agent config from {:?}", path))?;

        Self::from_json(&content)
            .with_context(|| format!("Failed to parse agent config from {:?}", path))
    }

    /// Parse agent configuration from JSON string
    ///
    /// # Errors
    /// - Missing required fields (name, instruction)
    pub fn from_json(json: &str) -> Result<Self> {
        let config: JsonAgentConfig =
            serde_json::from_str(json).context("Failed to deserialize agent configuration")?;

        Ok(config)
    }

    /// Validate configuration for common issues
    ///
    /// Tool names are checked later, when the agent is bound to the search
    /// toolbox.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Agent name cannot be empty");
        }

        if self.instruction.trim().is_empty() {
            anyhow::bail!("Agent '{}' has an empty instruction", self.name);
        }

        if let Some(temp) = self.parameters.temperature {
            if !(0.0..=2.0).contains(&temp) {
                anyhow::bail!("Temperature must be between 0.0 and 2.0, got {}", temp);
            }
        }

        if self.max_turns == 0 {
            anyhow::bail!("Agent '{}' must allow at least one turn", self.name);
        }

        if let Some(model) = &self.model {
            if resolve_env_var(model)?.trim().is_empty() {
                anyhow::bail!("Model identifier cannot be empty");
            }
        }

        Ok(())
    }

    /// Validate and convert to the runtime configuration
    pub fn into_agent_config(self) -> Result<AgentConfig> {
        self.validate()?;

        let model = self.model.as_deref().map(resolve_env_var).transpose()?;

        Ok(AgentConfig {
            name: self.display_name.unwrap_or_else(|| self.name.clone()),
            id: self.name,
            description: self.description,
            instructions: self.instruction,
            model,
            temperature: self.parameters.temperature,
            max_tokens: self.parameters.max_tokens,
            tools: self.tools,
            max_turns: self.max_turns,
            enabled: self.enabled,
        })
    }
}

/// Resolve environment variable syntax in a string
///
/// Supported formats:
/// - `${VAR_NAME}` - Required variable (error if not found)
/// - `${VAR_NAME:-default_value}` - Optional with default
/// - Plain strings are returned unchanged
fn resolve_env_var(value: &str) -> Result<String> {
    if !value.starts_with("${") || !value.ends_with('}') {
        return Ok(value.to_string());
    }

    let var_expr = &value[2..value.len() - 1];

    if let Some(pos) = var_expr.find(":-") {
        let var_name = &var_expr[..pos];
        let default_value = &var_expr[pos + 2..];

        match std::env::var(var_name) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default_value.to_string()),
        }
    } else {
        std::env::var(var_expr)
            .with_context(|| format!("Environment variable '{}' not found", var_expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let json = r#"{
            "name": "planner_agent",
            "instruction": "Plan day by day"
        }"#;

        let config = JsonAgentConfig::from_json(json).unwrap();
        assert_eq!(config.name, "planner_agent");
        assert_eq!(config.version, "1.0");
        assert_eq!(config.max_turns, DEFAULT_MAX_TURNS);
        assert!(config.tools.is_empty());
        assert!(config.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "version": "1.0",
            "name": "budget_agent",
            "displayName": "Budget Agent",
            "description": "Estimate costs",
            "model": "openai/gpt-4.1",
            "instruction": "Estimate costs",
            "tools": ["search_accommodation_prices", "search_transport_costs"],
            "parameters": {"temperature": 0.3, "maxTokens": 1500},
            "maxTurns": 4,
            "enabled": true
        }"#;

        let config = JsonAgentConfig::from_json(json)
            .unwrap()
            .into_agent_config()
            .unwrap();

        assert_eq!(config.id, "budget_agent");
        assert_eq!(config.name, "Budget Agent");
        assert_eq!(config.model.as_deref(), Some("openai/gpt-4.1"));
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_tokens, Some(1500));
        assert_eq!(config.max_turns, 4);
        assert_eq!(config.tools.len(), 2);
    }

    #[test]
    fn test_missing_instruction_fails_to_parse() {
        let result = JsonAgentConfig::from_json(r#"{"name": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_invalid_temperature() {
        let mut config =
            JsonAgentConfig::from_json(r#"{"name": "x", "instruction": "y"}"#).unwrap();
        config.parameters.temperature = Some(3.0);

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Temperature"));
    }

    #[test]
    fn test_validate_zero_turns() {
        let config =
            JsonAgentConfig::from_json(r#"{"name": "x", "instruction": "y", "maxTurns": 0}"#)
                .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_env_var_plain_string() {
        assert_eq!(resolve_env_var("plain_string").unwrap(), "plain_string");
    }

    #[test]
    fn test_resolve_env_var_with_value() {
        std::env::set_var("TRIPBOT_TEST_MODEL_VAR", "openai/gpt-4.1");
        assert_eq!(
            resolve_env_var("${TRIPBOT_TEST_MODEL_VAR}").unwrap(),
            "openai/gpt-4.1"
        );
        std::env::remove_var("TRIPBOT_TEST_MODEL_VAR");
    }

    #[test]
    fn test_resolve_env_var_with_default() {
        let result = resolve_env_var("${TRIPBOT_MISSING_VAR:-openai/gpt-4.1-mini}").unwrap();
        assert_eq!(result, "openai/gpt-4.1-mini");
    }

    #[test]
    fn test_resolve_env_var_missing_required() {
        let result = resolve_env_var("${TRIPBOT_DEFINITELY_MISSING_VAR}");
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
