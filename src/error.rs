// Centralized error handling using thiserror for type-safe error management
//
// Every failure a planning cycle can surface maps to one variant here. The
// variants group into four classes (see `ErrorKind`): retrieval problems are
// absorbed close to the search provider, timeouts and validation failures
// travel up to the orchestrator, configuration problems stop the process at
// startup.

use thiserror::Error;

/// Error class used to decide how far an error is allowed to propagate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Search provider unreachable, timed out or returned malformed data
    Retrieval,
    /// A specialist agent or the orchestrator exceeded its time budget
    AgentTimeout,
    /// The synthesized answer did not match the travel output schema
    Validation,
    /// Missing credentials, bad bindings or unusable input
    Configuration,
    /// Everything else (transport failures, cancellation, turn cap)
    Runtime,
}

/// Main error type for Tripbot
///
/// Usage:
///     fn load_agents(dir: &Path) -> Result<Vec<AgentConfig>> {
///         let content = std::fs::read_to_string(dir.join("planner.json"))?;
///         // IoError converted automatically
///         Ok(parse(&content)?)
///     }
#[derive(Debug, Error)]
pub enum TripbotError {
    /// Search provider failure
    ///
    /// Never reaches the caller of a planning cycle: search bindings turn it
    /// into a degraded tool result.
    #[error("Retrieval error: {0}")]
    RetrievalError(String),

    /// A specialist agent or reasoning call ran out of time
    #[error("Agent '{agent}' timed out after {seconds}s")]
    AgentTimeout { agent: String, seconds: u64 },

    /// The synthesized answer is missing fields or has empty ones
    #[error("Validation error: missing or empty field(s): {}", .fields.join(", "))]
    ValidationError { fields: Vec<String> },

    /// Configuration loading or validation error
    ///
    /// Duplicate tool names, unknown tool bindings, malformed agent files.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The trip request cannot be processed at all (empty text, bad hints)
    #[error("Invalid trip request: {0}")]
    InvalidRequest(String),

    /// The caller cancelled the cycle; partial results were discarded
    #[error("Trip planning cancelled")]
    Cancelled,

    /// The orchestrator did not settle on an answer within its turn budget
    #[error("Orchestrator exceeded {0} reasoning turns without a final answer")]
    MaxTurnsExceeded(usize),

    /// LLM adapter or communication error
    #[error("LLM error: {0}")]
    LlmError(String),

    /// Environment variable not found or invalid
    ///
    /// Missing API keys end up here.
    #[error("Environment error: {0}")]
    EnvError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

impl TripbotError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TripbotError::RetrievalError(_) => ErrorKind::Retrieval,
            TripbotError::AgentTimeout { .. } => ErrorKind::AgentTimeout,
            TripbotError::ValidationError { .. } => ErrorKind::Validation,
            TripbotError::ConfigError(_)
            | TripbotError::InvalidRequest(_)
            | TripbotError::EnvError(_) => ErrorKind::Configuration,
            _ => ErrorKind::Runtime,
        }
    }

    /// Convenience constructor for validation failures
    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TripbotError::ValidationError {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Type alias for Result with TripbotError
pub type Result<T> = std::result::Result<T, TripbotError>;

// The agent definition loader is anyhow-based; its errors are configuration
// problems by the time they reach this type.
impl From<anyhow::Error> for TripbotError {
    fn from(err: anyhow::Error) -> Self {
        TripbotError::ConfigError(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TripbotError::AgentTimeout {
            agent: "budget_agent".to_string(),
            seconds: 30,
        };
        assert_eq!(err.to_string(), "Agent 'budget_agent' timed out after 30s");

        let err = TripbotError::validation(["duration", "tips"]);
        assert_eq!(
            err.to_string(),
            "Validation error: missing or empty field(s): duration, tips"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            TripbotError::RetrievalError("down".into()).kind(),
            ErrorKind::Retrieval
        );
        assert_eq!(
            TripbotError::InvalidRequest("empty".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            TripbotError::EnvError("TAVILY_API_KEY".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(TripbotError::Cancelled.kind(), ErrorKind::Runtime);
        assert_eq!(
            TripbotError::validation(["cost"]).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TripbotError = io_err.into();

        match err {
            TripbotError::IoError(_) => {}
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_anyhow_becomes_config_error() {
        let err: TripbotError = anyhow::anyhow!("bad agent file").into();
        assert!(matches!(err, TripbotError::ConfigError(ref m) if m.contains("bad agent file")));
    }
}
