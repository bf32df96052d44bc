// Application configuration
//
// Credentials come from the environment (a .env file is honoured); tuning
// knobs have defaults and can be overridden the same way. Agent prompt and
// binding overrides live in JSON files under AGENTS_DIR.

use crate::agent::{AgentConfig, AgentLoader};
use crate::error::{Result, TripbotError};
use crate::llm::LlmProvider;
use crate::orchestrator::OrchestratorSettings;
use crate::search::SearchSettings;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loaded once at startup
///
/// Usage:
///     let config = AppConfig::load()?;
///     let api = TripPlannerApiBuilder::from_config(&config)?.build()?;
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: LlmProvider,

    /// Text-generation credential
    pub llm_api_key: String,

    /// Search credential
    pub search_api_key: String,

    /// Model used by every agent without its own override
    pub model: String,

    /// Endpoint override for proxies or self-hosted gateways
    pub api_base: Option<String>,

    /// Directory of JSON agent definitions
    pub agents_dir: Option<PathBuf>,

    pub orchestrator: OrchestratorSettings,
    pub search: SearchSettings,
    pub agent_timeout: Duration,
    pub llm_timeout: Duration,
}

impl AppConfig {
    /// Load `.env` (if present), then read the environment
    ///
    /// # Errors
    /// - `EnvError` when a credential is missing
    /// - `ConfigError` when a value cannot be parsed
    pub fn load() -> Result<Self> {
        // Load .env file (ignore if not found)
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Read configuration from the process environment only
    ///
    /// Environment Variables:
    /// - LLM_PROVIDER (optional): `openrouter` (default) or `openai`
    /// - OPENROUTER_API_KEY / OPENAI_API_KEY (required, per provider)
    /// - TAVILY_API_KEY (required)
    /// - MODEL, LLM_API_BASE, AGENTS_DIR (optional)
    /// - MAX_TURNS, SYNTHESIS_RETRIES, AGENT_RETRIES, SEARCH_MAX_RESULTS,
    ///   SEARCH_TIMEOUT_SECS, AGENT_TIMEOUT_SECS, LLM_TIMEOUT_SECS (optional)
    pub fn from_env() -> Result<Self> {
        let provider = match optional_var("LLM_PROVIDER") {
            Some(value) => value
                .parse::<LlmProvider>()
                .map_err(|e| TripbotError::ConfigError(format!("LLM_PROVIDER: {}", e)))?,
            None => LlmProvider::OpenRouter,
        };

        let llm_api_key = required_var(provider.default_env_var())?;
        let search_api_key = required_var("TAVILY_API_KEY")?;

        let model = optional_var("MODEL").unwrap_or_else(|| provider.default_model().to_string());

        let defaults = OrchestratorSettings::default();
        let orchestrator = OrchestratorSettings {
            max_turns: parse_var("MAX_TURNS", defaults.max_turns)?,
            synthesis_retries: parse_var("SYNTHESIS_RETRIES", defaults.synthesis_retries)?,
            agent_retries: parse_var("AGENT_RETRIES", defaults.agent_retries)?,
        };
        if orchestrator.max_turns == 0 {
            return Err(TripbotError::ConfigError(
                "MAX_TURNS must be at least 1".to_string(),
            ));
        }

        let search_defaults = SearchSettings::default();
        let search = SearchSettings {
            max_results: parse_var("SEARCH_MAX_RESULTS", search_defaults.max_results)?,
            timeout: Duration::from_secs(parse_var(
                "SEARCH_TIMEOUT_SECS",
                search_defaults.timeout.as_secs(),
            )?),
        };
        if search.max_results == 0 {
            return Err(TripbotError::ConfigError(
                "SEARCH_MAX_RESULTS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            provider,
            llm_api_key,
            search_api_key,
            model,
            api_base: optional_var("LLM_API_BASE"),
            agents_dir: optional_var("AGENTS_DIR").map(PathBuf::from),
            orchestrator,
            search,
            agent_timeout: Duration::from_secs(parse_var("AGENT_TIMEOUT_SECS", 180)?),
            llm_timeout: Duration::from_secs(parse_var("LLM_TIMEOUT_SECS", 120)?),
        })
    }

    /// Agent definitions found under `agents_dir` (empty when unset)
    pub fn load_agent_overrides(&self) -> Result<Vec<AgentConfig>> {
        let Some(dir) = &self.agents_dir else {
            return Ok(Vec::new());
        };

        let mut loader = AgentLoader::new();
        loader.add_search_path(dir);
        loader
            .load_all()
            .map_err(|e| TripbotError::ConfigError(format!("Failed to load agent configs: {:#}", e)))
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_var(name: &str) -> Result<String> {
    optional_var(name)
        .ok_or_else(|| TripbotError::EnvError(format!("{} environment variable not set", name)))
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| TripbotError::ConfigError(format!("{}='{}': {}", name, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serialize config tests to avoid env var conflicts
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 15] = [
        "LLM_PROVIDER",
        "OPENROUTER_API_KEY",
        "OPENAI_API_KEY",
        "TAVILY_API_KEY",
        "MODEL",
        "LLM_API_BASE",
        "AGENTS_DIR",
        "MAX_TURNS",
        "SYNTHESIS_RETRIES",
        "AGENT_RETRIES",
        "SEARCH_MAX_RESULTS",
        "SEARCH_TIMEOUT_SECS",
        "AGENT_TIMEOUT_SECS",
        "LLM_TIMEOUT_SECS",
        "RUST_LOG",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_requires_llm_key() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("TAVILY_API_KEY", "tvly-test");

        match AppConfig::from_env() {
            Err(TripbotError::EnvError(msg)) => assert!(msg.contains("OPENROUTER_API_KEY")),
            other => panic!("Expected EnvError, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    fn test_requires_search_key() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("OPENROUTER_API_KEY", "sk-test");

        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));

        clear_env();
    }

    #[test]
    fn test_defaults() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("OPENROUTER_API_KEY", "sk-test");
        std::env::set_var("TAVILY_API_KEY", "tvly-test");

        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.provider, LlmProvider::OpenRouter);
        assert_eq!(config.model, "openai/gpt-4.1-mini");
        assert_eq!(config.orchestrator, OrchestratorSettings::default());
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.agent_timeout, Duration::from_secs(180));
        assert!(config.agents_dir.is_none());
        assert!(config.load_agent_overrides().unwrap().is_empty());

        clear_env();
    }

    #[test]
    fn test_openai_provider_uses_its_key() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("LLM_PROVIDER", "openai");
        std::env::set_var("OPENAI_API_KEY", "sk-openai");
        std::env::set_var("TAVILY_API_KEY", "tvly-test");
        std::env::set_var("MAX_TURNS", "4");

        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.llm_api_key, "sk-openai");
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.orchestrator.max_turns, 4);

        clear_env();
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("OPENROUTER_API_KEY", "sk-test");
        std::env::set_var("TAVILY_API_KEY", "tvly-test");
        std::env::set_var("AGENT_TIMEOUT_SECS", "three minutes");

        match AppConfig::from_env() {
            Err(TripbotError::ConfigError(msg)) => assert!(msg.contains("AGENT_TIMEOUT_SECS")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }

        clear_env();
    }
}
