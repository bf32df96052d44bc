// API layer for programmatic access to the trip planner
// The CLI is a thin shell over this; tests drive it with scripted adapters.

use crate::agent::{Agent, AgentConfig, AgentTool, Tool, ToolCatalog};
use crate::agents::{create_travel_agent, default_specialists, TRAVEL_AGENT_ID};
use crate::config::AppConfig;
use crate::conversation::ConversationTurn;
use crate::error::{Result, TripbotError};
use crate::events::{Event, EventBus};
use crate::llm::{create_adapter, LlmAdapter};
use crate::orchestrator::{
    DelegationPlanner, LlmPlanner, OrchestrationOutcome, Orchestrator, OrchestratorSettings,
};
use crate::request::TripRequest;
use crate::search::{SearchProvider, SearchSettings, SearchToolbox, TavilySearch};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Core API for planning trips
///
/// Each call to `plan_trip` is an independent cycle; the history kept here is
/// for display only and is never fed back to the agents.
pub struct TripPlannerApi {
    /// Event bus for pub/sub communication
    event_bus: Arc<EventBus>,

    orchestrator: Orchestrator,

    /// Turns of completed cycles, oldest first
    history: VecDeque<ConversationTurn>,

    /// Maximum turns to keep in history
    max_history_size: usize,
}

impl TripPlannerApi {
    /// Plan a trip; runs until done or failed
    pub async fn plan_trip(&mut self, request: &TripRequest) -> Result<OrchestrationOutcome> {
        self.plan_trip_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Plan a trip that can be aborted through `cancel`
    pub async fn plan_trip_with_cancel(
        &mut self,
        request: &TripRequest,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationOutcome> {
        let outcome = self.orchestrator.run(request, cancel).await?;

        self.history
            .extend(outcome.transcript.turns().iter().cloned());
        while self.history.len() > self.max_history_size {
            self.history.pop_front();
        }

        Ok(outcome)
    }

    /// Clear the session history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> Vec<ConversationTurn> {
        self.history.iter().cloned().collect()
    }

    /// Names of the specialists the orchestrator can call
    pub fn specialists(&self) -> Vec<&str> {
        self.orchestrator.tools().names()
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        self.orchestrator.settings()
    }

    /// Subscribe to progress events
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe()
    }
}

/// Builder for creating TripPlannerApi instances with configuration
pub struct TripPlannerApiBuilder {
    event_bus: Option<Arc<EventBus>>,
    llm_adapter: Option<Arc<dyn LlmAdapter>>,
    search_provider: Option<Arc<dyn SearchProvider>>,
    planner: Option<Arc<dyn DelegationPlanner>>,
    travel_agent: AgentConfig,
    specialists: Vec<AgentConfig>,
    orchestrator_settings: OrchestratorSettings,
    search_settings: SearchSettings,
    agent_timeout: Duration,
    llm_timeout: Duration,
    max_history_size: usize,
}

impl TripPlannerApiBuilder {
    /// Create a new builder with the built-in agents and default limits
    pub fn new() -> Self {
        Self {
            event_bus: None,
            llm_adapter: None,
            search_provider: None,
            planner: None,
            travel_agent: create_travel_agent(),
            specialists: default_specialists(),
            orchestrator_settings: OrchestratorSettings::default(),
            search_settings: SearchSettings::default(),
            agent_timeout: Duration::from_secs(180),
            llm_timeout: Duration::from_secs(120),
            max_history_size: 50,
        }
    }

    /// Builder wired to the real providers named in `config`
    ///
    /// # Errors
    /// - `ConfigError` when an agent definition file is invalid
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let llm: Arc<dyn LlmAdapter> = Arc::from(create_adapter(
            config.provider,
            config.llm_api_key.clone(),
            config.api_base.clone(),
            Some(config.model.clone()),
        ));
        let search: Arc<dyn SearchProvider> =
            Arc::new(TavilySearch::new(config.search_api_key.clone()));

        let mut builder = Self::new()
            .llm_adapter(llm)
            .search_provider(search)
            .orchestrator_settings(config.orchestrator)
            .search_settings(config.search)
            .agent_timeout(config.agent_timeout)
            .llm_timeout(config.llm_timeout);

        for agent in config.load_agent_overrides()? {
            builder = builder.agent_override(agent);
        }

        Ok(builder)
    }

    /// Set the event bus (optional - will create one if not provided)
    pub fn event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Set the LLM adapter shared by all agents
    pub fn llm_adapter(mut self, adapter: Arc<dyn LlmAdapter>) -> Self {
        self.llm_adapter = Some(adapter);
        self
    }

    pub fn search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search_provider = Some(provider);
        self
    }

    /// Replace the LLM-backed delegation planner
    pub fn planner(mut self, planner: Arc<dyn DelegationPlanner>) -> Self {
        self.planner = Some(planner);
        self
    }

    /// Replace a built-in agent with the same id, or add a new specialist
    pub fn agent_override(mut self, config: AgentConfig) -> Self {
        if config.id == TRAVEL_AGENT_ID {
            self.travel_agent = config;
        } else if let Some(existing) = self.specialists.iter_mut().find(|a| a.id == config.id) {
            *existing = config;
        } else {
            self.specialists.push(config);
        }
        self
    }

    pub fn orchestrator_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.orchestrator_settings = settings;
        self
    }

    pub fn search_settings(mut self, settings: SearchSettings) -> Self {
        self.search_settings = settings;
        self
    }

    /// Time budget for one specialist invocation
    pub fn agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    /// Time budget for one model call
    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    /// Set maximum history size
    pub fn max_history_size(mut self, size: usize) -> Self {
        self.max_history_size = size;
        self
    }

    /// Build the TripPlannerApi instance
    ///
    /// # Errors
    /// - `ConfigError` for a missing adapter or provider, an unknown search
    ///   binding, or two specialists with the same id
    pub fn build(self) -> Result<TripPlannerApi> {
        let event_bus = self.event_bus.unwrap_or_else(|| Arc::new(EventBus::new()));

        let llm = self.llm_adapter.ok_or_else(|| {
            TripbotError::ConfigError("LLM adapter must be provided".to_string())
        })?;
        let search = self.search_provider.ok_or_else(|| {
            TripbotError::ConfigError("Search provider must be provided".to_string())
        })?;

        let toolbox =
            SearchToolbox::with_events(search, self.search_settings, Arc::clone(&event_bus));

        let mut specialists: Vec<Arc<dyn Tool>> = Vec::new();
        for config in self.specialists.into_iter().filter(|c| c.enabled) {
            let catalog = toolbox.bind(&config.tools)?;
            let agent = Agent::new(config, Arc::clone(&llm), catalog)?
                .with_llm_timeout(self.llm_timeout)
                .with_events(Arc::clone(&event_bus));

            tracing::debug!(
                "Registered specialist '{}' with tools [{}]",
                agent.id(),
                agent.tools().names().join(", ")
            );
            specialists.push(Arc::new(AgentTool::new(Arc::new(agent), self.agent_timeout)));
        }
        let catalog = ToolCatalog::new(specialists)?;

        let planner: Arc<dyn DelegationPlanner> = match self.planner {
            Some(planner) => planner,
            None => Arc::new(
                LlmPlanner::new(self.travel_agent, Arc::clone(&llm))
                    .with_llm_timeout(self.llm_timeout),
            ),
        };

        let orchestrator = Orchestrator::new(planner, catalog)
            .with_settings(self.orchestrator_settings)
            .with_events(Arc::clone(&event_bus));

        Ok(TripPlannerApi {
            event_bus,
            orchestrator,
            history: VecDeque::new(),
            max_history_size: self.max_history_size,
        })
    }
}

impl Default for TripPlannerApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
