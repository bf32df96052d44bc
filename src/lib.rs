// Library interface for Tripbot
// This exposes the trip planner as a library that can be:
// - Driven by the `tripbot` CLI
// - Called from scripts and tests with scripted model and search adapters
// - Embedded into other applications

pub mod agent;
pub mod agents;
pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod events;
pub mod llm;
pub mod orchestrator;
pub mod output;
pub mod request;
pub mod search;
pub mod tool_executor;
pub mod version;

// Re-export commonly used types for convenience
pub use agent::{Agent, AgentConfig, AgentLoader, AgentTool, JsonAgentConfig, Tool, ToolCatalog};
pub use api::{TripPlannerApi, TripPlannerApiBuilder};
pub use config::AppConfig;
pub use conversation::{ConversationTurn, Transcript, TurnRole};
pub use error::{ErrorKind, Result, TripbotError};
pub use events::{AgentStatus, Event, EventBus, EventKind};
pub use llm::{LlmAdapter, LlmProvider, LlmRequest, LlmResponse, Message as LlmMessage, ToolCall};
pub use orchestrator::{
    DelegationPlanner, DelegationRecord, DelegationStatus, LlmPlanner, OrchestrationOutcome,
    OrchestrationState, Orchestrator, OrchestratorSettings, PlannerDecision,
};
pub use output::{TravelOutput, TRAVEL_OUTPUT_FIELDS};
pub use request::{TripHints, TripRequest};
pub use search::{SearchProvider, SearchResult, SearchSettings, SearchToolbox, TavilySearch};
pub use tokio_util::sync::CancellationToken;
