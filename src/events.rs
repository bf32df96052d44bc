// Event system for observing a planning cycle
// Implements event bus pattern using tokio broadcast channels; publishing
// never blocks and succeeds with or without subscribers

use crate::orchestrator::OrchestrationState;
use std::fmt;
use tokio::sync::broadcast;

/// Maximum capacity for the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main event structure containing all information about an event
#[derive(Debug, Clone)]
pub struct Event {
    /// Component that emitted the event (agent id, tool name, "orchestrator")
    pub source: String,
    pub kind: EventKind,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl Event {
    pub fn new(source: impl Into<String>, kind: EventKind) -> Self {
        Self {
            source: source.into(),
            kind,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Types of events that can be sent through the event bus
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Orchestrator moved to a new state
    StateChanged(OrchestrationState),

    /// Agent status update
    AgentStatusChange {
        agent_id: String,
        status: AgentStatus,
    },

    /// A specialist agent was handed a sub-query
    DelegationStarted { tool: String, sub_query: String },

    /// A specialist agent returned its text
    DelegationFinished { tool: String, chars: usize },

    /// A specialist agent failed or timed out; the cycle continues without it
    DelegationFailed { tool: String, reason: String },

    /// A search call failed and the agent continues without external data
    SearchDegraded { tool: String, reason: String },

    /// The synthesized answer was rejected and the orchestrator re-prompted
    SynthesisRejected { attempt: usize, fields: Vec<String> },
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::StateChanged(state) => write!(f, "state -> {}", state),
            EventKind::AgentStatusChange { agent_id, status } => {
                write!(f, "{} is {:?}", agent_id, status)
            }
            EventKind::DelegationStarted { tool, .. } => write!(f, "calling {}", tool),
            EventKind::DelegationFinished { tool, chars } => {
                write!(f, "{} answered ({} chars)", tool, chars)
            }
            EventKind::DelegationFailed { tool, reason } => write!(f, "{} failed: {}", tool, reason),
            EventKind::SearchDegraded { tool, reason } => {
                write!(f, "{} unavailable: {}", tool, reason)
            }
            EventKind::SynthesisRejected { attempt, fields } => write!(
                f,
                "answer #{} rejected, missing {}",
                attempt,
                fields.join(", ")
            ),
        }
    }
}

/// Agent status states
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStatus {
    Idle,
    Thinking,
    ExecutingTool(String), // Tool name being executed
    Error(String),
}

/// Event bus for publishing and subscribing to events
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Create a new event bus with custom capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to events - returns a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of subscribers that received it (zero is fine).
    pub fn publish(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Shorthand for `publish(Event::new(source, kind))`
    pub fn emit(&self, source: &str, kind: EventKind) -> usize {
        self.publish(Event::new(source, kind))
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
