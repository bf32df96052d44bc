use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one planning cycle
///
/// ```text
/// Received -> Planning -> Delegating -> Planning -> ... -> Synthesizing -> Done
///                 \                                            |
///                  +------------------ Failed <----------------+
/// ```
/// A rejected synthesis goes back to Planning; nothing reaches Delegating or
/// Synthesizing without passing through Planning first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrchestrationState {
    Received,
    Planning,
    Delegating,
    Synthesizing,
    Done,
    Failed,
}

impl OrchestrationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrchestrationState::Done | OrchestrationState::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: OrchestrationState) -> bool {
        use OrchestrationState::*;

        match (self, next) {
            (Done, _) | (Failed, _) => false,
            (_, Failed) => true,
            (Received, Planning) => true,
            (Planning, Delegating) | (Planning, Synthesizing) => true,
            (Delegating, Planning) => true,
            (Synthesizing, Done) | (Synthesizing, Planning) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrchestrationState::Received => "received",
            OrchestrationState::Planning => "planning",
            OrchestrationState::Delegating => "delegating",
            OrchestrationState::Synthesizing => "synthesizing",
            OrchestrationState::Done => "done",
            OrchestrationState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Ordered record of the states a cycle went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTrail {
    states: Vec<OrchestrationState>,
}

impl StateTrail {
    pub fn new() -> Self {
        Self {
            states: vec![OrchestrationState::Received],
        }
    }

    pub fn current(&self) -> OrchestrationState {
        *self.states.last().unwrap_or(&OrchestrationState::Received)
    }

    /// Move to `next`, returning false (and staying put) on an illegal move
    pub fn advance(&mut self, next: OrchestrationState) -> bool {
        let current = self.current();
        if !current.can_transition_to(next) {
            tracing::error!("Illegal orchestration transition {} -> {}", current, next);
            return false;
        }
        tracing::info!("Orchestrator: {} -> {}", current, next);
        self.states.push(next);
        true
    }

    pub fn states(&self) -> &[OrchestrationState] {
        &self.states
    }

    pub fn into_states(self) -> Vec<OrchestrationState> {
        self.states
    }
}

impl Default for StateTrail {
    fn default() -> Self {
        Self::new()
    }
}
