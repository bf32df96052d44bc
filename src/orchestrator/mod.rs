// Orchestrator: drives one planning cycle from request to validated answer
//
// Module Organization:
// - state.rs: OrchestrationState and the transition rules
// - planner.rs: DelegationPlanner trait and the LLM-backed planner
// - Orchestrator, settings and outcome types defined in this file
//
// One cycle alternates planning and delegation until the planner offers a
// candidate answer, which is validated against the travel output schema. All
// specialist calls requested in one planning step run concurrently; their
// results are fed back in the order the calls were issued.

pub mod planner;
pub mod state;

use crate::agent::{ToolCatalog, ToolDefinition};
use crate::conversation::{ConversationTurn, Transcript};
use crate::error::{Result, TripbotError};
use crate::events::{Event, EventBus, EventKind};
use crate::llm::{Message, ToolCall};
use crate::output::{self, TravelOutput};
use crate::request::TripRequest;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use planner::{DelegationPlanner, LlmPlanner, PlannerDecision};
pub use state::{OrchestrationState, StateTrail};

const SOURCE: &str = "orchestrator";

/// Limits for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    /// Planning steps before the cycle fails
    pub max_turns: usize,
    /// Corrections allowed after a rejected answer
    pub synthesis_retries: usize,
    /// Extra attempts for a specialist that timed out
    pub agent_retries: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_turns: 10,
            synthesis_retries: 2,
            agent_retries: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelegationStatus {
    Completed,
    TimedOut,
    Failed(String),
}

/// One specialist call and what came of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationRecord {
    pub call_id: String,
    pub tool: String,
    pub sub_query: String,
    /// Text handed back to the planner
    pub output: String,
    pub status: DelegationStatus,
    pub attempts: usize,
    /// Searches that came back without real-time data during this call
    #[serde(default)]
    pub degraded: Vec<String>,
}

/// Result of a successful cycle
#[derive(Debug, Clone)]
pub struct OrchestrationOutcome {
    pub output: TravelOutput,
    pub transcript: Transcript,
    /// Every specialist call, grouped by planning step, in issue order
    pub delegations: Vec<DelegationRecord>,
    /// Degradations the user should know about (timeouts, missing search data)
    pub notes: Vec<String>,
    pub states: Vec<OrchestrationState>,
}

/// Per-cycle working state
struct Cycle {
    trail: StateTrail,
    transcript: Transcript,
    delegations: Vec<DelegationRecord>,
    notes: Vec<String>,
}

impl Cycle {
    fn new() -> Self {
        Self {
            trail: StateTrail::new(),
            transcript: Transcript::new(),
            delegations: Vec::new(),
            notes: Vec::new(),
        }
    }

    fn note(&mut self, note: String) {
        if !self.notes.contains(&note) {
            self.notes.push(note);
        }
    }
}

pub struct Orchestrator {
    planner: Arc<dyn DelegationPlanner>,
    tools: ToolCatalog,
    settings: OrchestratorSettings,
    events: Option<Arc<EventBus>>,
}

impl Orchestrator {
    /// `tools` is the catalog of specialists (normally `AgentTool`s)
    pub fn new(planner: Arc<dyn DelegationPlanner>, tools: ToolCatalog) -> Self {
        Self {
            planner,
            tools,
            settings: OrchestratorSettings::default(),
            events: None,
        }
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn tools(&self) -> &ToolCatalog {
        &self.tools
    }

    fn emit(&self, kind: EventKind) {
        if let Some(events) = &self.events {
            events.publish(Event::new(SOURCE, kind));
        }
    }

    fn enter(&self, cycle: &mut Cycle, state: OrchestrationState) {
        if cycle.trail.advance(state) {
            self.emit(EventKind::StateChanged(state));
        }
    }

    /// Run one planning cycle
    ///
    /// # Errors
    /// - `InvalidRequest` for a blank request (nothing is called)
    /// - `Cancelled` when `cancel` fires before the cycle completes
    /// - `ValidationError` when every correction attempt was rejected
    /// - `MaxTurnsExceeded`, or the planner's own error (e.g. its LLM call
    ///   timing out)
    pub async fn run(
        &self,
        request: &TripRequest,
        cancel: &CancellationToken,
    ) -> Result<OrchestrationOutcome> {
        let mut cycle = Cycle::new();
        self.emit(EventKind::StateChanged(OrchestrationState::Received));

        if request.is_blank() {
            return Err(self.fail(
                &mut cycle,
                TripbotError::InvalidRequest("trip request is empty".to_string()),
            ));
        }

        let result = if cancel.is_cancelled() {
            Err(TripbotError::Cancelled)
        } else {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TripbotError::Cancelled),
                result = self.drive(request, &mut cycle) => result,
            }
        };

        match result {
            Ok(output) => {
                tracing::info!(
                    "Trip plan for '{}' ready after {} delegation(s)",
                    output.destination,
                    cycle.delegations.len()
                );
                Ok(OrchestrationOutcome {
                    output,
                    transcript: cycle.transcript,
                    delegations: cycle.delegations,
                    notes: cycle.notes,
                    states: cycle.trail.into_states(),
                })
            }
            Err(e) => Err(self.fail(&mut cycle, e)),
        }
    }

    fn fail(&self, cycle: &mut Cycle, error: TripbotError) -> TripbotError {
        tracing::error!("Planning cycle failed: {}", error);
        self.enter(cycle, OrchestrationState::Failed);
        error
    }

    async fn drive(&self, request: &TripRequest, cycle: &mut Cycle) -> Result<TravelOutput> {
        let definitions: Vec<ToolDefinition> = self.tools.definitions();
        let mut messages = vec![Message::user(request.text())];
        cycle.transcript.push(ConversationTurn::user(request.text()));

        let mut rejections = 0;

        for turn in 0..self.settings.max_turns {
            self.enter(cycle, OrchestrationState::Planning);
            tracing::debug!("Planning step {}", turn + 1);

            match self.planner.next_step(&messages, &definitions).await? {
                PlannerDecision::Delegate(calls) => {
                    self.enter(cycle, OrchestrationState::Delegating);

                    messages.push(Message::assistant_tool_calls("", calls.clone()));
                    let records = self.delegate(&calls, request).await;

                    for record in records {
                        for note in &record.degraded {
                            cycle.note(note.clone());
                        }
                        messages.push(Message::tool(record.call_id.clone(), record.output.clone()));
                        cycle
                            .transcript
                            .push(ConversationTurn::tool(record.tool.clone(), record.output.clone()));

                        match &record.status {
                            DelegationStatus::Completed => {}
                            DelegationStatus::TimedOut => cycle.note(format!(
                                "{} timed out; that part of the plan was not researched",
                                record.tool
                            )),
                            DelegationStatus::Failed(reason) => {
                                cycle.note(format!("{} failed: {}", record.tool, reason))
                            }
                        }
                        cycle.delegations.push(record);
                    }
                }
                PlannerDecision::Finish(candidate) => {
                    self.enter(cycle, OrchestrationState::Synthesizing);

                    messages.push(Message::assistant(candidate.clone()));
                    cycle.transcript.push(ConversationTurn::assistant(candidate.clone()));

                    match output::parse_candidate(&candidate) {
                        Ok(output) => {
                            self.enter(cycle, OrchestrationState::Done);
                            return Ok(output);
                        }
                        Err(TripbotError::ValidationError { fields })
                            if rejections < self.settings.synthesis_retries =>
                        {
                            rejections += 1;
                            tracing::warn!(
                                "Answer rejected (attempt {}): missing {}",
                                rejections,
                                fields.join(", ")
                            );
                            self.emit(EventKind::SynthesisRejected {
                                attempt: rejections,
                                fields: fields.clone(),
                            });

                            let correction = correction_prompt(&fields);
                            messages.push(Message::user(correction.clone()));
                            cycle.transcript.push(ConversationTurn::user(correction));
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        Err(TripbotError::MaxTurnsExceeded(self.settings.max_turns))
    }

    /// Run all calls of one step concurrently; records come back in issue order
    async fn delegate(&self, calls: &[ToolCall], request: &TripRequest) -> Vec<DelegationRecord> {
        tracing::info!(
            "Delegating to [{}]",
            calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        );
        join_all(calls.iter().map(|call| self.invoke(call, request))).await
    }

    async fn invoke(&self, call: &ToolCall, request: &TripRequest) -> DelegationRecord {
        let mut record = DelegationRecord {
            call_id: call.id.clone(),
            tool: call.name.clone(),
            sub_query: String::new(),
            output: String::new(),
            status: DelegationStatus::Completed,
            attempts: 0,
            degraded: Vec::new(),
        };

        let Some(tool) = self.tools.get(&call.name) else {
            tracing::warn!("Planner requested unknown specialist '{}'", call.name);
            let reason = format!("tool '{}' is not available", call.name);
            record.output = format!(
                "Tool error: {}. Available tools: {}",
                reason,
                self.tools.names().join(", ")
            );
            record.status = DelegationStatus::Failed(reason);
            return record;
        };

        record.sub_query = call.argument(tool.parameters().primary());
        if record.sub_query.trim().is_empty() {
            tracing::debug!("Blank sub-query for '{}'; passing the request instead", call.name);
            record.sub_query = request.text().to_string();
        }

        loop {
            record.attempts += 1;
            self.emit(EventKind::DelegationStarted {
                tool: call.name.clone(),
                sub_query: record.sub_query.clone(),
            });

            match tool.execute(&record.sub_query).await {
                Ok(answer) => {
                    self.emit(EventKind::DelegationFinished {
                        tool: call.name.clone(),
                        chars: answer.text.len(),
                    });
                    record.output = answer.text;
                    record.degraded = answer.degraded;
                    record.status = DelegationStatus::Completed;
                    return record;
                }
                Err(e @ TripbotError::AgentTimeout { .. }) => {
                    self.emit(EventKind::DelegationFailed {
                        tool: call.name.clone(),
                        reason: e.to_string(),
                    });

                    if record.attempts <= self.settings.agent_retries {
                        tracing::warn!("{}; retrying (attempt {})", e, record.attempts + 1);
                        continue;
                    }

                    tracing::warn!("{}; giving up after {} attempt(s)", e, record.attempts);
                    record.output = format!(
                        "The {} specialist timed out ({}). Continue without its input and tell \
                         the user this part of the plan could not be researched.",
                        call.name, e
                    );
                    record.status = DelegationStatus::TimedOut;
                    return record;
                }
                Err(e) => {
                    tracing::warn!("Specialist '{}' failed: {}", call.name, e);
                    self.emit(EventKind::DelegationFailed {
                        tool: call.name.clone(),
                        reason: e.to_string(),
                    });
                    record.output = format!("Tool error: {}", e);
                    record.status = DelegationStatus::Failed(e.to_string());
                    return record;
                }
            }
        }
    }
}

fn correction_prompt(fields: &[String]) -> String {
    format!(
        "Your answer was rejected because these fields are missing or empty: {}. \
         Reply with only the JSON object {{\"destination\": \"string\", \"duration\": \"string\", \
         \"summary\": \"string\", \"cost\": \"string\", \"tips\": \"string\"}} and make every \
         field a non-empty string.",
        fields.join(", ")
    )
}
