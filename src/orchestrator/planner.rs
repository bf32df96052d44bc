// Delegation decisions
//
// The orchestrator asks a planner what to do next given the conversation so
// far and the specialists it may call. The production planner is a
// tool-calling LLM; tests substitute scripted planners.

use crate::agent::{AgentConfig, ToolDefinition};
use crate::error::{Result, TripbotError};
use crate::llm::{LlmAdapter, LlmRequest, Message, ToolCall};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use std::time::Duration;

/// What the orchestrator should do next
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerDecision {
    /// Invoke these specialists (possibly none) and plan again
    Delegate(Vec<ToolCall>),
    /// Candidate final answer, still to be validated
    Finish(String),
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DelegationPlanner: Send + Sync {
    /// Decide the next step
    ///
    /// `messages` holds the user request, earlier decisions and specialist
    /// results in order; it never contains the planner's own instructions.
    async fn next_step(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<PlannerDecision>;
}

/// Planner backed by a tool-calling LLM
pub struct LlmPlanner {
    config: AgentConfig,
    llm: Arc<dyn LlmAdapter>,
    llm_timeout: Duration,
}

impl LlmPlanner {
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmAdapter>) -> Self {
        Self {
            config,
            llm,
            llm_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

#[async_trait]
impl DelegationPlanner for LlmPlanner {
    async fn next_step(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<PlannerDecision> {
        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(Message::system(self.config.instructions.clone()));
        conversation.extend_from_slice(messages);

        let request = LlmRequest::new(conversation)
            .with_model(self.config.model.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
            .with_tools(tools.to_vec());

        let response = tokio::time::timeout(self.llm_timeout, self.llm.complete_chat(request))
            .await
            .map_err(|_| TripbotError::AgentTimeout {
                agent: self.config.id.clone(),
                seconds: self.llm_timeout.as_secs(),
            })??;

        if response.has_tool_calls() {
            tracing::debug!(
                "{} requested {} delegation(s)",
                self.config.id,
                response.tool_calls.len()
            );
            Ok(PlannerDecision::Delegate(response.tool_calls))
        } else {
            Ok(PlannerDecision::Finish(response.content))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::create_travel_agent;
    use crate::llm::{LlmResponse, MockLlmAdapter};

    #[tokio::test]
    async fn test_tool_calls_become_delegations() {
        let mut llm = MockLlmAdapter::new();
        llm.expect_complete_chat()
            .withf(|req| req.messages[0].role == "system" && req.messages.len() == 2)
            .returning(|_| {
                Ok(LlmResponse::with_tool_calls(vec![ToolCall::new(
                    "c1",
                    "planner_agent",
                    r#"{"input":"5 days in Tokyo"}"#,
                )]))
            });

        let planner = LlmPlanner::new(create_travel_agent(), Arc::new(llm));
        let decision = planner
            .next_step(&[Message::user("Plan Tokyo")], &[])
            .await
            .unwrap();

        match decision {
            PlannerDecision::Delegate(calls) => assert_eq!(calls[0].name, "planner_agent"),
            other => panic!("Expected delegation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_text_becomes_candidate() {
        let mut llm = MockLlmAdapter::new();
        llm.expect_complete_chat()
            .withf(|req| req.tools.is_none())
            .returning(|_| Ok(LlmResponse::text("{\"destination\":\"Tokyo\"}")));

        let planner = LlmPlanner::new(create_travel_agent(), Arc::new(llm));
        let decision = planner.next_step(&[Message::user("Tokyo")], &[]).await.unwrap();

        assert_eq!(
            decision,
            PlannerDecision::Finish("{\"destination\":\"Tokyo\"}".to_string())
        );
    }
}
