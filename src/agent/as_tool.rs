use super::{Agent, FunctionParameters, Tool, ToolOutput};
use crate::error::{Result, TripbotError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A specialist agent presented as one opaque tool
///
/// The caller sees a name, a description and `invoke`; the wrapped agent's
/// own search calls stay hidden and only its final text comes back, along
/// with the names of searches that degraded when called through `execute`.
pub struct AgentTool {
    agent: Arc<Agent>,
    timeout: Duration,
}

impl AgentTool {
    pub fn new(agent: Arc<Agent>, timeout: Duration) -> Self {
        Self { agent, timeout }
    }
}

#[async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        self.agent.id()
    }

    fn description(&self) -> &str {
        &self.agent.config().description
    }

    fn parameters(&self) -> FunctionParameters {
        FunctionParameters::single_string(
            "input",
            "Self-contained request for this specialist: destination, trip length, budget, \
             preferences and exactly what to produce",
        )
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        Ok(self.execute(input).await?.text)
    }

    async fn execute(&self, input: &str) -> Result<ToolOutput> {
        tokio::time::timeout(self.timeout, self.agent.respond(input))
            .await
            .map_err(|_| TripbotError::AgentTimeout {
                agent: self.agent.id().to_string(),
                seconds: self.timeout.as_secs(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentConfig, ToolCatalog};
    use crate::llm::{LlmAdapter, LlmRequest, LlmResponse, MockLlmAdapter};

    fn budget_agent(llm: Arc<dyn LlmAdapter>) -> Arc<Agent> {
        let config = AgentConfig::new("budget_agent", "Budget Agent")
            .with_description("Estimate trip costs");
        Arc::new(Agent::new(config, llm, ToolCatalog::empty()).unwrap())
    }

    #[tokio::test]
    async fn test_invoke_returns_agent_text_verbatim() {
        let mut llm = MockLlmAdapter::new();
        llm.expect_complete_chat()
            .withf(|req: &LlmRequest| req.messages.last().unwrap().content == "Tokyo, 5 days")
            .returning(|_| Ok(LlmResponse::text("Hotels: $600-$900 total")));

        let tool = AgentTool::new(budget_agent(Arc::new(llm)), Duration::from_secs(5));

        assert_eq!(tool.name(), "budget_agent");
        assert_eq!(tool.description(), "Estimate trip costs");
        assert_eq!(
            tool.invoke("Tokyo, 5 days").await.unwrap(),
            "Hotels: $600-$900 total"
        );
    }

    struct StalledLlm;

    #[async_trait]
    impl LlmAdapter for StalledLlm {
        async fn complete_chat(&self, _request: LlmRequest) -> Result<LlmResponse> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(LlmResponse::text("too late"))
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_invoke_times_out() {
        let tool = AgentTool::new(budget_agent(Arc::new(StalledLlm)), Duration::from_millis(50));

        match tool.invoke("Tokyo").await {
            Err(TripbotError::AgentTimeout { agent, .. }) => assert_eq!(agent, "budget_agent"),
            other => panic!("Expected AgentTimeout, got {:?}", other),
        }
    }
}
