// Shared fixtures for integration tests
//
// `ScriptedLlm` stands in for the model behind every agent. It recognises
// which agent is calling from the system prompt and answers deterministically:
// specialists search once with their first bound tool, then summarise what
// came back; the travel agent delegates to every specialist it is offered and
// then assembles the JSON answer from their replies.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tripbot::agents::{
    create_budget_agent, create_local_guide_agent, create_planner_agent, create_travel_agent,
};
use tripbot::{
    LlmAdapter, LlmMessage, LlmRequest, LlmResponse, Result, SearchProvider, SearchResult,
    ToolCall, TripPlannerApi, TripPlannerApiBuilder,
};

mock! {
    pub Search {}

    #[async_trait]
    impl SearchProvider for Search {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
        fn name(&self) -> &str;
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();
}

/// Search provider returning one fixed hit per query
pub fn fixed_search() -> MockSearch {
    let mut search = MockSearch::new();
    search.expect_search().returning(|query, _| {
        Ok(vec![SearchResult::new(
            "Result",
            format!("Found for '{}'", query),
            "https://travel.example/tokyo",
        )])
    });
    search.expect_name().return_const("mock".to_string());
    search
}

/// Search provider that is always unreachable
pub fn failing_search() -> MockSearch {
    let mut search = MockSearch::new();
    search.expect_search().returning(|_, _| {
        Err(tripbot::TripbotError::RetrievalError(
            "connection refused".to_string(),
        ))
    });
    search.expect_name().return_const("mock".to_string());
    search
}

/// Search provider that never answers in time
pub struct StalledSearch;

#[async_trait]
impl SearchProvider for StalledSearch {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelScript {
    /// Call every offered specialist in one step, then answer
    DelegateAll,
    /// Answer straight away with stated assumptions
    AnswerDirectly,
    /// Always answer with prose that is not JSON
    Prose,
}

pub struct ScriptedLlm {
    script: TravelScript,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(script: TravelScript) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn specialist(&self, role: &str, request: &LlmRequest) -> LlmResponse {
        let tool_results: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == "tool")
            .map(|m| m.content.as_str())
            .collect();

        if tool_results.is_empty() {
            if let Some(tool) = request.tools.as_ref().and_then(|t| t.first()) {
                let sub_query = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == "user")
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                return LlmResponse::with_tool_calls(vec![ToolCall::new(
                    format!("{}_search", role),
                    tool.function.name.clone(),
                    json!({ "query": sub_query }).to_string(),
                )]);
            }
        }

        let answer = match role {
            "planner" => "Day 1: Asakusa and Senso-ji. Day 2: Shibuya. Day 3: Meiji Shrine. \
                          Day 4: Nikko day trip. Day 5: Tsukiji outer market.",
            "budget" => "Estimated total: $1,650 for 5 days (under the $2000 budget). \
                         Hotels $90-$120 per night.",
            _ => "Try ramen in Shinjuku and sushi at Tsukiji. Get a Suica card; tipping is not customary.",
        };

        LlmResponse::text(format!("{}\nResearch: {}", answer, tool_results.join(" | ")))
    }

    fn travel(&self, request: &LlmRequest) -> LlmResponse {
        let replies: Vec<&LlmMessage> =
            request.messages.iter().filter(|m| m.role == "tool").collect();

        match self.script {
            TravelScript::Prose => LlmResponse::text("Tokyo sounds lovely, let me think about it."),
            TravelScript::AnswerDirectly => LlmResponse::text(
                json!({
                    "destination": "Somewhere warm (assumed: Lisbon)",
                    "duration": "Assumed 4 days",
                    "summary": "Assuming a relaxed city break in Lisbon.",
                    "cost": "Roughly $1,200, assuming mid-range hotels",
                    "tips": "Assumptions were made because the request was vague."
                })
                .to_string(),
            ),
            TravelScript::DelegateAll if replies.is_empty() => {
                let sub_query = request
                    .messages
                    .iter()
                    .find(|m| m.role == "user")
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                let calls = request
                    .tools
                    .iter()
                    .flatten()
                    .map(|t| {
                        ToolCall::new(
                            format!("call_{}", t.function.name),
                            t.function.name.clone(),
                            json!({ "input": sub_query }).to_string(),
                        )
                    })
                    .collect();
                LlmResponse::with_tool_calls(calls)
            }
            TravelScript::DelegateAll => {
                let reply = |id: &str| {
                    replies
                        .iter()
                        .find(|m| m.tool_call_id.as_deref() == Some(id))
                        .map(|m| m.content.clone())
                        .unwrap_or_else(|| "not available".to_string())
                };
                LlmResponse::text(format!(
                    "```json\n{}\n```",
                    json!({
                        "destination": "Tokyo",
                        "duration": "5 days",
                        "summary": reply("call_planner_agent"),
                        "cost": reply("call_budget_agent"),
                        "tips": reply("call_local_guide_agent"),
                    })
                ))
            }
        }
    }
}

#[async_trait]
impl LlmAdapter for ScriptedLlm {
    async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let system = request
            .messages
            .first()
            .filter(|m| m.role == "system")
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let response = if system == create_travel_agent().instructions {
            self.travel(&request)
        } else if system == create_planner_agent().instructions {
            self.specialist("planner", &request)
        } else if system == create_budget_agent().instructions {
            self.specialist("budget", &request)
        } else if system == create_local_guide_agent().instructions {
            self.specialist("local_guide", &request)
        } else {
            LlmResponse::text("unscripted")
        };

        Ok(response)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn build_api(llm: Arc<ScriptedLlm>, search: Arc<dyn SearchProvider>) -> TripPlannerApi {
    TripPlannerApiBuilder::new()
        .llm_adapter(llm)
        .search_provider(search)
        .build()
        .expect("Failed to build test API")
}
