use super::types::*;
use super::LlmAdapter;
use crate::agent::ToolDefinition;
use crate::error::{Result, TripbotError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";

/// Chat completions adapter for OpenRouter and other OpenAI-compatible APIs
pub struct OpenRouterAdapter {
    client: Client,
    api_key: String,
    api_base: String,
    default_model: String,
}

impl OpenRouterAdapter {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base: OPENROUTER_API_BASE.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn build_request(&self, request: LlmRequest) -> ApiRequest {
        ApiRequest {
            model: request.model.unwrap_or_else(|| self.default_model.clone()),
            messages: request.messages.into_iter().map(ApiMessage::from).collect(),
            stream: false,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            tools: request.tools,
            tool_choice: request.tool_choice,
        }
    }

    async fn send_request(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        self.client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| TripbotError::LlmError(format!("Failed to send request: {}", e)))
    }
}

#[async_trait]
impl LlmAdapter for OpenRouterAdapter {
    async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse> {
        let api_request = self.build_request(request);

        tracing::debug!(
            "Sending chat completion: model={}, messages={}, tools={}",
            api_request.model,
            api_request.messages.len(),
            api_request.tools.as_ref().map_or(0, |t| t.len())
        );

        let response = self.send_request(&api_request).await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TripbotError::LlmError(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| TripbotError::LlmError(format!("Malformed completion: {}", e)))?;

        completion.into_response()
    }

    fn name(&self) -> &str {
        "OpenRouter"
    }
}

// Internal API types
#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,

    /// Custom tool definitions (OpenAI function calling format)
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl From<Message> for ApiMessage {
    fn from(message: Message) -> Self {
        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(message.tool_calls.into_iter().map(ApiToolCall::from).collect())
        };

        // Assistant turns that only carry tool calls send a null content
        let content = if tool_calls.is_some() && message.content.is_empty() {
            None
        } else {
            Some(message.content)
        };

        Self {
            role: message.role,
            content,
            tool_calls,
            tool_call_id: message.tool_call_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: ApiFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl From<ToolCall> for ApiToolCall {
    fn from(call: ToolCall) -> Self {
        Self {
            id: call.id,
            call_type: function_type(),
            function: ApiFunctionCall {
                name: call.name,
                arguments: call.arguments,
            },
        }
    }
}

impl From<ApiToolCall> for ToolCall {
    fn from(call: ApiToolCall) -> Self {
        ToolCall::new(call.id, call.function.name, call.function.arguments)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ApiMessage,
    finish_reason: Option<String>,
}

impl CompletionResponse {
    fn into_response(self) -> Result<LlmResponse> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TripbotError::LlmError("No choices in response".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls: choice
                .message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(ToolCall::from)
                .collect(),
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::FunctionParameters;

    #[test]
    fn test_request_serialization_with_tool_history() {
        let adapter = OpenRouterAdapter::new("test-key".to_string());
        let tool = ToolDefinition::new(
            "planner_agent",
            "Plan an itinerary",
            FunctionParameters::single_string("input", "The request"),
        );

        let request = LlmRequest::new(vec![
            Message::system("You plan trips."),
            Message::user("Tokyo for 5 days"),
            Message::assistant_tool_calls(
                "",
                vec![ToolCall::new("call_1", "planner_agent", r#"{"input":"Tokyo"}"#)],
            ),
            Message::tool("call_1", "Day 1: Senso-ji"),
        ])
        .with_tools(vec![tool]);

        let json = serde_json::to_value(adapter.build_request(request)).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["stream"], false);
        assert_eq!(json["tool_choice"], "auto");
        assert_eq!(json["tools"][0]["function"]["name"], "planner_agent");
        assert!(json["messages"][2]["content"].is_null());
        assert_eq!(
            json["messages"][2]["tool_calls"][0]["function"]["arguments"],
            r#"{"input":"Tokyo"}"#
        );
        assert_eq!(json["messages"][3]["tool_call_id"], "call_1");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_parse_tool_call_completion() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "budget_agent", "arguments": "{\"input\":\"Tokyo\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }"#;

        let completion: CompletionResponse = serde_json::from_str(raw).unwrap();
        let response = completion.into_response().unwrap();

        assert!(response.content.is_empty());
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "budget_agent");
        assert_eq!(response.tool_calls[0].argument("input"), "Tokyo");
        assert_eq!(response.finish_reason.as_deref(), Some("tool_calls"));
    }

    #[test]
    fn test_parse_text_completion() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Hello"},"finish_reason":"stop"}]}"#;
        let completion: CompletionResponse = serde_json::from_str(raw).unwrap();
        let response = completion.into_response().unwrap();

        assert_eq!(response.content, "Hello");
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_empty_choices_is_error() {
        let completion: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            completion.into_response(),
            Err(TripbotError::LlmError(_))
        ));
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let adapter = OpenRouterAdapter::new("k".to_string())
            .with_api_base("https://api.openai.com/v1/".to_string());
        assert_eq!(adapter.endpoint(), "https://api.openai.com/v1/chat/completions");
    }
}
