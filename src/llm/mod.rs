mod openrouter;
mod types;

pub use openrouter::OpenRouterAdapter;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Unified LLM interface that all adapters must implement
///
/// Agents only need complete (non-streaming) responses: every turn either
/// requests tool calls or carries the final answer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Get a complete chat response, including any requested tool calls
    async fn complete_chat(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Get the adapter name for logging/debugging
    fn name(&self) -> &str;
}

/// Factory function to create the adapter for a provider
///
/// `api_base` overrides the provider's default endpoint (proxies, gateways).
pub fn create_adapter(
    provider: LlmProvider,
    api_key: String,
    api_base: Option<String>,
    default_model: Option<String>,
) -> Box<dyn LlmAdapter> {
    let adapter = OpenRouterAdapter::new(api_key)
        .with_api_base(api_base.unwrap_or_else(|| provider.default_api_base().to_string()))
        .with_default_model(default_model.unwrap_or_else(|| provider.default_model().to_string()));
    Box::new(adapter)
}
