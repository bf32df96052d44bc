// Web search capability
//
// - mod.rs: `SearchProvider` contract and result type
// - tavily.rs: Tavily-backed provider
// - tools.rs: the named search bindings agents call, plus the toolbox that
//   binds them to agents

pub mod tavily;
pub mod tools;

pub use tavily::TavilySearch;
pub use tools::{SearchSettings, SearchTool, SearchToolbox, SearchTopic, DEGRADED_SEARCH_NOTE};

use crate::error::{Result, TripbotError};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// One ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
        }
    }
}

/// External web-search provider
///
/// Results come back in provider ranking order, at most `max_results` of
/// them; an empty list is a valid answer. Unreachable providers and
/// malformed payloads are reported as `TripbotError::RetrievalError`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;

    fn name(&self) -> &str;
}

/// Check the arguments of a search call
///
/// # Errors
/// - `InvalidRequest` for a blank query or `max_results == 0`
pub fn check_search_args(query: &str, max_results: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(TripbotError::InvalidRequest(
            "search query must not be empty".to_string(),
        ));
    }
    if max_results == 0 {
        return Err(TripbotError::InvalidRequest(
            "max_results must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_search_args() {
        assert!(check_search_args("Tokyo", 1).is_ok());
        assert!(matches!(
            check_search_args("   ", 5),
            Err(TripbotError::InvalidRequest(_))
        ));
        assert!(matches!(
            check_search_args("Tokyo", 0),
            Err(TripbotError::InvalidRequest(_))
        ));
    }
}
