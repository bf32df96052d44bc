use super::{check_search_args, SearchProvider, SearchResult};
use crate::error::{Result, TripbotError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Web search through the Tavily API
pub struct TavilySearch {
    client: Client,
    api_key: String,
    endpoint: String,
    search_depth: String,
}

impl TavilySearch {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: TAVILY_API_URL.to_string(),
            search_depth: "advanced".to_string(),
        }
    }

    /// Point at a different endpoint (self-hosted proxy, test server)
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// "basic" or "advanced"
    pub fn with_search_depth(mut self, depth: String) -> Self {
        self.search_depth = depth;
        self
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        check_search_args(query, max_results)?;

        let request = TavilyRequest {
            query,
            search_depth: &self.search_depth,
            max_results,
        };

        tracing::debug!("Searching Tavily: {}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| TripbotError::RetrievalError(format!("Tavily unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TripbotError::RetrievalError(format!(
                "Tavily returned {}: {}",
                status, body
            )));
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| TripbotError::RetrievalError(format!("malformed Tavily response: {}", e)))?;

        Ok(body.into_results(max_results))
    }

    fn name(&self) -> &str {
        "Tavily"
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilyResponse {
    fn into_results(self, max_results: usize) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .take(max_results)
            .map(|hit| SearchResult::new(hit.title, hit.content, hit.url))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_keeps_order_and_truncates() {
        let raw = r#"{
            "query": "Tokyo tourist attractions",
            "results": [
                {"title": "Senso-ji", "url": "https://a.example", "content": "Oldest temple", "score": 0.9},
                {"title": "Shibuya", "url": "https://b.example", "content": "Crossing", "score": 0.8},
                {"title": "Ueno", "url": "https://c.example", "content": "Park", "score": 0.7}
            ]
        }"#;

        let response: TavilyResponse = serde_json::from_str(raw).unwrap();
        let results = response.into_results(2);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Senso-ji");
        assert_eq!(results[0].snippet, "Oldest temple");
        assert_eq!(results[1].url, "https://b.example");
    }

    #[test]
    fn test_response_without_results_is_empty() {
        let response: TavilyResponse = serde_json::from_str(r#"{"query": "x"}"#).unwrap();
        assert!(response.into_results(5).is_empty());
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(TavilyRequest {
            query: "Lisbon hotel prices",
            search_depth: "advanced",
            max_results: 5,
        })
        .unwrap();

        assert_eq!(body["query"], "Lisbon hotel prices");
        assert_eq!(body["search_depth"], "advanced");
        assert_eq!(body["max_results"], 5);
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_network() {
        let search = TavilySearch::new("key".to_string())
            .with_endpoint("http://127.0.0.1:9/unused".to_string());

        let result = search.search("  ", 5).await;
        assert!(matches!(result, Err(TripbotError::InvalidRequest(_))));
    }
}
