// Named search bindings
//
// Each specialist agent gets a fixed subset of five topic-specific search
// tools. A binding appends its topic keywords to the agent's query, runs the
// provider under a timeout and formats the hits as plain text for the model.
// Provider failures never leave this module as errors: the tool answers with
// a degraded note so the agent keeps going without external data.

use super::{SearchProvider, SearchResult};
use crate::agent::{Tool, ToolCatalog, ToolOutput};
use crate::error::{Result, TripbotError};
use crate::events::{EventBus, EventKind};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Prefix of every tool result produced when a search could not be performed
pub const DEGRADED_SEARCH_NOTE: &str = "Real-time data unavailable";

/// Text returned when the provider had no matches
pub const NO_RESULTS: &str = "No results found.";

/// Topic of a search binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTopic {
    Attractions,
    AccommodationPrices,
    TransportCosts,
    FoodRestaurants,
    LocalTips,
}

impl SearchTopic {
    pub const ALL: [SearchTopic; 5] = [
        SearchTopic::Attractions,
        SearchTopic::AccommodationPrices,
        SearchTopic::TransportCosts,
        SearchTopic::FoodRestaurants,
        SearchTopic::LocalTips,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            SearchTopic::Attractions => "search_attractions",
            SearchTopic::AccommodationPrices => "search_accommodation_prices",
            SearchTopic::TransportCosts => "search_transport_costs",
            SearchTopic::FoodRestaurants => "search_food_restaurants",
            SearchTopic::LocalTips => "search_local_tips",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SearchTopic::Attractions => {
                "Search for tourist attractions, landmarks, and activities at a destination. \
                 Use this to find current information about places to visit, opening hours, \
                 and popular activities."
            }
            SearchTopic::AccommodationPrices => {
                "Search for accommodation prices, hotel costs, and lodging options at a \
                 destination. Use this to find current pricing for hotels, hostels, and other \
                 accommodations."
            }
            SearchTopic::TransportCosts => {
                "Search for transportation costs and options at a destination. Use this to \
                 find information about public transport, taxis, and getting around."
            }
            SearchTopic::FoodRestaurants => {
                "Search for local food, restaurants, and dining recommendations at a \
                 destination. Use this to find popular restaurants, local cuisine, and food \
                 prices."
            }
            SearchTopic::LocalTips => {
                "Search for local tips, cultural etiquette, and travel advice for a \
                 destination. Use this to find insider tips, customs, and practical travel \
                 advice."
            }
        }
    }

    /// Keywords appended to the agent's query
    pub fn query_suffix(&self) -> &'static str {
        match self {
            SearchTopic::Attractions => "tourist attractions things to do",
            SearchTopic::AccommodationPrices => "hotel prices accommodation cost per night",
            SearchTopic::TransportCosts => {
                "transportation costs public transport prices getting around"
            }
            SearchTopic::FoodRestaurants => "best restaurants local food must try dishes",
            SearchTopic::LocalTips => "travel tips local customs etiquette advice",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tool_name() == name)
    }
}

/// Limits applied to every search call
#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    pub max_results: usize,
    pub timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 5,
            timeout: Duration::from_secs(20),
        }
    }
}

/// One topic-specific search binding
pub struct SearchTool {
    topic: SearchTopic,
    provider: Arc<dyn SearchProvider>,
    settings: SearchSettings,
    events: Option<Arc<EventBus>>,
}

impl SearchTool {
    pub fn new(topic: SearchTopic, provider: Arc<dyn SearchProvider>, settings: SearchSettings) -> Self {
        Self {
            topic,
            provider,
            settings,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn topic(&self) -> SearchTopic {
        self.topic
    }

    fn build_query(&self, input: &str) -> String {
        format!("{} {}", input.trim(), self.topic.query_suffix())
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let seconds = self.settings.timeout.as_secs();
        tokio::time::timeout(
            self.settings.timeout,
            self.provider.search(query, self.settings.max_results),
        )
        .await
        .map_err(|_| {
            TripbotError::RetrievalError(format!(
                "{} did not answer within {}s",
                self.provider.name(),
                seconds
            ))
        })?
    }

    fn degraded(&self, reason: &str) -> ToolOutput {
        tracing::warn!("{} degraded: {}", self.topic.tool_name(), reason);

        if let Some(events) = &self.events {
            events.emit(
                self.topic.tool_name(),
                EventKind::SearchDegraded {
                    tool: self.topic.tool_name().to_string(),
                    reason: reason.to_string(),
                },
            );
        }

        ToolOutput::new(format!(
            "{} ({}): the search could not be completed. Continue from general knowledge \
             and tell the user that current real-time data could not be retrieved for this part.",
            DEGRADED_SEARCH_NOTE, reason
        ))
        .with_degraded(format!("{}: {}", self.topic.tool_name(), DEGRADED_SEARCH_NOTE))
    }
}

/// Render hits as `Source:`/`Content:` blocks separated by a blank line
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }

    results
        .iter()
        .map(|r| format!("Source: {}\nContent: {}", r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        self.topic.tool_name()
    }

    fn description(&self) -> &str {
        self.topic.description()
    }

    fn parameters(&self) -> crate::agent::FunctionParameters {
        crate::agent::FunctionParameters::single_string(
            "query",
            "Destination and focus of the search, e.g. 'Tokyo Asakusa'",
        )
    }

    async fn invoke(&self, input: &str) -> Result<String> {
        Ok(self.execute(input).await?.text)
    }

    async fn execute(&self, input: &str) -> Result<ToolOutput> {
        if input.trim().is_empty() {
            return Ok(self.degraded("empty search query"));
        }

        let query = self.build_query(input);
        tracing::info!("{} -> {}", self.topic.tool_name(), query);

        match self.search(&query).await {
            Ok(results) => Ok(ToolOutput::new(format_results(&results))),
            Err(e) => Ok(self.degraded(&e.to_string())),
        }
    }
}

/// All search bindings over one provider
///
/// Agents receive only the bindings named in their configuration; naming a
/// binding that does not exist is a configuration error.
#[derive(Clone)]
pub struct SearchToolbox {
    tools: Vec<Arc<SearchTool>>,
}

impl SearchToolbox {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: SearchSettings) -> Self {
        Self::build(provider, settings, None)
    }

    /// Bindings that report degraded searches on `events`
    pub fn with_events(
        provider: Arc<dyn SearchProvider>,
        settings: SearchSettings,
        events: Arc<EventBus>,
    ) -> Self {
        Self::build(provider, settings, Some(events))
    }

    fn build(
        provider: Arc<dyn SearchProvider>,
        settings: SearchSettings,
        events: Option<Arc<EventBus>>,
    ) -> Self {
        let tools = SearchTopic::ALL
            .into_iter()
            .map(|topic| {
                let tool = SearchTool::new(topic, Arc::clone(&provider), settings);
                let tool = match &events {
                    Some(bus) => tool.with_events(Arc::clone(bus)),
                    None => tool,
                };
                Arc::new(tool)
            })
            .collect();

        Self { tools }
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.topic.tool_name()).collect()
    }

    /// Catalog holding exactly the named bindings, in the given order
    ///
    /// # Errors
    /// - `ConfigError` for unknown or repeated names
    pub fn bind(&self, names: &[String]) -> Result<ToolCatalog> {
        let mut bound: Vec<Arc<dyn Tool>> = Vec::with_capacity(names.len());

        for name in names {
            let tool = self
                .tools
                .iter()
                .find(|t| t.topic.tool_name() == name)
                .ok_or_else(|| {
                    TripbotError::ConfigError(format!(
                        "unknown search tool '{}' (available: {})",
                        name,
                        self.names().join(", ")
                    ))
                })?;
            bound.push(Arc::clone(tool) as Arc<dyn Tool>);
        }

        ToolCatalog::new(bound)
    }
}
