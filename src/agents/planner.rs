// Planner Agent Configuration
// Builds day-by-day itineraries from searched attractions

use crate::agent::AgentConfig;

pub const PLANNER_AGENT_ID: &str = "planner_agent";

/// Create the itinerary specialist
///
/// Bound to `search_attractions` only. The orchestrator sees it as the
/// `planner_agent` tool.
pub fn create_planner_agent() -> AgentConfig {
    AgentConfig::new(PLANNER_AGENT_ID, "Planner Agent")
        .with_description(
            "Plan or outline an itinerary, schedule, or daily plan for the trip. \
             This agent searches for real attractions and activities.",
        )
        .with_instructions(
            r#"You specialize in building day-by-day travel itineraries and sequencing activities.
ALWAYS use the search_attractions tool to find current, accurate information about attractions and activities.
Focus on:
- Popular attractions and must-see locations (search for them!)
- Optimal timing and logical pacing
- Mix of activities (cultural, recreational, relaxation)
- Practical logistics (travel time between locations)

Search for real information before creating the itinerary.
If a search reports that real-time data is unavailable, continue from general knowledge and say so.
Return a detailed day-by-day plan with specific times, attractions, and activities."#,
        )
        .with_tools(&["search_attractions"])
}
