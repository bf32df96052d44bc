// Local Guide Agent Configuration

use crate::agent::AgentConfig;

pub const LOCAL_GUIDE_AGENT_ID: &str = "local_guide_agent";

/// Create the food and local-culture specialist
pub fn create_local_guide_agent() -> AgentConfig {
    AgentConfig::new(LOCAL_GUIDE_AGENT_ID, "Local Guide Agent")
        .with_description(
            "Provide restaurants, neighborhoods, cultural tips, and current local highlights. \
             This agent searches for real recommendations.",
        )
        .with_instructions(
            r#"You provide restaurants, neighborhoods, cultural tips, and current local highlights.
ALWAYS use the search tools to find accurate, current information:
- Use search_food_restaurants for restaurant and food recommendations
- Use search_local_tips for cultural tips and travel advice

Include:
- Must-try local dishes and specific restaurant names (SEARCH for them!)
- Hidden gems and off-the-beaten-path spots
- Cultural tips and etiquette (SEARCH for current customs)
- Practical advice (transport cards, best times to visit, etc.)

Be specific with restaurant names and locations based on your research."#,
        )
        .with_tools(&["search_food_restaurants", "search_local_tips"])
}
