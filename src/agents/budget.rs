// Budget Agent Configuration

use crate::agent::AgentConfig;

pub const BUDGET_AGENT_ID: &str = "budget_agent";

/// Create the cost estimation specialist
pub fn create_budget_agent() -> AgentConfig {
    AgentConfig::new(BUDGET_AGENT_ID, "Budget Agent")
        .with_description(
            "Calculate and estimate the cost of a trip including accommodation, food, and \
             activities. This agent searches for real prices.",
        )
        .with_instructions(
            r#"You estimate costs for lodging, food, transport, and activities.
ALWAYS use the search tools to find current, accurate pricing information:
- Use search_accommodation_prices for hotel/hostel costs
- Use search_transport_costs for transportation costs

Include estimates for:
- Accommodation (hotels/hostels) - SEARCH for real prices
- Food (meals per day)
- Transportation (local + intercity) - SEARCH for real costs
- Activities and entrance fees
- Miscellaneous expenses

Flag if budget might be exceeded. Provide specific price ranges in USD based on your research.
When real-time prices are unavailable, give typical ranges and mark them as estimates."#,
        )
        .with_tools(&["search_accommodation_prices", "search_transport_costs"])
}
