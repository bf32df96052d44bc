// Agent Configurations Module
// Built-in role presets for the trip planner

pub mod budget;
pub mod local_guide;
pub mod planner;
pub mod travel;

use crate::agent::AgentConfig;

pub use budget::{create_budget_agent, BUDGET_AGENT_ID};
pub use local_guide::{create_local_guide_agent, LOCAL_GUIDE_AGENT_ID};
pub use planner::{create_planner_agent, PLANNER_AGENT_ID};
pub use travel::{create_travel_agent, TRAVEL_AGENT_ID};

/// The three specialists in the order the orchestrator is told to use them
pub fn default_specialists() -> Vec<AgentConfig> {
    vec![
        create_planner_agent(),
        create_budget_agent(),
        create_local_guide_agent(),
    ]
}
