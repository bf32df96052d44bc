use crate::error::{Result, TripbotError};
use serde::{Deserialize, Serialize};

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 14;

/// Structured details collected by a form-style surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripHints {
    pub destination: String,
    pub days: u32,
    /// Total budget ceiling in USD
    pub budget: Option<f64>,
    pub preferences: Option<String>,
}

impl TripHints {
    /// Budget per day, when a budget was given
    pub fn daily_budget(&self) -> Option<f64> {
        self.budget.map(|b| b / f64::from(self.days.max(1)))
    }
}

/// One user request for a trip plan
///
/// Immutable once built. Emptiness is checked by the orchestrator, which
/// rejects a blank request before any model or specialist is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    raw_text: String,
    hints: Option<TripHints>,
}

impl TripRequest {
    /// Free-text request
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            raw_text: text.into(),
            hints: None,
        }
    }

    /// Request rendered from structured hints
    ///
    /// # Errors
    /// - `InvalidRequest` for a blank destination, days outside 1..=14 or a
    ///   non-positive budget
    pub fn from_hints(
        destination: &str,
        days: u32,
        budget: Option<f64>,
        preferences: Option<&str>,
    ) -> Result<Self> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(TripbotError::InvalidRequest(
                "destination must not be empty".to_string(),
            ));
        }

        if !(MIN_DAYS..=MAX_DAYS).contains(&days) {
            return Err(TripbotError::InvalidRequest(format!(
                "trip length must be between {} and {} days, got {}",
                MIN_DAYS, MAX_DAYS, days
            )));
        }

        if let Some(budget) = budget {
            if !(budget.is_finite() && budget > 0.0) {
                return Err(TripbotError::InvalidRequest(format!(
                    "budget must be a positive amount, got {}",
                    budget
                )));
            }
        }

        let hints = TripHints {
            destination: destination.to_string(),
            days,
            budget,
            preferences: preferences
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        };

        Ok(Self {
            raw_text: render_hints(&hints),
            hints: Some(hints),
        })
    }

    pub fn text(&self) -> &str {
        &self.raw_text
    }

    pub fn hints(&self) -> Option<&TripHints> {
        self.hints.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

fn render_hints(hints: &TripHints) -> String {
    let budget_clause = match hints.budget {
        Some(b) => format!(" with a budget of ${:.0}", b),
        None => String::new(),
    };
    let budget_step = match hints.budget {
        Some(b) => format!("estimate costs and ensure we stay under ${:.0}", b),
        None => "estimate costs".to_string(),
    };

    format!(
        "Plan a {days}-day trip to {destination}{budget_clause}.\n\
         Special preferences: {preferences}\n\
         \n\
         Please use all your agent tools to create a comprehensive travel plan:\n\
         1. Use planner_agent to create a day-by-day itinerary (it will search for real attractions)\n\
         2. Use budget_agent to {budget_step} (it will search for real prices)\n\
         3. Use local_guide_agent to get food recommendations and local tips (it will search for real restaurants)\n\
         \n\
         Combine all the information into a complete travel plan with accurate, researched information.",
        days = hints.days,
        destination = hints.destination,
        budget_clause = budget_clause,
        preferences = hints.preferences.as_deref().unwrap_or("None specified"),
        budget_step = budget_step,
    )
}
