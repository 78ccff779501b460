//! Plan generation client
//!
//! Two operations against the hosted generation service: activity
//! suggestions seeded by the user's goals, and full weekly plan synthesis
//! from the built prompt. Activity suggestion never fails outwardly; plan
//! generation surfaces a [`GenerateError`] the presentation layer turns
//! into a retry path.

use async_trait::async_trait;

mod error;
mod http;

pub use error::GenerateError;
pub use http::HttpGenerator;

use crate::catalog::Choice;
use crate::plan::WeeklyPlan;

/// Boundary to the external generation service
///
/// The service is a black box: request in, structured response out. The
/// trait exists so the questionnaire session can be driven against a mock
/// in tests.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Suggest activities for the given goals
    ///
    /// Empty goals yield the fixed default list without a network call; any
    /// failure yields the fixed fallback list. Duplicates are not filtered,
    /// the service is trusted to avoid them.
    async fn suggest_activities(&self, goals: &[String]) -> Vec<Choice>;

    /// Generate a weekly plan from the built prompt
    async fn generate_plan(&self, prompt: &str) -> Result<WeeklyPlan, GenerateError>;
}

/// Fixed activity list used when no goals are selected
pub fn default_activities() -> Vec<Choice> {
    vec![
        Choice::new("morning_routine", "🌅 Morning Routine & Planning"),
        Choice::new("exercise", "🏃 Physical Exercise"),
        Choice::new("meditation", "🧘 Meditation & Mindfulness"),
        Choice::new("reading", "📚 Reading & Learning"),
    ]
}

/// Fixed activity list used when the suggestion call fails
pub fn fallback_activities() -> Vec<Choice> {
    vec![
        Choice::new("morning_routine", "🌅 Morning Routine & Planning"),
        Choice::new("exercise", "🏃 Physical Exercise"),
        Choice::new("meditation", "🧘 Meditation & Mindfulness"),
        Choice::new("reading", "📚 Reading & Learning"),
        Choice::new("journaling", "✍️ Journaling & Reflection"),
        Choice::new("skill_practice", "🎯 Skill Practice"),
        Choice::new("networking", "🤝 Networking & Relationships"),
        Choice::new("finance_review", "💰 Financial Review"),
    ]
}
