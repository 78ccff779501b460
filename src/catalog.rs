//! Question catalog
//!
//! The ordered definition of every questionnaire step. The catalog itself is
//! immutable once built; options for the dynamic question are resolved and
//! cached by the session, never written back into the catalog.

use serde::{Deserialize, Serialize};

/// One selectable option: a snake_case value plus a display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Free-form text input
    FreeText,
    /// Exactly one option
    SingleChoice,
    /// Any number of options, at least one required to advance
    MultiChoice,
    /// Like MultiChoice, but options come from the generation service,
    /// seeded by the answer to the `depends_on` question
    DynamicMultiChoice,
}

/// One entry in the catalog
#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<Choice>,
    /// FreeText only: whether an empty answer blocks advancing
    pub required: bool,
    /// DynamicMultiChoice only: id of the question whose answer seeds
    /// the option fetch
    pub depends_on: Option<String>,
    /// FreeText only: input hint shown by the presentation layer
    pub placeholder: Option<String>,
}

impl Question {
    pub fn free_text(id: &str, prompt: &str, placeholder: &str, required: bool) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::FreeText,
            prompt: prompt.to_string(),
            options: Vec::new(),
            required,
            depends_on: None,
            placeholder: Some(placeholder.to_string()),
        }
    }

    pub fn single(id: &str, prompt: &str, options: Vec<Choice>) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::SingleChoice,
            prompt: prompt.to_string(),
            options,
            required: false,
            depends_on: None,
            placeholder: None,
        }
    }

    pub fn multi(id: &str, prompt: &str, options: Vec<Choice>) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::MultiChoice,
            prompt: prompt.to_string(),
            options,
            required: false,
            depends_on: None,
            placeholder: None,
        }
    }

    pub fn dynamic(id: &str, prompt: &str, depends_on: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: QuestionKind::DynamicMultiChoice,
            prompt: prompt.to_string(),
            options: Vec::new(),
            required: false,
            depends_on: Some(depends_on.to_string()),
            placeholder: None,
        }
    }
}

/// The ordered questionnaire
#[derive(Debug, Clone)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    pub fn by_id(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// The full nine-question profile questionnaire
    pub fn standard() -> Self {
        Self::build(true)
    }

    /// Variant without the free-text custom-interests question
    ///
    /// Whether that question appears is a configuration choice, both forms
    /// ship in production.
    pub fn standard_without_custom_interests() -> Self {
        Self::build(false)
    }

    fn build(custom_interests: bool) -> Self {
        let mut questions = vec![
            Question::free_text("name", "What's your name?", "Enter your name", true),
            Question::single(
                "age_group",
                "Which age group do you belong to?",
                vec![
                    Choice::new("18-25", "18-25 years"),
                    Choice::new("26-35", "26-35 years"),
                    Choice::new("36-45", "36-45 years"),
                    Choice::new("46-55", "46-55 years"),
                    Choice::new("55+", "55+ years"),
                ],
            ),
            Question::single(
                "occupation",
                "What best describes your occupation?",
                vec![
                    Choice::new("student", "📚 Student"),
                    Choice::new("employed", "💼 Employed (Office/Remote)"),
                    Choice::new("freelancer", "🎨 Freelancer/Self-employed"),
                    Choice::new("homemaker", "🏠 Homemaker"),
                    Choice::new("retired", "🌴 Retired"),
                ],
            ),
            Question::multi(
                "goals",
                "What are your main goals? (Select all that apply)",
                vec![
                    Choice::new("health", "💪 Improve physical health"),
                    Choice::new("mental", "🧠 Better mental wellbeing"),
                    Choice::new("productivity", "⚡ Increase productivity"),
                    Choice::new("learning", "📖 Learn new skills"),
                    Choice::new("relationships", "❤️ Strengthen relationships"),
                    Choice::new("creativity", "🎯 Boost creativity"),
                    Choice::new("finance", "💰 Financial wellness"),
                ],
            ),
            Question::dynamic(
                "interests",
                "Based on your goals, here are some activities that might help you. \
                 Select the ones that interest you:",
                "goals",
            ),
        ];

        if custom_interests {
            questions.push(Question::free_text(
                "custom_interests",
                "Anything else you want to explore or learn?",
                "E.g., learning guitar, photography, public speaking, coding...",
                false,
            ));
        }

        questions.extend([
            Question::single(
                "time_availability",
                "How much time can you dedicate to habits daily?",
                vec![
                    Choice::new("15-30", "⏱️ 15-30 minutes"),
                    Choice::new("30-60", "⏱️ 30-60 minutes"),
                    Choice::new("60-90", "⏱️ 1-1.5 hours"),
                    Choice::new("90+", "⏱️ More than 1.5 hours"),
                ],
            ),
            Question::single(
                "wake_time",
                "What time do you usually wake up?",
                vec![
                    Choice::new("early", "🌅 Early bird (5-7 AM)"),
                    Choice::new("normal", "☀️ Normal (7-9 AM)"),
                    Choice::new("late", "🌙 Late riser (9 AM+)"),
                ],
            ),
            Question::single(
                "challenge_level",
                "How challenging do you want your habit plan to be?",
                vec![
                    Choice::new("easy", "🌱 Easy - Start small and build up"),
                    Choice::new("moderate", "🌿 Moderate - Balanced challenge"),
                    Choice::new("intense", "🔥 Intense - Push my limits"),
                ],
            ),
        ]);

        Self::new(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.get(0).unwrap().id, "name");
        assert_eq!(catalog.get(8).unwrap().id, "challenge_level");
        assert!(catalog.get(0).unwrap().required);
        assert!(!catalog.by_id("custom_interests").unwrap().required);
    }

    #[test]
    fn test_variant_without_custom_interests() {
        let catalog = Catalog::standard_without_custom_interests();
        assert_eq!(catalog.len(), 8);
        assert!(catalog.by_id("custom_interests").is_none());
        // Order of the remaining questions is unchanged
        assert!(catalog.position("interests").unwrap() < catalog.position("time_availability").unwrap());
    }

    #[test]
    fn test_dynamic_question_depends_on_goals() {
        let catalog = Catalog::standard();
        let interests = catalog.by_id("interests").unwrap();
        assert_eq!(interests.kind, QuestionKind::DynamicMultiChoice);
        assert_eq!(interests.depends_on.as_deref(), Some("goals"));
        assert!(interests.options.is_empty());
        // The dependency is an earlier MultiChoice question
        let goals = catalog.by_id("goals").unwrap();
        assert_eq!(goals.kind, QuestionKind::MultiChoice);
        assert!(catalog.position("goals").unwrap() < catalog.position("interests").unwrap());
    }
}
