//! Prompt builder
//!
//! Pure function from the answer set to the natural-language generation
//! request. Missing or empty answers fall back to fixed defaults; building
//! a prompt never fails.

use handlebars::Handlebars;
use serde::Serialize;
use tracing::warn;

use crate::answers::Answers;

const TEMPLATE: &str = "\
Create a personalized weekly habit plan for {{name}} with the following profile:

- Age group: {{age_group}}
- Occupation: {{occupation}}
- Main goals: {{goals}}
- Interests: {{interests}}
- Daily time available: {{time_availability}} minutes
- Wake up time: {{wake_time}}
- Desired challenge level: {{challenge_level}}

Create practical, specific habits that:
1. Align with their goals and interests
2. Fit their available time
3. Consider their occupation and lifestyle
4. Have appropriate timing based on wake time
5. Include a mix of morning, afternoon, and evening habits
6. Make weekends slightly different (more relaxed or personal time)
7. Are achievable given their challenge preference

Make habits specific and actionable (e.g., \"10-minute morning stretch\" instead of just \"exercise\").";

/// Template values extracted from the answer set, defaults applied
#[derive(Debug, Clone, Serialize)]
struct PromptContext {
    name: String,
    age_group: String,
    occupation: String,
    goals: String,
    interests: String,
    time_availability: String,
    wake_time: String,
    challenge_level: String,
}

impl PromptContext {
    fn from_answers(answers: &Answers) -> Self {
        let mut interests = answers.selections("interests").join(", ");
        if let Some(custom) = answers.scalar("custom_interests")
            && !custom.trim().is_empty()
        {
            if interests.is_empty() {
                interests = custom.trim().to_string();
            } else {
                interests.push_str(", ");
                interests.push_str(custom.trim());
            }
        }

        Self {
            name: scalar_or(answers, "name", "User"),
            age_group: scalar_or(answers, "age_group", "adult"),
            occupation: scalar_or(answers, "occupation", "employed"),
            goals: answers.selections("goals").join(", "),
            interests,
            time_availability: scalar_or(answers, "time_availability", "30-60"),
            wake_time: scalar_or(answers, "wake_time", "normal"),
            challenge_level: scalar_or(answers, "challenge_level", "moderate"),
        }
    }
}

fn scalar_or(answers: &Answers, id: &str, default: &str) -> String {
    match answers.scalar(id) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// Build the plan-generation prompt from the committed answers
pub fn build_prompt(answers: &Answers) -> String {
    let ctx = PromptContext::from_answers(answers);
    let mut hb = Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    hb.render_template(TEMPLATE, &ctx).unwrap_or_else(|e| {
        warn!(error = %e, "Prompt template failed to render");
        format!("Create a personalized weekly habit plan for {}.", ctx.name)
    })
}
