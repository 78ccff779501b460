//! Plan export
//!
//! Deterministic renderings of a generated plan: a plain-text document and
//! a markdown document suitable for printing. Both group habits by weekday
//! in fixed Monday-to-Sunday order and consume nothing beyond the plan, the
//! user's name, and the generation date.

use chrono::NaiveDate;

use crate::plan::{Weekday, WeeklyPlan};

/// Render the plan as a plain-text document
pub fn render_text(plan: &WeeklyPlan, name: &str, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("Weekly Habits Plan\n");
    out.push_str(&format!("Personalized for {}\n", name));
    out.push_str(&format!("Generated on {}\n", date.format("%Y-%m-%d")));

    if let Some(summary) = &plan.summary {
        out.push('\n');
        out.push_str(summary);
        out.push('\n');
    }

    for day in Weekday::ALL {
        let habits = plan.habits_for(day);
        if habits.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(day.name());
        out.push('\n');
        for (i, habit) in habits.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {}\n     {}  •  {}  •  {}\n",
                i + 1,
                habit.title,
                habit.time,
                habit.duration,
                habit.category
            ));
        }
    }

    out
}

/// Render the plan as a markdown document
pub fn render_markdown(plan: &WeeklyPlan, name: &str, date: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("# Weekly Habits Plan\n\n");
    out.push_str(&format!("Personalized for **{}**, generated on {}.\n", name, date.format("%Y-%m-%d")));

    if let Some(summary) = &plan.summary {
        out.push('\n');
        out.push_str(&format!("> {}\n", summary));
    }

    for day in Weekday::ALL {
        let habits = plan.habits_for(day);
        if habits.is_empty() {
            continue;
        }
        out.push_str(&format!("\n## {}\n\n", day));
        for (i, habit) in habits.iter().enumerate() {
            out.push_str(&format!(
                "{}. **{}** ({}, {}) `{}`\n",
                i + 1,
                habit.title,
                habit.time,
                habit.duration,
                habit.category
            ));
        }
    }

    out
}
