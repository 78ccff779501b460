//! Generated plan domain types
//!
//! A [`WeeklyPlan`] is what the generation service returns: an optional
//! summary plus habits grouped by weekday. Time and duration are free-form
//! labels straight from the service; nothing here parses them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Days of the week, ordered Monday first
///
/// Serializes to the full English day name, which is also the key format
/// the generation service uses in its `days` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in calendar order
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Parse a day name, case-insensitive, full name or 3-letter abbreviation
    pub fn parse(s: &str) -> Option<Weekday> {
        let lower = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.name().to_lowercase() == lower || d.name()[..3].to_lowercase() == lower)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The seven fixed habit categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Mental,
    Productivity,
    Learning,
    Relationships,
    Creativity,
    Finance,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Mental => "mental",
            Category::Productivity => "productivity",
            Category::Learning => "learning",
            Category::Relationships => "relationships",
            Category::Creativity => "creativity",
            Category::Finance => "finance",
        }
    }

    /// Display icon used by the terminal renderer
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Health => "💪",
            Category::Mental => "🧠",
            Category::Productivity => "⚡",
            Category::Learning => "📚",
            Category::Relationships => "❤️",
            Category::Creativity => "🎨",
            Category::Finance => "💰",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single habit in the weekly plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub title: String,
    /// Suggested time of day, free-form (e.g. "7:00 AM")
    pub time: String,
    /// Suggested duration, free-form (e.g. "15 minutes")
    pub duration: String,
    pub category: Category,
}

/// A generated weekly habit plan
///
/// Any day may be absent or empty; consumers read through [`WeeklyPlan::habits_for`]
/// which hides the distinction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub days: BTreeMap<Weekday, Vec<Habit>>,
}

impl WeeklyPlan {
    /// Habits for one day; empty slice when the day is absent
    pub fn habits_for(&self, day: Weekday) -> &[Habit] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    pub fn total_habits(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// Per-habit completion flags, keyed `"<Day>-<index>"`
///
/// Lifecycle is independent of the plan: reset whenever a new plan is
/// generated, persisted on every toggle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLog {
    entries: HashMap<String, bool>,
}

impl CompletionLog {
    fn key(day: Weekday, index: usize) -> String {
        format!("{}-{}", day, index)
    }

    pub fn is_done(&self, day: Weekday, index: usize) -> bool {
        self.entries.get(&Self::key(day, index)).copied().unwrap_or(false)
    }

    pub fn set(&mut self, day: Weekday, index: usize, done: bool) {
        self.entries.insert(Self::key(day, index), done);
    }

    /// Flip one flag and return the new value
    pub fn toggle(&mut self, day: Weekday, index: usize) -> bool {
        let done = !self.is_done(day, index);
        self.set(day, index, done);
        done
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
