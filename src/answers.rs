//! Answer set
//!
//! Maps question ids to committed answers. Scalar answers (free text and
//! single choice) serialize as plain strings, multi-choice answers as arrays
//! in toggle order, so the persisted JSON stays human-readable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A committed answer for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Free text or a single-choice value
    Scalar(String),
    /// Multi-choice values in toggle order, no duplicates
    Many(Vec<String>),
}

/// All committed answers, keyed by question id
///
/// A key is present only once an answer has been committed for that
/// question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    entries: HashMap<String, AnswerValue>,
}

impl Answers {
    pub fn get(&self, id: &str) -> Option<&AnswerValue> {
        self.entries.get(id)
    }

    /// Scalar answer for a question, if one is committed
    pub fn scalar(&self, id: &str) -> Option<&str> {
        match self.entries.get(id) {
            Some(AnswerValue::Scalar(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Multi-choice selections for a question; empty when absent
    pub fn selections(&self, id: &str) -> &[String] {
        match self.entries.get(id) {
            Some(AnswerValue::Many(values)) => values.as_slice(),
            _ => &[],
        }
    }

    /// Overwrite the scalar answer for a free-text or single-choice question
    pub fn set_scalar(&mut self, id: &str, value: impl Into<String>) {
        self.entries.insert(id.to_string(), AnswerValue::Scalar(value.into()));
    }

    /// Toggle membership of `value` in a multi-choice answer
    ///
    /// Adds the value if absent, removes it if present. Creates the entry on
    /// first toggle; an existing scalar under the same id is replaced.
    pub fn toggle(&mut self, id: &str, value: &str) {
        let entry = self
            .entries
            .entry(id.to_string())
            .and_modify(|v| {
                if !matches!(v, AnswerValue::Many(_)) {
                    *v = AnswerValue::Many(Vec::new());
                }
            })
            .or_insert_with(|| AnswerValue::Many(Vec::new()));

        if let AnswerValue::Many(values) = entry {
            match values.iter().position(|v| v == value) {
                Some(i) => {
                    values.remove(i);
                }
                None => values.push(value.to_string()),
            }
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.entries.remove(id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_overwrite() {
        let mut answers = Answers::default();
        answers.set_scalar("name", "Ada");
        answers.set_scalar("name", "Grace");
        assert_eq!(answers.scalar("name"), Some("Grace"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn test_toggle_preserves_order_and_removes() {
        let mut answers = Answers::default();
        answers.toggle("goals", "health");
        answers.toggle("goals", "finance");
        answers.toggle("goals", "mental");
        assert_eq!(answers.selections("goals"), ["health", "finance", "mental"]);

        answers.toggle("goals", "finance");
        assert_eq!(answers.selections("goals"), ["health", "mental"]);
    }

    #[test]
    fn test_toggle_twice_is_involution() {
        let mut answers = Answers::default();
        answers.toggle("goals", "health");
        answers.toggle("goals", "learning");
        answers.toggle("goals", "learning");
        assert_eq!(answers.selections("goals"), ["health"]);
    }

    #[test]
    fn test_absent_keys() {
        let answers = Answers::default();
        assert!(answers.scalar("name").is_none());
        assert!(answers.selections("goals").is_empty());
        assert!(answers.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut answers = Answers::default();
        answers.set_scalar("name", "Ada");
        answers.toggle("goals", "health");
        answers.toggle("goals", "mental");

        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["goals"], serde_json::json!(["health", "mental"]));
    }

    #[test]
    fn test_round_trip() {
        let mut answers = Answers::default();
        answers.set_scalar("name", "Ada");
        answers.set_scalar("wake_time", "early");
        answers.toggle("goals", "finance");
        answers.toggle("goals", "health");

        let json = serde_json::to_string(&answers).unwrap();
        let restored: Answers = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, answers);
        assert_eq!(restored.selections("goals"), ["finance", "health"]);
    }
}
