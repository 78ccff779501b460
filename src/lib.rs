//! Habitplan - questionnaire-driven weekly habit planner
//!
//! Collects a user profile through a short questionnaire, sends it to a
//! hosted generation service to synthesize a weekly habit schedule, and
//! persists the result locally. The intelligence lives entirely in the
//! external service; this crate owns the questionnaire state machine, the
//! prompt, the service client, and the bookkeeping around them.
//!
//! # Modules
//!
//! - [`catalog`] - ordered question definitions
//! - [`answers`] - committed answers, persisted across sessions
//! - [`session`] - the questionnaire controller state machine
//! - [`prompt`] - answer set to generation prompt
//! - [`generate`] - generation service client with deterministic fallbacks
//! - [`plan`] - weekly plan and completion tracking
//! - [`store`] - best-effort JSON persistence
//! - [`export`] - plain-text and markdown plan renderings
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod answers;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod export;
pub mod generate;
pub mod plan;
pub mod prompt;
pub mod session;
pub mod store;

pub use answers::{AnswerValue, Answers};
pub use catalog::{Catalog, Choice, Question, QuestionKind};
pub use config::Config;
pub use generate::{GenerateError, HttpGenerator, PlanGenerator};
pub use plan::{Category, CompletionLog, Habit, Weekday, WeeklyPlan};
pub use prompt::build_prompt;
pub use session::{Phase, RetryOutcome, Session, SessionError, Step};
pub use store::Store;
