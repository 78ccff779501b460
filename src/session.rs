//! Questionnaire session
//!
//! The controller driving catalog traversal: validation, forward and
//! backward navigation, dynamic option resolution, plan generation, and
//! completion tracking. All state lives in the session object; every
//! mutation is flushed to the store before control returns to the caller.
//!
//! The session runs on one logical thread. Both network operations (option
//! resolution and plan generation) are awaited inline, so no input can
//! arrive while a request is outstanding and in-flight requests are never
//! overlapped.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::answers::Answers;
use crate::catalog::{Catalog, Choice, Question, QuestionKind};
use crate::generate::{GenerateError, PlanGenerator};
use crate::plan::{CompletionLog, Weekday, WeeklyPlan};
use crate::prompt::build_prompt;
use crate::store::Store;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input on the question at this index
    Presenting(usize),
    /// Resolving dynamic options for the question at this index
    Resolving(usize),
    /// Questionnaire finished, plan generated
    Completed,
}

/// Outcome of a navigation operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Validation failed; nothing changed
    Refused,
    /// Now presenting the question at this index
    Presenting(usize),
    /// Plan generated and persisted
    Completed,
}

/// Outcome of [`Session::retry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// Generation re-ran and succeeded
    Generated,
    /// No answers existed; the session was fully restarted
    Restarted,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),
}

/// Dynamic options cached against a fingerprint of the dependency answer
struct ResolvedOptions {
    fingerprint: String,
    options: Vec<Choice>,
}

/// A value derived from the dependency answer, used to key the cache
fn fingerprint(goals: &[String]) -> String {
    goals.join("\u{1f}")
}

/// The questionnaire controller
pub struct Session {
    catalog: Catalog,
    answers: Answers,
    cursor: usize,
    phase: Phase,
    resolved: Option<ResolvedOptions>,
    plan: Option<WeeklyPlan>,
    status: CompletionLog,
    generator: Arc<dyn PlanGenerator>,
    store: Store,
}

impl Session {
    /// Create a fresh session with no prior state
    pub fn new(catalog: Catalog, generator: Arc<dyn PlanGenerator>, store: Store) -> Self {
        Self {
            catalog,
            answers: Answers::default(),
            cursor: 0,
            phase: Phase::Presenting(0),
            resolved: None,
            plan: None,
            status: CompletionLog::default(),
            generator,
            store,
        }
    }

    /// Create a session restored from persisted state
    ///
    /// Absence of any persisted key is treated as no prior state. A saved
    /// plan resumes directly in `Completed`; saved answers alone resume the
    /// questionnaire from the beginning with the answers pre-filled.
    pub fn resume(catalog: Catalog, generator: Arc<dyn PlanGenerator>, store: Store) -> Self {
        let answers = store.load_answers().unwrap_or_default();
        let plan = store.load_plan();
        let status = store.load_status().unwrap_or_default();
        let phase = if plan.is_some() { Phase::Completed } else { Phase::Presenting(0) };
        debug!(answer_count = answers.len(), has_plan = plan.is_some(), "Resumed session");

        Self {
            catalog,
            answers,
            cursor: 0,
            phase,
            resolved: None,
            plan,
            status,
            generator,
            store,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn plan(&self) -> Option<&WeeklyPlan> {
        self.plan.as_ref()
    }

    pub fn status(&self) -> &CompletionLog {
        &self.status
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.catalog.get(self.cursor)
    }

    /// Options for the current question
    ///
    /// For the dynamic question these are the resolved suggestions; empty
    /// until resolution has run.
    pub fn current_options(&self) -> &[Choice] {
        match self.catalog.get(self.cursor) {
            Some(q) if q.kind == QuestionKind::DynamicMultiChoice => {
                self.resolved.as_ref().map(|r| r.options.as_slice()).unwrap_or_default()
            }
            Some(q) => &q.options,
            None => &[],
        }
    }

    /// (current 1-based position, total questions)
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.catalog.len())
    }

    /// Reset to the first question, clearing answers and resolved options
    ///
    /// The stored plan survives until the next successful generation.
    pub fn start(&mut self) {
        info!("Starting questionnaire");
        self.cursor = 0;
        self.answers.clear();
        self.resolved = None;
        self.phase = Phase::Presenting(0);
        self.store.save_answers(&self.answers);
    }

    /// Full reset: answers, plan, completion state, and persisted files
    pub fn restart(&mut self) {
        info!("Restarting session");
        self.start();
        self.plan = None;
        self.status = CompletionLog::default();
        self.store.clear();
    }

    /// Commit an answer for a question
    ///
    /// Scalar questions overwrite; multi-choice questions toggle membership
    /// of `value`. No validation happens here.
    pub fn submit(&mut self, id: &str, value: &str) -> Result<(), SessionError> {
        let kind = self
            .catalog
            .by_id(id)
            .map(|q| q.kind)
            .ok_or_else(|| SessionError::UnknownQuestion(id.to_string()))?;

        match kind {
            QuestionKind::FreeText => self.answers.set_scalar(id, value.trim()),
            QuestionKind::SingleChoice => self.answers.set_scalar(id, value),
            QuestionKind::MultiChoice | QuestionKind::DynamicMultiChoice => self.answers.toggle(id, value),
        }
        self.store.save_answers(&self.answers);
        Ok(())
    }

    /// Whether the answer at `index` permits advancing
    pub fn validate(&self, index: usize) -> bool {
        let Some(q) = self.catalog.get(index) else {
            return false;
        };
        match q.kind {
            QuestionKind::FreeText => {
                !q.required || self.answers.scalar(&q.id).is_some_and(|s| !s.trim().is_empty())
            }
            QuestionKind::SingleChoice => self.answers.scalar(&q.id).is_some(),
            QuestionKind::MultiChoice | QuestionKind::DynamicMultiChoice => {
                !self.answers.selections(&q.id).is_empty()
            }
        }
    }

    /// Move forward one question, or generate the plan at the end
    ///
    /// Refuses without any state change when the current answer fails
    /// validation. Entering the dynamic question resolves its options first;
    /// resolution never fails. A plan-generation failure leaves the session
    /// unchanged so the identical call can be retried.
    pub async fn advance(&mut self) -> Result<Step, GenerateError> {
        if matches!(self.phase, Phase::Completed) {
            return Ok(Step::Completed);
        }
        let i = self.cursor;
        if !self.validate(i) {
            debug!(cursor = i, "Advance refused by validation");
            return Ok(Step::Refused);
        }

        if i + 1 >= self.catalog.len() {
            self.generate().await?;
            return Ok(Step::Completed);
        }

        self.cursor = i + 1;
        let entering_dynamic = self
            .catalog
            .get(self.cursor)
            .is_some_and(|q| q.kind == QuestionKind::DynamicMultiChoice);
        if entering_dynamic {
            self.resolve_options(self.cursor).await;
        }
        self.phase = Phase::Presenting(self.cursor);
        Ok(Step::Presenting(self.cursor))
    }

    /// Move back one question
    ///
    /// Leaving the dynamic question clears its resolved options and its
    /// answer: upstream goal changes must always regenerate the downstream
    /// suggestions.
    pub fn retreat(&mut self) -> Step {
        if matches!(self.phase, Phase::Completed) {
            return Step::Completed;
        }
        if self.cursor == 0 {
            return Step::Presenting(0);
        }

        let leaving_dynamic = self
            .catalog
            .get(self.cursor)
            .filter(|q| q.kind == QuestionKind::DynamicMultiChoice)
            .map(|q| q.id.clone());
        if let Some(id) = leaving_dynamic {
            debug!(question = %id, "Clearing dynamic options and answer on retreat");
            self.resolved = None;
            self.answers.remove(&id);
            self.store.save_answers(&self.answers);
        }

        self.cursor -= 1;
        self.phase = Phase::Presenting(self.cursor);
        Step::Presenting(self.cursor)
    }

    /// Re-run plan generation from the current answers
    ///
    /// Follows the identical path as first-time generation, including the
    /// completion-state reset.
    pub async fn regenerate(&mut self) -> Result<(), GenerateError> {
        self.generate().await
    }

    /// Retry after a failed generation
    ///
    /// Re-runs the identical generation call when any answers exist,
    /// otherwise routes to a full restart.
    pub async fn retry(&mut self) -> Result<RetryOutcome, GenerateError> {
        if self.answers.is_empty() {
            self.restart();
            return Ok(RetryOutcome::Restarted);
        }
        self.generate().await?;
        Ok(RetryOutcome::Generated)
    }

    /// Flip completion for one habit and persist; returns the new value
    pub fn toggle_habit(&mut self, day: Weekday, index: usize) -> bool {
        let done = self.status.toggle(day, index);
        self.store.save_status(&self.status);
        done
    }

    async fn generate(&mut self) -> Result<(), GenerateError> {
        let prompt = build_prompt(&self.answers);
        info!(prompt_len = prompt.len(), "Requesting weekly plan");
        let plan = self.generator.generate_plan(&prompt).await?;
        info!(habit_count = plan.total_habits(), "Plan generated");

        // New plan: nothing is pre-completed
        self.status = CompletionLog::default();
        self.store.save_plan(&plan);
        self.store.save_status(&self.status);
        self.plan = Some(plan);
        self.phase = Phase::Completed;
        Ok(())
    }

    async fn resolve_options(&mut self, index: usize) {
        let Some(dep) = self.catalog.get(index).and_then(|q| q.depends_on.clone()) else {
            return;
        };
        let goals = self.answers.selections(&dep).to_vec();
        let fp = fingerprint(&goals);
        if self.resolved.as_ref().is_some_and(|r| r.fingerprint == fp) {
            debug!(cursor = index, "Dynamic options already resolved for this dependency answer");
            return;
        }

        self.phase = Phase::Resolving(index);
        let options = self.generator.suggest_activities(&goals).await;
        debug!(count = options.len(), "Resolved dynamic options");
        self.resolved = Some(ResolvedOptions { fingerprint: fp, options });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Category, Habit};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct MockGenerator {
        plan: Mutex<Option<WeeklyPlan>>,
        suggest_calls: AtomicUsize,
        suggested_goals: Mutex<Vec<Vec<String>>>,
    }

    impl MockGenerator {
        fn new(plan: Option<WeeklyPlan>) -> Arc<Self> {
            Arc::new(Self {
                plan: Mutex::new(plan),
                suggest_calls: AtomicUsize::new(0),
                suggested_goals: Mutex::new(Vec::new()),
            })
        }

        fn set_plan(&self, plan: Option<WeeklyPlan>) {
            *self.plan.lock().unwrap() = plan;
        }
    }

    #[async_trait]
    impl PlanGenerator for MockGenerator {
        async fn suggest_activities(&self, goals: &[String]) -> Vec<Choice> {
            self.suggest_calls.fetch_add(1, Ordering::SeqCst);
            self.suggested_goals.lock().unwrap().push(goals.to_vec());
            vec![
                Choice::new("mock_yoga", "🧘 Mock Yoga"),
                Choice::new("mock_runs", "🏃 Mock Runs"),
            ]
        }

        async fn generate_plan(&self, _prompt: &str) -> Result<WeeklyPlan, GenerateError> {
            self.plan
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| GenerateError::Malformed("mock generation failure".to_string()))
        }
    }

    fn sample_plan() -> WeeklyPlan {
        let mut plan = WeeklyPlan {
            summary: Some("Steady does it".to_string()),
            ..Default::default()
        };
        plan.days.insert(
            Weekday::Monday,
            vec![Habit {
                title: "10-minute stretch".to_string(),
                time: "7:00 AM".to_string(),
                duration: "10 min".to_string(),
                category: Category::Health,
            }],
        );
        plan
    }

    fn session_with(generator: Arc<MockGenerator>) -> (Session, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path().join("store")).unwrap();
        let session = Session::new(Catalog::standard(), generator, store);
        (session, temp)
    }

    /// Answer questions 0..=3 validly and advance to the dynamic question
    async fn advance_to_interests(session: &mut Session) {
        session.submit("name", "Ada").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(1));
        session.submit("age_group", "26-35").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(2));
        session.submit("occupation", "freelancer").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(3));
        session.submit("goals", "health").unwrap();
        session.submit("goals", "learning").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(4));
    }

    /// Finish the questionnaire from the dynamic question onwards
    async fn finish_from_interests(session: &mut Session) -> Result<Step, GenerateError> {
        session.submit("interests", "mock_yoga").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(5));
        // custom_interests is optional, leave it empty
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(6));
        session.submit("time_availability", "30-60").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(7));
        session.submit("wake_time", "early").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(8));
        session.submit("challenge_level", "moderate").unwrap();
        session.advance().await
    }

    #[tokio::test]
    async fn test_full_walk_completes_and_persists() {
        let generator = MockGenerator::new(Some(sample_plan()));
        let (mut session, temp) = session_with(generator.clone());

        advance_to_interests(&mut session).await;
        assert_eq!(session.current_options().len(), 2);
        let step = finish_from_interests(&mut session).await.unwrap();
        assert_eq!(step, Step::Completed);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.plan().unwrap().total_habits(), 1);
        assert!(session.status().is_empty());

        // Plan and answers were flushed
        let store = Store::open(temp.path().join("store")).unwrap();
        assert_eq!(store.load_plan().unwrap(), sample_plan());
        assert_eq!(store.load_answers().unwrap().scalar("name"), Some("Ada"));
    }

    #[tokio::test]
    async fn test_advance_refused_without_answer() {
        let generator = MockGenerator::new(None);
        let (mut session, _temp) = session_with(generator);

        assert_eq!(session.advance().await.unwrap(), Step::Refused);
        assert_eq!(session.cursor(), 0);

        // Whitespace-only text fails a required question too
        session.submit("name", "   ").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Refused);
        assert_eq!(session.cursor(), 0);
    }

    #[tokio::test]
    async fn test_multi_choice_refused_when_emptied() {
        let generator = MockGenerator::new(None);
        let (mut session, _temp) = session_with(generator);
        session.submit("name", "Ada").unwrap();
        session.advance().await.unwrap();
        session.submit("age_group", "26-35").unwrap();
        session.advance().await.unwrap();
        session.submit("occupation", "student").unwrap();
        session.advance().await.unwrap();

        // Toggle on then off: the selection set is empty again
        session.submit("goals", "health").unwrap();
        session.submit("goals", "health").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Refused);
        assert_eq!(session.cursor(), 3);
    }

    #[tokio::test]
    async fn test_retreat_from_dynamic_clears_and_re_resolves() {
        let generator = MockGenerator::new(None);
        let (mut session, _temp) = session_with(generator.clone());

        advance_to_interests(&mut session).await;
        assert_eq!(generator.suggest_calls.load(Ordering::SeqCst), 1);
        session.submit("interests", "mock_yoga").unwrap();

        assert_eq!(session.retreat(), Step::Presenting(3));
        assert!(session.answers().selections("interests").is_empty());

        // Change the upstream goals; re-entry resolves with the new seed
        session.submit("goals", "finance").unwrap();
        assert_eq!(session.advance().await.unwrap(), Step::Presenting(4));
        assert_eq!(generator.suggest_calls.load(Ordering::SeqCst), 2);
        let seeds = generator.suggested_goals.lock().unwrap();
        assert_eq!(seeds[0], ["health", "learning"]);
        assert_eq!(seeds[1], ["health", "learning", "finance"]);
    }

    #[tokio::test]
    async fn test_retreat_at_start_is_noop() {
        let generator = MockGenerator::new(None);
        let (mut session, _temp) = session_with(generator);
        assert_eq!(session.retreat(), Step::Presenting(0));
        assert_eq!(session.cursor(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_session_retryable() {
        let generator = MockGenerator::new(None);
        let (mut session, _temp) = session_with(generator.clone());

        advance_to_interests(&mut session).await;
        let err = finish_from_interests(&mut session).await.unwrap_err();
        assert!(err.to_string().contains("mock generation failure"));
        assert_eq!(session.cursor(), 8);
        assert_ne!(session.phase(), Phase::Completed);
        assert!(session.plan().is_none());

        // Service recovers; retry re-runs the identical call
        generator.set_plan(Some(sample_plan()));
        assert_eq!(session.retry().await.unwrap(), RetryOutcome::Generated);
        assert_eq!(session.phase(), Phase::Completed);
        assert!(session.plan().is_some());
    }

    #[tokio::test]
    async fn test_retry_with_no_answers_restarts() {
        let generator = MockGenerator::new(None);
        let (mut session, _temp) = session_with(generator);
        assert_eq!(session.retry().await.unwrap(), RetryOutcome::Restarted);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.phase(), Phase::Presenting(0));
    }

    #[tokio::test]
    async fn test_regeneration_resets_completion_state() {
        let generator = MockGenerator::new(Some(sample_plan()));
        let (mut session, _temp) = session_with(generator);

        advance_to_interests(&mut session).await;
        finish_from_interests(&mut session).await.unwrap();

        assert!(session.toggle_habit(Weekday::Monday, 0));
        assert!(!session.status().is_empty());

        session.regenerate().await.unwrap();
        assert!(session.status().is_empty());
        assert!(!session.status().is_done(Weekday::Monday, 0));
    }

    #[tokio::test]
    async fn test_start_clears_answers_but_keeps_plan() {
        let generator = MockGenerator::new(Some(sample_plan()));
        let (mut session, _temp) = session_with(generator);

        advance_to_interests(&mut session).await;
        finish_from_interests(&mut session).await.unwrap();

        session.start();
        assert_eq!(session.cursor(), 0);
        assert!(session.answers().is_empty());
        assert!(session.plan().is_some());

        session.restart();
        assert!(session.plan().is_none());
    }

    #[tokio::test]
    async fn test_resume_with_saved_plan() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("store");
        {
            let store = Store::open(&dir).unwrap();
            store.save_plan(&sample_plan());
            let mut status = CompletionLog::default();
            status.set(Weekday::Monday, 0, true);
            store.save_status(&status);
        }

        let generator = MockGenerator::new(None);
        let store = Store::open(&dir).unwrap();
        let session = Session::resume(Catalog::standard(), generator, store);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.plan().unwrap(), &sample_plan());
        assert!(session.status().is_done(Weekday::Monday, 0));
    }

    #[tokio::test]
    async fn test_submit_unknown_question() {
        let generator = MockGenerator::new(None);
        let (mut session, _temp) = session_with(generator);
        let err = session.submit("favorite_color", "blue").unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion(_)));
    }

    #[tokio::test]
    async fn test_dynamic_options_empty_before_resolution() {
        let generator = MockGenerator::new(None);
        let (session, _temp) = session_with(generator);
        // Not at the dynamic question yet; its options are invisible anyway
        assert_eq!(session.current_question().unwrap().id, "name");
        assert!(session.current_options().is_empty());
    }
}
