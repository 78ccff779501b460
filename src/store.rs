//! Best-effort persistence for answers, plan, and completion state
//!
//! One JSON file per key under a data directory. The contract is explicit:
//! loads treat a missing or unreadable file as "no prior state", saves log
//! and swallow every error. Persistence never blocks in-memory progress and
//! is never authoritative.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::answers::Answers;
use crate::plan::{CompletionLog, WeeklyPlan};

const ANSWERS_FILE: &str = "answers.json";
const PLAN_FILE: &str = "plan.json";
const STATUS_FILE: &str = "status.json";

/// File-backed store for the three persisted keys
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open or create a store at the given directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create store directory")?;
        debug!(?dir, "Opened habit store");
        Ok(Self { dir })
    }

    pub fn load_answers(&self) -> Option<Answers> {
        self.load(ANSWERS_FILE)
    }

    pub fn load_plan(&self) -> Option<WeeklyPlan> {
        self.load(PLAN_FILE)
    }

    pub fn load_status(&self) -> Option<CompletionLog> {
        self.load(STATUS_FILE)
    }

    pub fn save_answers(&self, answers: &Answers) {
        self.save(ANSWERS_FILE, answers);
    }

    pub fn save_plan(&self, plan: &WeeklyPlan) {
        self.save(PLAN_FILE, plan);
    }

    pub fn save_status(&self, status: &CompletionLog) {
        self.save(STATUS_FILE, status);
    }

    /// Remove all persisted state
    pub fn clear(&self) {
        for name in [ANSWERS_FILE, PLAN_FILE, STATUS_FILE] {
            let path = self.dir.join(name);
            if let Err(e) = fs::remove_file(&path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!(?path, error = %e, "Failed to remove persisted state");
            }
        }
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.dir.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                debug!(?path, error = %e, "No persisted state");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(?path, error = %e, "Discarding unreadable persisted state");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) {
        let path = self.dir.join(name);
        let result = serde_json::to_string_pretty(value)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&path, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            warn!(?path, error = %e, "Failed to persist state");
        }
    }
}
