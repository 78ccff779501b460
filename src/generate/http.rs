//! HTTP plan-generation client
//!
//! Speaks to the hosted generation service over two POST endpoints:
//! `/generate-activities` and `/generate-habits`. Transient failures are
//! retried with exponential backoff; plan responses are treated as opaque
//! text from which the first top-level JSON object is extracted, since the
//! service may wrap the payload in commentary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{GenerateError, PlanGenerator, default_activities, fallback_activities};
use crate::catalog::Choice;
use crate::config::Config;
use crate::plan::WeeklyPlan;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

#[derive(Debug, Deserialize)]
struct ActivitiesResponse {
    activities: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the hosted generation service
pub struct HttpGenerator {
    base_url: String,
    http: Client,
    max_retries: u32,
}

impl HttpGenerator {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self, GenerateError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GenerateError::Network)?;

        Ok(Self {
            base_url: config.service_url.trim_end_matches('/').to_string(),
            http,
            max_retries: MAX_RETRIES,
        })
    }

    /// Override the retry budget (tests use 0)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// POST a JSON body and return the success response as text
    async fn post_with_retry(&self, path: &str, body: &serde_json::Value) -> Result<String, GenerateError> {
        let url = format!("{}/{}", self.base_url, path);

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, %url, "Retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.http.post(&url).json(body).send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "Network error");
                    last_error = Some(GenerateError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if is_retryable_status(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "Retryable service error");
                last_error = Some(GenerateError::Api {
                    status,
                    message: error_message(&text),
                });
                continue;
            }

            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                debug!(status, "Service error");
                return Err(GenerateError::Api {
                    status,
                    message: error_message(&text),
                });
            }

            return response.text().await.map_err(GenerateError::Network);
        }

        Err(last_error.unwrap_or_else(|| GenerateError::Malformed("Max retries exceeded".to_string())))
    }

    async fn fetch_activities(&self, goals: &[String]) -> Result<Vec<Choice>, GenerateError> {
        let body = serde_json::json!({ "goals": goals });
        let text = self.post_with_retry("generate-activities", &body).await?;
        let parsed: ActivitiesResponse =
            serde_json::from_str(&text).map_err(|e| GenerateError::Malformed(e.to_string()))?;
        Ok(parsed.activities)
    }
}

#[async_trait]
impl PlanGenerator for HttpGenerator {
    async fn suggest_activities(&self, goals: &[String]) -> Vec<Choice> {
        if goals.is_empty() {
            debug!("No goals selected, using default activity list");
            return default_activities();
        }

        match self.fetch_activities(goals).await {
            Ok(activities) => {
                debug!(count = activities.len(), "Fetched activity suggestions");
                activities
            }
            Err(e) => {
                warn!(error = %e, "Activity suggestion failed, using fallback list");
                fallback_activities()
            }
        }
    }

    async fn generate_plan(&self, prompt: &str) -> Result<WeeklyPlan, GenerateError> {
        let body = serde_json::json!({ "prompt": prompt });
        let text = self.post_with_retry("generate-habits", &body).await?;

        let span = extract_json_object(&text)
            .ok_or_else(|| GenerateError::Malformed("No JSON object in response".to_string()))?;

        serde_json::from_str(span).map_err(|e| GenerateError::Malformed(e.to_string()))
    }
}

/// Best-effort extraction of the error message from an error body
fn error_message(text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => body.error,
        Err(_) => text.to_string(),
    }
}

/// Locate the first top-level `{...}` span in free text
///
/// Brace matching is string-literal aware so braces inside JSON strings do
/// not unbalance the scan.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
