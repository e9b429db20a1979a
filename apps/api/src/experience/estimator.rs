//! Years-of-experience estimation: model first, regex heuristic as the floor.
//!
//! `estimate` never fails. Outright call failures are retried with a linear
//! backoff; an answer that cannot be read is not retried and falls straight
//! through to the heuristic.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::heuristic::estimate_years_heuristically;
use super::prompts::build_experience_prompt;
use super::{parse_numeral, round_to_tenth};
use crate::llm_client::TextGenerator;

/// Delay unit between failed attempts; attempt `n` waits `n` units.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(600);

static JSON_OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json span pattern is valid"));
static NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("numeral pattern is valid"));

pub struct ExperienceEstimator {
    generator: Option<Arc<dyn TextGenerator>>,
    max_retries: u32,
    backoff_step: Duration,
}

impl ExperienceEstimator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, max_retries: u32) -> Self {
        Self {
            generator,
            max_retries,
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }

    pub fn heuristic_only() -> Self {
        Self::new(None, 0)
    }

    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    pub fn model_enabled(&self) -> bool {
        self.generator.is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model())
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total years of experience in `text`, resolving "present" against the local date.
    pub async fn estimate(&self, text: &str) -> f64 {
        self.estimate_as_of(text, chrono::Local::now().date_naive())
            .await
    }

    pub async fn estimate_as_of(&self, text: &str, today: NaiveDate) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        let Some(generator) = self.generator.as_deref() else {
            debug!("No model configured; using heuristic estimate");
            return estimate_years_heuristically(text);
        };

        let prompt = build_experience_prompt(text, today);
        let total_attempts = self.max_retries + 1;

        for attempt in 1..=total_attempts {
            match generator.generate(&prompt).await {
                Ok(raw) => {
                    return match parse_model_years(&raw) {
                        Some(years) => years,
                        None => {
                            warn!("Model reply had no usable number; using heuristic estimate");
                            estimate_years_heuristically(text)
                        }
                    };
                }
                Err(e) if attempt < total_attempts => {
                    let delay = self.backoff_step * attempt;
                    warn!(
                        "Model call attempt {}/{} failed: {}; retrying after {}ms",
                        attempt,
                        total_attempts,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(
                        "Model call failed after {} attempts: {}; using heuristic estimate",
                        total_attempts, e
                    );
                }
            }
        }

        estimate_years_heuristically(text)
    }
}

/// Reads a years figure out of a model reply: the `total_years` field of the
/// outermost `{...}` span if that parses, otherwise the first numeral anywhere.
/// Only finite figures are returned.
fn parse_model_years(raw: &str) -> Option<f64> {
    years_from_json(raw).or_else(|| {
        NUMERAL
            .find(raw)
            .and_then(|m| parse_numeral(m.as_str()))
            .map(round_to_tenth)
            .filter(|years| years.is_finite())
    })
}

fn years_from_json(raw: &str) -> Option<f64> {
    let span = JSON_OBJECT_SPAN.find(raw)?;
    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(span.as_str()) else {
        return None;
    };

    let years = match object.get("total_years") {
        None => 0.0,
        Some(Value::Number(n)) => n.as_f64()?,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok()?,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(_) => return None,
    };

    Some(round_to_tenth(years.max(0.0))).filter(|years| years.is_finite())
}
