use std::sync::Arc;

use crate::config::Config;
use crate::experience::estimator::ExperienceEstimator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model client (if any) plus retry policy. Built once at startup and
    /// handed to each request's pipeline.
    pub estimator: Arc<ExperienceEstimator>,
}
