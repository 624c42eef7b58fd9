//! Engine configuration
//!
//! Every tuning constant the pipeline depends on lives here as a named,
//! overridable field: the scraped-scorer invocation threshold, the ideology
//! persistence threshold, the evaluator's quality gate and sample minimums,
//! and the web fetch bounds. Values load from an optional TOML file layered
//! under `MEDIATRUST_*` environment variables, with coded defaults matching
//! the production system.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs for the trust & suitability pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Invoke the scraped ideology scorer only when database confidence is
    /// below this value (0-100)
    pub scrape_confidence_threshold: f64,

    /// Persist a merged ideology score back to the store only when merged
    /// confidence exceeds this value (0-100)
    pub persist_confidence_threshold: f64,

    /// F1 quality gate for model evaluations; failing it recommends
    /// retraining, never triggers a rollback
    pub f1_threshold: f64,

    /// Minimum reviewer confidence for feedback to count in an evaluation
    pub reviewer_confidence_min: f64,

    /// Minimum feedback sample for retraining decisions
    pub min_samples_for_retraining: usize,

    /// Upper bound on a single web evidence fetch, in seconds
    pub fetch_timeout_secs: u64,

    /// Maximum candidate profile URLs handed to the fetcher per call
    pub max_profile_urls: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scrape_confidence_threshold: 60.0,
            persist_confidence_threshold: 50.0,
            f1_threshold: 0.75,
            reviewer_confidence_min: 0.7,
            min_samples_for_retraining: 100,
            fetch_timeout_secs: 10,
            max_profile_urls: 5,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file with `MEDIATRUST_*` environment
    /// overrides layered on top
    ///
    /// Unset fields take the coded defaults; a malformed value in either
    /// source is an error, never a silent fallback.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("MEDIATRUST").try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<EngineConfig>()?)
    }

    /// Fetch timeout as a Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
