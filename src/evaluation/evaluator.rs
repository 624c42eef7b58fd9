//! Model evaluator
//!
//! Re-scores a model version against accumulated human-reviewed feedback.
//! Designed for an external daily scheduler: re-running with the same
//! feedback window simply overwrites the stored metrics snapshot, and no
//! locks are held — the registry's atomic activation is the only
//! serialization point in the loop.

use crate::config::EngineConfig;
use crate::error::{Result, TrustError};
use crate::evaluation::metrics::{confusion_from_pairs, f1_delta_pct, summarize};
use crate::store::EvidenceStore;
use crate::types::{Feedback, FeedbackFilter, ModelMetrics, ModelVersion};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Optional date window for pulling feedback
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EvaluationWindow {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

/// A completed evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model_type: String,
    pub version: String,
    pub metrics: ModelMetrics,

    /// Whether F1 cleared the configured quality gate
    pub meets_threshold: bool,

    /// Set when the gate fails; a recommendation, never a rollback
    pub retraining_recommended: bool,

    /// Percentage F1 change against the previous version, when it has
    /// metrics of its own
    pub improvement_over_previous_pct: Option<f64>,
}

/// Outcome of an evaluation request
///
/// Insufficient data is a structured skip, never an error: batch schedulers
/// treat it as a report line, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum EvaluationOutcome {
    Completed(EvaluationReport),
    Skipped { reason: String, samples_found: usize },
}

impl EvaluationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EvaluationOutcome::Completed(_))
    }
}

/// F1 trend between the two most recent stored evaluations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    pub latest_version: String,
    pub previous_version: String,
    pub latest_f1: f64,
    pub previous_f1: f64,

    /// None when the previous F1 is zero
    pub f1_delta_pct: Option<f64>,
}

/// Model evaluator over the evidence store
pub struct ModelEvaluator {
    store: Arc<dyn EvidenceStore>,
    config: EngineConfig,
}

impl ModelEvaluator {
    pub fn new(store: Arc<dyn EvidenceStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Evaluate a version (or the currently active one) against reviewed
    /// feedback inside the window
    ///
    /// `min_samples` defaults to the configured retraining minimum;
    /// exploratory callers pass a lower value and the completed report then
    /// simply carries the smaller sample count.
    pub async fn evaluate(
        &self,
        model_type: &str,
        version: Option<&str>,
        window: EvaluationWindow,
        min_samples: Option<usize>,
    ) -> Result<EvaluationOutcome> {
        let target = self.resolve_version(model_type, version).await?;
        let min_samples = min_samples.unwrap_or(self.config.min_samples_for_retraining);

        let filter = FeedbackFilter {
            model_type: Some(model_type.to_string()),
            min_reviewer_confidence: Some(self.config.reviewer_confidence_min),
            since: window.since,
            until: window.until,
            used_for_retraining: None,
        };
        let feedback = self.store.find_feedback(&filter).await?;

        if feedback.len() < min_samples {
            info!(
                "Skipping evaluation of {}/{}: {} samples, {} required",
                model_type,
                target.version,
                feedback.len(),
                min_samples
            );
            return Ok(EvaluationOutcome::Skipped {
                reason: "insufficient_data".to_string(),
                samples_found: feedback.len(),
            });
        }

        let matrix = confusion_from_pairs(
            feedback
                .iter()
                .map(|f| (f.predicted_has_conflict, f.actual_has_conflict)),
        );
        let scores = summarize(&matrix);

        let metrics = ModelMetrics {
            f1: scores.f1,
            precision: scores.precision,
            recall: scores.recall,
            accuracy: scores.accuracy,
            confusion: matrix,
            sample_count: feedback.len(),
            evaluated_at: Utc::now(),
        };

        let improvement = self.improvement_over_previous(&target, metrics.f1).await?;

        // Idempotent: a re-run over the same window overwrites the snapshot.
        self.store
            .store_metrics(model_type, &target.version, &metrics, improvement)
            .await?;

        let meets_threshold = metrics.f1 >= self.config.f1_threshold;
        if !meets_threshold {
            warn!(
                "Model {}/{} below F1 gate: {:.4} < {:.2}, recommending retraining",
                model_type, target.version, metrics.f1, self.config.f1_threshold
            );
        }

        Ok(EvaluationOutcome::Completed(EvaluationReport {
            model_type: model_type.to_string(),
            version: target.version,
            meets_threshold,
            retraining_recommended: !meets_threshold,
            improvement_over_previous_pct: improvement,
            metrics,
        }))
    }

    /// Compare the two most recent stored evaluations by percentage F1 delta
    pub async fn trend(&self, model_type: &str) -> Result<Option<TrendReport>> {
        let recent = self.store.recent_evaluations(model_type, 2).await?;
        if recent.len() < 2 {
            return Ok(None);
        }

        let latest = &recent[0];
        let previous = &recent[1];
        let (latest_f1, previous_f1) = match (&latest.metrics, &previous.metrics) {
            (Some(a), Some(b)) => (a.f1, b.f1),
            _ => return Ok(None),
        };

        Ok(Some(TrendReport {
            latest_version: latest.version.clone(),
            previous_version: previous.version.clone(),
            latest_f1,
            previous_f1,
            f1_delta_pct: f1_delta_pct(latest_f1, previous_f1),
        }))
    }

    /// Export reviewed feedback for retraining, marking each record used
    ///
    /// Records are consumed exactly once: marked, never deleted, and
    /// already-marked records are excluded from later exports.
    pub async fn export_training_batch(&self, model_type: &str) -> Result<Vec<Feedback>> {
        let filter = FeedbackFilter {
            model_type: Some(model_type.to_string()),
            min_reviewer_confidence: Some(self.config.reviewer_confidence_min),
            used_for_retraining: Some(false),
            ..Default::default()
        };
        let batch = self.store.find_feedback(&filter).await?;
        if batch.is_empty() {
            return Ok(batch);
        }

        let ids: Vec<_> = batch.iter().map(|f| f.id).collect();
        self.store.mark_feedback_used(&ids).await?;
        debug!(
            "Exported {} feedback records for retraining {}",
            batch.len(),
            model_type
        );
        Ok(batch)
    }

    async fn resolve_version(
        &self,
        model_type: &str,
        version: Option<&str>,
    ) -> Result<ModelVersion> {
        match version {
            Some(v) => self
                .store
                .find_model_version(model_type, v)
                .await?
                .ok_or_else(|| TrustError::VersionNotFound {
                    model_type: model_type.to_string(),
                    version: v.to_string(),
                }),
            None => self
                .store
                .current_model_version(model_type)
                .await?
                .ok_or_else(|| TrustError::VersionNotFound {
                    model_type: model_type.to_string(),
                    version: "<active>".to_string(),
                }),
        }
    }

    async fn improvement_over_previous(
        &self,
        target: &ModelVersion,
        latest_f1: f64,
    ) -> Result<Option<f64>> {
        let Some(previous_version) = &target.previous_version else {
            return Ok(None);
        };
        let previous = self
            .store
            .find_model_version(&target.model_type, previous_version)
            .await?;
        Ok(previous
            .and_then(|v| v.metrics)
            .and_then(|m| f1_delta_pct(latest_f1, m.f1)))
    }
}
