//! Evidence store abstraction
//!
//! The evidence store is an external collaborator: a document repository
//! holding mediator records, human-reviewed feedback, and the model version
//! registry. This module defines the trait the engine consumes plus an
//! in-memory implementation used by tests and embedding hosts.
//!
//! The one operation with real semantics here is `activate_model_version`:
//! it must atomically deactivate every sibling of the same model type and
//! activate the target, so that at no instant zero or two versions of a
//! type are active. Implementations that cannot do this atomically must
//! fail closed.

pub mod memory;

use crate::error::Result;
use crate::types::{
    Feedback, FeedbackFilter, FeedbackId, Mediator, MediatorId, ModelMetrics, ModelVersion,
};
use async_trait::async_trait;

/// Evidence store trait defining all persistence the engine needs
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Retrieve a mediator by ID; Ok(None) is a typed miss, not an error
    async fn find_mediator(&self, id: MediatorId) -> Result<Option<Mediator>>;

    /// Retrieve a mediator by exact name
    async fn find_mediator_by_name(&self, name: &str) -> Result<Option<Mediator>>;

    /// Overwrite a mediator's derived ideology score
    ///
    /// This is the only mutation path for `ideology_score` after intake.
    async fn update_ideology(&self, id: MediatorId, score: f64) -> Result<()>;

    /// Profile-view counter for the popularity sub-score
    ///
    /// Callers treat any error here as a neutral default; an analytics
    /// outage must not sink a suitability score.
    async fn profile_view_count(&self, id: MediatorId) -> Result<u64>;

    /// Pull feedback records matching the filter
    async fn find_feedback(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>>;

    /// Flag feedback records as consumed by a training export
    async fn mark_feedback_used(&self, ids: &[FeedbackId]) -> Result<()>;

    /// Insert a new model version; fails on duplicate (type, version)
    async fn insert_model_version(&self, version: &ModelVersion) -> Result<()>;

    /// Retrieve a model version
    async fn find_model_version(
        &self,
        model_type: &str,
        version: &str,
    ) -> Result<Option<ModelVersion>>;

    /// Attach a metrics snapshot to a version (idempotent overwrite),
    /// together with the recomputed improvement-over-previous percentage
    async fn store_metrics(
        &self,
        model_type: &str,
        version: &str,
        metrics: &ModelMetrics,
        improvement_pct: Option<f64>,
    ) -> Result<()>;

    /// Atomically deactivate all versions of `model_type` and activate
    /// `version`, timestamping both sides
    ///
    /// Must fail closed (no partial state) if the target is missing or the
    /// swap cannot be performed as a single update.
    async fn activate_model_version(&self, model_type: &str, version: &str) -> Result<()>;

    /// The single active version of a model type, if any
    async fn current_model_version(&self, model_type: &str) -> Result<Option<ModelVersion>>;

    /// Versions of a model type carrying metrics, most recently evaluated
    /// first, capped at `limit`
    async fn recent_evaluations(&self, model_type: &str, limit: usize)
        -> Result<Vec<ModelVersion>>;
}
