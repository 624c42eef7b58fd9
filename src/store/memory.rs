//! In-memory evidence store
//!
//! Backs tests and embedding hosts that have no document store of their
//! own. All maps sit behind a single `tokio::sync::RwLock` per collection;
//! version activation takes the registry lock once and performs the
//! deactivate-all-then-activate swap inside it, which gives the atomicity
//! the trait demands.

use crate::error::{Result, TrustError};
use crate::store::EvidenceStore;
use crate::types::{
    Feedback, FeedbackFilter, FeedbackId, Mediator, MediatorId, ModelMetrics, ModelVersion,
    VersionStatus,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory implementation of [`EvidenceStore`]
#[derive(Default)]
pub struct MemoryEvidenceStore {
    mediators: RwLock<HashMap<MediatorId, Mediator>>,
    profile_views: RwLock<HashMap<MediatorId, u64>>,
    feedback: RwLock<HashMap<FeedbackId, Feedback>>,
    // Keyed by (model_type, version)
    versions: RwLock<HashMap<(String, String), ModelVersion>>,
}

impl MemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a mediator record
    pub async fn insert_mediator(&self, mediator: Mediator) {
        self.mediators.write().await.insert(mediator.id, mediator);
    }

    /// Seed a profile-view counter
    pub async fn set_profile_views(&self, id: MediatorId, views: u64) {
        self.profile_views.write().await.insert(id, views);
    }

    /// Seed a feedback record
    pub async fn insert_feedback(&self, feedback: Feedback) {
        self.feedback.write().await.insert(feedback.id, feedback);
    }
}

fn matches_filter(feedback: &Feedback, filter: &FeedbackFilter) -> bool {
    if let Some(model_type) = &filter.model_type {
        if &feedback.model_type != model_type {
            return false;
        }
    }
    if let Some(min) = filter.min_reviewer_confidence {
        if feedback.reviewer_confidence < min {
            return false;
        }
    }
    if let Some(since) = filter.since {
        if feedback.reviewed_at < since {
            return false;
        }
    }
    if let Some(until) = filter.until {
        if feedback.reviewed_at >= until {
            return false;
        }
    }
    if let Some(used) = filter.used_for_retraining {
        if feedback.used_for_retraining != used {
            return false;
        }
    }
    true
}

#[async_trait]
impl EvidenceStore for MemoryEvidenceStore {
    async fn find_mediator(&self, id: MediatorId) -> Result<Option<Mediator>> {
        Ok(self.mediators.read().await.get(&id).cloned())
    }

    async fn find_mediator_by_name(&self, name: &str) -> Result<Option<Mediator>> {
        Ok(self
            .mediators
            .read()
            .await
            .values()
            .find(|m| m.name == name)
            .cloned())
    }

    async fn update_ideology(&self, id: MediatorId, score: f64) -> Result<()> {
        let mut mediators = self.mediators.write().await;
        let mediator = mediators
            .get_mut(&id)
            .ok_or_else(|| TrustError::MediatorNotFound(id.to_string()))?;
        mediator.ideology_score = Some(score);
        mediator.updated_at = Utc::now();
        debug!("Persisted ideology score {:.2} for {}", score, id);
        Ok(())
    }

    async fn profile_view_count(&self, id: MediatorId) -> Result<u64> {
        Ok(self.profile_views.read().await.get(&id).copied().unwrap_or(0))
    }

    async fn find_feedback(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>> {
        let mut records: Vec<Feedback> = self
            .feedback
            .read()
            .await
            .values()
            .filter(|f| matches_filter(f, filter))
            .cloned()
            .collect();
        records.sort_by_key(|f| f.reviewed_at);
        Ok(records)
    }

    async fn mark_feedback_used(&self, ids: &[FeedbackId]) -> Result<()> {
        let mut feedback = self.feedback.write().await;
        for id in ids {
            if let Some(record) = feedback.get_mut(id) {
                record.used_for_retraining = true;
            }
        }
        Ok(())
    }

    async fn insert_model_version(&self, version: &ModelVersion) -> Result<()> {
        let key = (version.model_type.clone(), version.version.clone());
        let mut versions = self.versions.write().await;
        if versions.contains_key(&key) {
            return Err(TrustError::AlreadyExists(format!(
                "{}/{}",
                version.model_type, version.version
            )));
        }
        versions.insert(key, version.clone());
        Ok(())
    }

    async fn find_model_version(
        &self,
        model_type: &str,
        version: &str,
    ) -> Result<Option<ModelVersion>> {
        Ok(self
            .versions
            .read()
            .await
            .get(&(model_type.to_string(), version.to_string()))
            .cloned())
    }

    async fn store_metrics(
        &self,
        model_type: &str,
        version: &str,
        metrics: &ModelMetrics,
        improvement_pct: Option<f64>,
    ) -> Result<()> {
        let mut versions = self.versions.write().await;
        let entry = versions
            .get_mut(&(model_type.to_string(), version.to_string()))
            .ok_or_else(|| TrustError::VersionNotFound {
                model_type: model_type.to_string(),
                version: version.to_string(),
            })?;
        entry.metrics = Some(metrics.clone());
        entry.improvement_over_previous_pct = improvement_pct;
        Ok(())
    }

    async fn activate_model_version(&self, model_type: &str, version: &str) -> Result<()> {
        // Single write lock spans the whole swap: no reader can observe
        // zero or two active versions of the type.
        let mut versions = self.versions.write().await;

        let key = (model_type.to_string(), version.to_string());
        if !versions.contains_key(&key) {
            return Err(TrustError::VersionNotFound {
                model_type: model_type.to_string(),
                version: version.to_string(),
            });
        }

        let now = Utc::now();
        for ((mt, _), entry) in versions.iter_mut() {
            if mt == model_type && entry.status == VersionStatus::Active {
                entry.status = VersionStatus::Deactivated;
                entry.deactivated_at = Some(now);
            }
        }

        if let Some(target) = versions.get_mut(&key) {
            target.status = VersionStatus::Active;
            target.deployed_at = Some(now);
        }
        debug!("Activated model version {}/{}", model_type, version);
        Ok(())
    }

    async fn current_model_version(&self, model_type: &str) -> Result<Option<ModelVersion>> {
        Ok(self
            .versions
            .read()
            .await
            .values()
            .find(|v| v.model_type == model_type && v.status == VersionStatus::Active)
            .cloned())
    }

    async fn recent_evaluations(
        &self,
        model_type: &str,
        limit: usize,
    ) -> Result<Vec<ModelVersion>> {
        let mut evaluated: Vec<ModelVersion> = self
            .versions
            .read()
            .await
            .values()
            .filter(|v| v.model_type == model_type && v.metrics.is_some())
            .cloned()
            .collect();
        evaluated.sort_by_key(|v| {
            std::cmp::Reverse(v.metrics.as_ref().map(|m| m.evaluated_at).unwrap_or(v.created_at))
        });
        evaluated.truncate(limit);
        Ok(evaluated)
    }
}
