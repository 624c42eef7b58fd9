//! Engine facade
//!
//! Wires the matcher, aggregator, classifier, scorer, evaluator, and
//! registry over a shared evidence store and web fetcher, and exposes the
//! operation set the surrounding platform consumes. All components are
//! stateless over their inputs; the two mutation points (ideology
//! persistence, version activation) live behind the store.

use crate::config::EngineConfig;
use crate::conflicts::{
    BatchConflictEntry, ConflictAggregator, ConflictVerdict, QuickCheck,
};
use crate::error::{Result, TrustError};
use crate::evaluation::{
    EvaluationOutcome, EvaluationWindow, ModelEvaluator, TrendReport, VersionRegistry,
};
use crate::fetch::WebEvidenceFetcher;
use crate::ideology::{self, BatchIdeologyEntry, IdeologyClassifier, IdeologyResult};
use crate::scoring::{RankingReport, SuitabilityScore, SuitabilityScorer};
use crate::store::EvidenceStore;
use crate::types::{CaseContext, Feedback, MediatorId, ModelVersion};
use crate::conflicts::matcher;
use std::sync::Arc;

/// Trust & suitability engine
///
/// Cheap to clone per request if wrapped in an Arc by the host; the
/// components themselves hold only Arcs and config.
pub struct TrustEngine {
    store: Arc<dyn EvidenceStore>,
    aggregator: ConflictAggregator,
    classifier: IdeologyClassifier,
    scorer: SuitabilityScorer,
    evaluator: ModelEvaluator,
    registry: VersionRegistry,
}

impl TrustEngine {
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        fetcher: Arc<dyn WebEvidenceFetcher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            aggregator: ConflictAggregator::new(store.clone(), fetcher.clone(), config.clone()),
            classifier: IdeologyClassifier::new(store.clone(), fetcher, config.clone()),
            scorer: SuitabilityScorer::new(store.clone()),
            evaluator: ModelEvaluator::new(store.clone(), config),
            registry: VersionRegistry::new(store.clone()),
            store,
        }
    }

    // === Conflicts ===

    /// Full conflict check: database plus best-effort scraped evidence
    pub async fn check_conflicts(
        &self,
        mediator_id: MediatorId,
        parties: &[String],
    ) -> Result<ConflictVerdict> {
        self.aggregator.detect(mediator_id, parties).await
    }

    /// Database-only summary for latency-sensitive list rendering
    pub async fn quick_check_conflicts(
        &self,
        mediator_id: MediatorId,
        parties: &[String],
    ) -> Result<QuickCheck> {
        let mediator = self
            .store
            .find_mediator(mediator_id)
            .await?
            .ok_or_else(|| TrustError::MediatorNotFound(mediator_id.to_string()))?;
        Ok(matcher::quick_check(&mediator, parties))
    }

    /// One independent conflict check per mediator; failures stay per-entry
    pub async fn detect_batch_conflicts(
        &self,
        mediator_ids: &[MediatorId],
        parties: &[String],
    ) -> Vec<BatchConflictEntry> {
        self.aggregator.detect_batch(mediator_ids, parties).await
    }

    // === Ideology ===

    /// Classify a mediator, persisting confident merged scores
    pub async fn classify_ideology(&self, mediator_id: MediatorId) -> Result<IdeologyResult> {
        self.classifier.classify(mediator_id).await
    }

    /// Keyword-table classification of arbitrary text; no persistence
    pub fn classify_text(&self, text: &str) -> IdeologyResult {
        ideology::classify_text(text)
    }

    /// One independent classification per mediator
    pub async fn classify_batch(&self, mediator_ids: &[MediatorId]) -> Vec<BatchIdeologyEntry> {
        self.classifier.classify_batch(mediator_ids).await
    }

    // === Suitability ===

    /// Seven-factor weighted score for one mediator against a case
    pub async fn score_mediator(
        &self,
        mediator_id: MediatorId,
        case: &CaseContext,
    ) -> Result<SuitabilityScore> {
        self.scorer.score(mediator_id, case).await
    }

    /// Score and rank a candidate list, descending by total score
    pub async fn rank_mediators(
        &self,
        mediator_ids: &[MediatorId],
        case: &CaseContext,
    ) -> RankingReport {
        self.scorer.rank(mediator_ids, case).await
    }

    // === Model lifecycle ===

    /// Evaluate a version (or the active one) against reviewed feedback
    pub async fn evaluate_model(
        &self,
        model_type: &str,
        version: Option<&str>,
        window: EvaluationWindow,
        min_samples: Option<usize>,
    ) -> Result<EvaluationOutcome> {
        self.evaluator
            .evaluate(model_type, version, window, min_samples)
            .await
    }

    /// Register a new model version in the Created state
    pub async fn create_model_version(
        &self,
        model_type: &str,
        version: &str,
        previous_version: Option<&str>,
    ) -> Result<ModelVersion> {
        self.registry.create(model_type, version, previous_version).await
    }

    /// Activate a version, atomically deactivating its siblings
    pub async fn activate_model_version(&self, model_type: &str, version: &str) -> Result<()> {
        self.registry.activate(model_type, version).await
    }

    /// The single active version of a model type
    pub async fn current_model_version(&self, model_type: &str) -> Result<Option<ModelVersion>> {
        self.registry.current(model_type).await
    }

    /// Percentage F1 delta between the two most recent evaluations
    pub async fn model_trend(&self, model_type: &str) -> Result<Option<TrendReport>> {
        self.evaluator.trend(model_type).await
    }

    /// Export unconsumed feedback for retraining, marking it used
    pub async fn export_training_batch(&self, model_type: &str) -> Result<Vec<Feedback>> {
        self.evaluator.export_training_batch(model_type).await
    }
}
