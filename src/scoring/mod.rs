//! Suitability scoring
//!
//! Computes a 0-100 weighted score from seven independent sub-scores for
//! ranking candidate mediators against a case. Each sub-score is 0-100 and
//! the weights sum to 1.0, so the total is bounded by construction.
//!
//! Missing preferences score the neutral 50 rather than penalizing a
//! candidate, and a lookup failure on the engagement counter likewise
//! degrades to 50: an analytics outage must not sink a score.

use crate::error::{Result, TrustError};
use crate::store::EvidenceStore;
use crate::types::{CaseContext, Leaning, Mediator, MediatorId};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Sub-score weights; must sum to 1.0
const WEIGHT_EXPERIENCE: f64 = 0.20;
const WEIGHT_RATING: f64 = 0.25;
const WEIGHT_PRACTICE_AREA: f64 = 0.25;
const WEIGHT_LOCATION: f64 = 0.10;
const WEIGHT_IDEOLOGY: f64 = 0.10;
const WEIGHT_POPULARITY: f64 = 0.05;
const WEIGHT_AVAILABILITY: f64 = 0.05;

/// Neutral sub-score when the case expresses no preference or a lookup fails
const NEUTRAL: f64 = 50.0;

/// Preferred ideology bands on the mediator score scale, per leaning
fn preference_band(leaning: Leaning) -> (f64, f64) {
    match leaning {
        Leaning::Liberal => (-2.0, -0.5),
        Leaning::Neutral => (-0.5, 0.5),
        Leaning::Conservative => (0.5, 2.0),
    }
}

/// The seven independent sub-scores, each 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub experience: f64,
    pub rating: f64,
    pub practice_area_match: f64,
    pub location_match: f64,
    pub ideology_match: f64,
    pub popularity: f64,
    pub availability: f64,
}

impl ScoreBreakdown {
    /// Weighted total, clamped to 0-100
    pub fn total(&self) -> f64 {
        let total = self.experience * WEIGHT_EXPERIENCE
            + self.rating * WEIGHT_RATING
            + self.practice_area_match * WEIGHT_PRACTICE_AREA
            + self.location_match * WEIGHT_LOCATION
            + self.ideology_match * WEIGHT_IDEOLOGY
            + self.popularity * WEIGHT_POPULARITY
            + self.availability * WEIGHT_AVAILABILITY;
        total.clamp(0.0, 100.0)
    }
}

/// Deterministic step function of the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLabel {
    HighlyRecommended,
    Recommended,
    Consider,
    NotRecommended,
}

impl RecommendationLabel {
    pub fn from_total(total: f64) -> Self {
        if total >= 80.0 {
            RecommendationLabel::HighlyRecommended
        } else if total >= 60.0 {
            RecommendationLabel::Recommended
        } else if total >= 40.0 {
            RecommendationLabel::Consider
        } else {
            RecommendationLabel::NotRecommended
        }
    }
}

impl std::fmt::Display for RecommendationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationLabel::HighlyRecommended => write!(f, "Highly Recommended"),
            RecommendationLabel::Recommended => write!(f, "Recommended"),
            RecommendationLabel::Consider => write!(f, "Consider"),
            RecommendationLabel::NotRecommended => write!(f, "Not Recommended"),
        }
    }
}

/// Suitability score for one mediator against one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitabilityScore {
    pub mediator_id: MediatorId,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub recommendation: RecommendationLabel,
}

/// A mediator that could not be scored during a ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankFailure {
    pub mediator_id: MediatorId,
    pub error: String,
}

/// Batch ranking output: scores sorted descending by total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub ranked: Vec<SuitabilityScore>,

    /// Best candidate, if any scored
    pub top: Option<SuitabilityScore>,

    /// Arithmetic mean of the ranked totals
    pub average_score: f64,

    /// Mediators that failed to score; never aborts the batch
    pub failures: Vec<RankFailure>,
}

/// Suitability scorer over the evidence store
pub struct SuitabilityScorer {
    store: Arc<dyn EvidenceStore>,
}

impl SuitabilityScorer {
    pub fn new(store: Arc<dyn EvidenceStore>) -> Self {
        Self { store }
    }

    /// Score one mediator against the case
    pub async fn score(
        &self,
        mediator_id: MediatorId,
        case: &CaseContext,
    ) -> Result<SuitabilityScore> {
        let mediator = self
            .store
            .find_mediator(mediator_id)
            .await?
            .ok_or_else(|| TrustError::MediatorNotFound(mediator_id.to_string()))?;

        let popularity = match self.store.profile_view_count(mediator_id).await {
            Ok(views) => (views as f64).min(100.0),
            Err(err) => {
                warn!(
                    "Profile view lookup failed for {}, defaulting popularity to neutral: {}",
                    mediator_id, err
                );
                NEUTRAL
            }
        };

        let breakdown = ScoreBreakdown {
            experience: experience_score(&mediator),
            rating: rating_score(&mediator),
            practice_area_match: practice_area_score(&mediator, case),
            location_match: location_score(&mediator, case),
            ideology_match: ideology_score(&mediator, case),
            popularity,
            availability: availability_score(&mediator),
        };

        let total = breakdown.total();
        debug!("Scored {} at {:.1} for case", mediator.name, total);

        Ok(SuitabilityScore {
            mediator_id,
            total_score: total,
            breakdown,
            recommendation: RecommendationLabel::from_total(total),
        })
    }

    /// Score a candidate list concurrently and rank it
    pub async fn rank(&self, mediator_ids: &[MediatorId], case: &CaseContext) -> RankingReport {
        let runs = mediator_ids.iter().map(|&id| async move {
            self.score(id, case).await.map_err(|err| RankFailure {
                mediator_id: id,
                error: err.to_string(),
            })
        });

        let mut ranked = Vec::new();
        let mut failures = Vec::new();
        for outcome in join_all(runs).await {
            match outcome {
                Ok(score) => ranked.push(score),
                Err(failure) => failures.push(failure),
            }
        }

        ranked.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let average_score = if ranked.is_empty() {
            0.0
        } else {
            ranked.iter().map(|s| s.total_score).sum::<f64>() / ranked.len() as f64
        };

        RankingReport {
            top: ranked.first().cloned(),
            average_score,
            ranked,
            failures,
        }
    }
}

/// Years of experience plus a completeness bonus, capped at 100
fn experience_score(mediator: &Mediator) -> f64 {
    let years = (mediator.years_experience * 2.33).min(70.0);
    let completeness = mediator.data_quality.completeness_pct * 0.3;
    (years + completeness).min(100.0)
}

/// Star rating scaled to 80 plus a review-volume bonus up to 20
fn rating_score(mediator: &Mediator) -> f64 {
    let stars = (mediator.rating / 5.0) * 80.0;
    let volume = (mediator.review_count as f64 * 2.0).min(20.0);
    (stars + volume).min(100.0)
}

/// Percentage of requested practice areas fuzzy-contained in the
/// mediator's list; neutral when the case has no preference
fn practice_area_score(mediator: &Mediator, case: &CaseContext) -> f64 {
    if case.practice_areas.is_empty() {
        return NEUTRAL;
    }

    let matched = case
        .practice_areas
        .iter()
        .filter(|requested| {
            let requested = requested.to_lowercase();
            mediator.specializations.iter().any(|have| {
                let have = have.to_lowercase();
                have.contains(&requested) || requested.contains(&have)
            })
        })
        .count();

    matched as f64 / case.practice_areas.len() as f64 * 100.0
}

/// Exact state match 100, partial city match 80, otherwise 20; neutral
/// when the case has no location preference
fn location_score(mediator: &Mediator, case: &CaseContext) -> f64 {
    let Some(wanted) = &case.location else {
        return NEUTRAL;
    };

    if !wanted.state.is_empty()
        && mediator.location.state.eq_ignore_ascii_case(&wanted.state)
    {
        return 100.0;
    }

    if !wanted.city.is_empty() {
        let have = mediator.location.city.to_lowercase();
        let want = wanted.city.to_lowercase();
        if !have.is_empty() && (have.contains(&want) || want.contains(&have)) {
            return 80.0;
        }
    }

    20.0
}

/// 100 inside the preferred band, otherwise a linear falloff from the
/// nearest band edge; neutral when the case has no preference
fn ideology_score(mediator: &Mediator, case: &CaseContext) -> f64 {
    let Some(preference) = case.ideology_preference else {
        return NEUTRAL;
    };

    let score = mediator.ideology_score.unwrap_or(0.0);
    let (low, high) = preference_band(preference);

    if score >= low && score <= high {
        return 100.0;
    }

    let distance = if score < low { low - score } else { score - high };
    (100.0 - distance * 50.0).max(0.0)
}

/// Placeholder pending real calendar integration: verified mediators rate
/// 80, others the neutral 50
fn availability_score(mediator: &Mediator) -> f64 {
    if mediator.verified {
        80.0
    } else {
        NEUTRAL
    }
}
