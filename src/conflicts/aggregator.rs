//! Web-augmented conflict aggregator
//!
//! Combines the pure matcher's database findings with best-effort scraped
//! evidence into a single verdict. Scraping is strictly additive: a fetch
//! failure or timeout degrades to the database-only result and the success
//! payload carries no error.

use crate::config::EngineConfig;
use crate::conflicts::matcher;
use crate::error::{Result, TrustError};
use crate::fetch::{with_timeout, FetchOutcome, WebEvidenceFetcher};
use crate::store::EvidenceStore;
use crate::types::{ConflictFinding, ConflictKind, ConflictSource, MediatorId, RiskLevel};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Overall verdict for one mediator against one set of case parties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictVerdict {
    pub mediator_id: MediatorId,
    pub has_conflict: bool,

    /// All findings, database and scraped
    pub conflicts: Vec<ConflictFinding>,

    /// Maximum risk across findings; None iff `conflicts` is empty
    pub overall_risk: Option<RiskLevel>,

    /// Deterministic, tier-derived guidance for the requesting user
    pub recommendation: String,
}

/// One entry of a batch conflict check
///
/// Partial failure is isolated per entry: a missing mediator yields an
/// error string here, never a failed batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConflictEntry {
    pub mediator_id: MediatorId,
    pub verdict: Option<ConflictVerdict>,
    pub error: Option<String>,
}

/// Conflict aggregator over the evidence store and web fetcher
pub struct ConflictAggregator {
    store: Arc<dyn EvidenceStore>,
    fetcher: Arc<dyn WebEvidenceFetcher>,
    config: EngineConfig,
}

impl ConflictAggregator {
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        fetcher: Arc<dyn WebEvidenceFetcher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    /// Full conflict check: database findings plus best-effort scraped ones
    pub async fn detect(
        &self,
        mediator_id: MediatorId,
        parties: &[String],
    ) -> Result<ConflictVerdict> {
        let mediator = self
            .store
            .find_mediator(mediator_id)
            .await?
            .ok_or_else(|| TrustError::MediatorNotFound(mediator_id.to_string()))?;

        // Stored evidence is always available and always included.
        let mut conflicts = matcher::find_conflicts(&mediator, parties);

        if !parties.is_empty() {
            let urls: Vec<String> = mediator
                .profile_urls
                .iter()
                .take(self.config.max_profile_urls)
                .cloned()
                .collect();

            let outcome = with_timeout(
                self.config.fetch_timeout(),
                "affiliations",
                self.fetcher.fetch_affiliations(&urls, &mediator.name, parties),
            )
            .await;

            match outcome {
                FetchOutcome::Ok { data } => {
                    debug!(
                        "Scrape returned {} potential conflicts for {}",
                        data.potential_conflicts.len(),
                        mediator.name
                    );
                    for scraped in data.potential_conflicts {
                        conflicts.push(ConflictFinding {
                            kind: ConflictKind::ScrapedAffiliation,
                            matched_entity: scraped.entity,
                            matched_party: scraped.party,
                            // Fuzzy scraped matches are never upgraded above
                            // MEDIUM without corroboration.
                            risk: scraped.risk.min(RiskLevel::Medium),
                            source: ConflictSource::WebScrape,
                            reason: "scraped affiliation".to_string(),
                        });
                    }
                }
                FetchOutcome::Unavailable { reason } => {
                    warn!(
                        "Web evidence unavailable for {}, using database-only findings: {}",
                        mediator.name, reason
                    );
                }
            }
        }

        let overall_risk = conflicts.iter().map(|c| c.risk).max();

        Ok(ConflictVerdict {
            mediator_id,
            has_conflict: !conflicts.is_empty(),
            recommendation: recommendation_for(overall_risk),
            conflicts,
            overall_risk,
        })
    }

    /// Fan out one independent check per mediator and join all results
    pub async fn detect_batch(
        &self,
        mediator_ids: &[MediatorId],
        parties: &[String],
    ) -> Vec<BatchConflictEntry> {
        let checks = mediator_ids.iter().map(|&id| async move {
            match self.detect(id, parties).await {
                Ok(verdict) => BatchConflictEntry {
                    mediator_id: id,
                    verdict: Some(verdict),
                    error: None,
                },
                Err(err) => BatchConflictEntry {
                    mediator_id: id,
                    verdict: None,
                    error: Some(err.to_string()),
                },
            }
        });
        join_all(checks).await
    }
}

/// Recommendation text as a deterministic function of the risk tier
///
/// Substring matching is permissive by design, so every tier that carries
/// findings points the reader at manual review rather than automatic
/// disqualification.
fn recommendation_for(overall_risk: Option<RiskLevel>) -> String {
    match overall_risk {
        Some(RiskLevel::High) => "High-risk conflict detected. Strongly recommend selecting a \
            different mediator or obtaining explicit informed consent from all parties. \
            Name-overlap matches require manual review."
            .to_string(),
        Some(RiskLevel::Medium) => "Potential conflict detected. Disclosure to all parties is \
            recommended before proceeding. Name-overlap matches require manual review."
            .to_string(),
        Some(RiskLevel::Low) => {
            "Low-risk overlap detected. Routine disclosure is advised.".to_string()
        }
        None => "No conflicts found in available records. Routine disclosure practices still \
            apply."
            .to_string(),
    }
}
