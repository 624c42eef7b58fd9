//! Mediator ideology classifier
//!
//! Two independent scorers feed a blend: the database scorer works off the
//! stored record (an existing score is authoritative prior art; otherwise
//! donations, affiliation keywords, and pre-tagged statement sentiment are
//! tallied), and the scraped scorer consults the web evidence fetcher only
//! when the database prior is weak. Merged results above the persistence
//! threshold are written back to the store; that write is the only path by
//! which a stored ideology score mutates after intake.

use crate::config::EngineConfig;
use crate::error::{Result, TrustError};
use crate::fetch::{with_timeout, FetchOutcome, WebEvidenceFetcher};
use crate::ideology::{tally_keywords, Tally};
use crate::store::EvidenceStore;
use crate::types::{Leaning, Mediator, MediatorId, PoliticalParty, StatementSentiment};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stored scores are trusted directly at this confidence
const STORED_SCORE_CONFIDENCE: f64 = 70.0;

/// Fresh scraped evidence outweighs the database prior
const SCRAPED_WEIGHT: f64 = 0.6;
const DATABASE_WEIGHT: f64 = 0.4;

/// Points per signal in the database tally
const DONATION_POINTS: u32 = 2;
const AFFILIATION_POINTS: u32 = 1;
const STATEMENT_POINTS: u32 = 1;

/// Classification result for one mediator (or one text)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeologyResult {
    pub leaning: Leaning,

    /// 0-100
    pub confidence: f64,

    /// Signed score on the -10..10 scale
    pub ideology_score: f64,

    /// Human-readable account of what drove the score
    pub reasoning: String,

    /// Individual signals that contributed
    pub indicators: Vec<String>,
}

impl IdeologyResult {
    fn neutral(reasoning: impl Into<String>) -> Self {
        Self {
            leaning: Leaning::Neutral,
            confidence: 0.0,
            ideology_score: 0.0,
            reasoning: reasoning.into(),
            indicators: Vec::new(),
        }
    }
}

/// One entry of a batch classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchIdeologyEntry {
    pub mediator_id: MediatorId,
    pub result: Option<IdeologyResult>,
    pub error: Option<String>,
}

/// Ideology classifier over the evidence store and web fetcher
pub struct IdeologyClassifier {
    store: Arc<dyn EvidenceStore>,
    fetcher: Arc<dyn WebEvidenceFetcher>,
    config: EngineConfig,
}

impl IdeologyClassifier {
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

    /// Classify a mediator, blending database and scraped evidence
    ///
    /// Persists the merged score back to the store when merged confidence
    /// exceeds the configured threshold.
    pub async fn classify(&self, mediator_id: MediatorId) -> Result<IdeologyResult> {
        let mediator = self
            .store
            .find_mediator(mediator_id)
            .await?
            .ok_or_else(|| TrustError::MediatorNotFound(mediator_id.to_string()))?;

        let database = database_score(&mediator);
        debug!(
            "Database ideology for {}: score {:.2}, confidence {:.0}",
            mediator.name, database.ideology_score, database.confidence
        );

        // A strong prior makes the external call unnecessary.
        let merged = if database.confidence < self.config.scrape_confidence_threshold {
            let scraped = self.scraped_score(&mediator).await;
            merge(&scraped, &database)
        } else {
            database
        };

        if merged.confidence > self.config.persist_confidence_threshold {
            self.store
                .update_ideology(mediator_id, merged.ideology_score)
                .await?;
            info!(
                "Persisted ideology score {:.2} (confidence {:.0}) for {}",
                merged.ideology_score, merged.confidence, mediator.name
            );
        }

        Ok(merged)
    }

    /// Fan out one independent classification per mediator
    pub async fn classify_batch(&self, mediator_ids: &[MediatorId]) -> Vec<BatchIdeologyEntry> {
        let runs = mediator_ids.iter().map(|&id| async move {
            match self.classify(id).await {
                Ok(result) => BatchIdeologyEntry {
                    mediator_id: id,
                    result: Some(result),
                    error: None,
                },
                Err(err) => BatchIdeologyEntry {
                    mediator_id: id,
                    result: None,
                    error: Some(err.to_string()),
                },
            }
        });
        join_all(runs).await
    }

    /// Scraped scorer: web evidence, or a zero-confidence neutral on failure
    async fn scraped_score(&self, mediator: &Mediator) -> IdeologyResult {
        let urls: Vec<String> = mediator
            .profile_urls
            .iter()
            .take(self.config.max_profile_urls)
            .cloned()
            .collect();

        let outcome = with_timeout(
            self.config.fetch_timeout(),
            "ideology",
            self.fetcher.fetch_ideology(&urls, &mediator.name),
        )
        .await;

        match outcome {
            FetchOutcome::Ok { data } => IdeologyResult {
                leaning: data.leaning,
                confidence: data.confidence,
                ideology_score: data.ideology_score,
                reasoning: "scraped public statements and profiles".to_string(),
                indicators: data.indicators,
            },
            FetchOutcome::Unavailable { reason } => {
                warn!(
                    "Scraped ideology unavailable for {}: {}",
                    mediator.name, reason
                );
                IdeologyResult::neutral("web evidence unavailable")
            }
        }
    }
}

/// Database scorer over the stored record
///
/// An existing stored score is authoritative prior art and is trusted
/// directly; otherwise signals are tallied from the bias indicators.
fn database_score(mediator: &Mediator) -> IdeologyResult {
    if let Some(score) = mediator.ideology_score {
        return IdeologyResult {
            leaning: Leaning::from_score(score),
            confidence: STORED_SCORE_CONFIDENCE,
            ideology_score: score,
            reasoning: "stored ideology score from prior analysis".to_string(),
            indicators: vec![format!("stored score {:.2}", score)],
        };
    }

    let mut tally = Tally::default();
    let mut indicators = Vec::new();
    let bias = &mediator.bias_indicators;

    for donation in &bias.donations {
        match donation.party {
            Some(PoliticalParty::Democratic) => {
                tally.add_liberal(DONATION_POINTS);
                indicators.push(format!("donation to {} (Democratic)", donation.recipient));
            }
            Some(PoliticalParty::Republican) => {
                tally.add_conservative(DONATION_POINTS);
                indicators.push(format!("donation to {} (Republican)", donation.recipient));
            }
            _ => {}
        }
    }

    for affiliation in &bias.political_affiliations {
        let hits = tally_keywords(affiliation);
        if hits.liberal > hits.conservative {
            tally.add_liberal(AFFILIATION_POINTS);
            indicators.push(format!("affiliation: {}", affiliation));
        } else if hits.conservative > hits.liberal {
            tally.add_conservative(AFFILIATION_POINTS);
            indicators.push(format!("affiliation: {}", affiliation));
        }
    }

    for statement in &bias.public_statements {
        match statement.sentiment {
            StatementSentiment::Liberal => {
                tally.add_liberal(STATEMENT_POINTS);
                indicators.push(format!("statement: {}", statement.text));
            }
            StatementSentiment::Conservative => {
                tally.add_conservative(STATEMENT_POINTS);
                indicators.push(format!("statement: {}", statement.text));
            }
            StatementSentiment::Neutral => {}
        }
    }

    if tally.total() == 0 {
        return IdeologyResult::neutral("no ideological signals in stored record");
    }

    let score = tally.score();
    IdeologyResult {
        leaning: Leaning::from_score(score),
        confidence: tally.confidence(),
        ideology_score: score,
        reasoning: format!(
            "{} liberal and {} conservative points from stored signals",
            tally.liberal, tally.conservative
        ),
        indicators,
    }
}

/// Blend scraped and database results, favoring fresher data
fn merge(scraped: &IdeologyResult, database: &IdeologyResult) -> IdeologyResult {
    let score = scraped.ideology_score * SCRAPED_WEIGHT + database.ideology_score * DATABASE_WEIGHT;
    let confidence =
        (scraped.confidence * SCRAPED_WEIGHT + database.confidence * DATABASE_WEIGHT).min(100.0);

    let mut indicators = database.indicators.clone();
    indicators.extend(scraped.indicators.iter().cloned());

    IdeologyResult {
        leaning: Leaning::from_score(score),
        confidence,
        ideology_score: score,
        reasoning: format!(
            "blended scraped ({}) and database ({}) evidence",
            scraped.reasoning, database.reasoning
        ),
        indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{NullFetcher, ScrapedAffiliations, ScrapedIdeology};
    use crate::store::memory::MemoryEvidenceStore;
    use crate::types::{Donation, PublicStatement};
    use async_trait::async_trait;

    struct ScriptedIdeologyFetcher {
        score: f64,
        confidence: f64,
    }

    #[async_trait]
    impl WebEvidenceFetcher for ScriptedIdeologyFetcher {
        async fn fetch_affiliations(
            &self,
            _urls: &[String],
            _name: &str,
            _check_for: &[String],
        ) -> FetchOutcome<ScrapedAffiliations> {
            FetchOutcome::unavailable("not scripted")
        }

        async fn fetch_ideology(
            &self,
            _urls: &[String],
            _name: &str,
        ) -> FetchOutcome<ScrapedIdeology> {
            FetchOutcome::Ok {
                data: ScrapedIdeology {
                    leaning: Leaning::from_score(self.score),
                    confidence: self.confidence,
                    ideology_score: self.score,
                    indicators: vec!["scripted indicator".to_string()],
                },
            }
        }
    }

    async fn classifier_with(
        mediator: Mediator,
        fetcher: Arc<dyn WebEvidenceFetcher>,
    ) -> (IdeologyClassifier, Arc<MemoryEvidenceStore>, MediatorId) {
        let id = mediator.id;
        let store = Arc::new(MemoryEvidenceStore::new());
        store.insert_mediator(mediator).await;
        let classifier =
            IdeologyClassifier::new(store.clone(), fetcher, EngineConfig::default());
        (classifier, store, id)
    }

    #[test]
    fn test_stored_score_is_authoritative_at_70() {
        let mut mediator = Mediator::new("Jane Doe");
        mediator.ideology_score = Some(4.5);

        let result = database_score(&mediator);
        assert_eq!(result.confidence, 70.0);
        assert_eq!(result.ideology_score, 4.5);
        assert_eq!(result.leaning, Leaning::Conservative);
    }

    #[test]
    fn test_database_tally_from_signals() {
        let mut mediator = Mediator::new("Jane Doe");
        mediator.bias_indicators.donations.push(Donation {
            recipient: "Committee A".to_string(),
            party: Some(PoliticalParty::Democratic),
        });
        mediator.bias_indicators.public_statements.push(PublicStatement {
            text: "statement".to_string(),
            sentiment: StatementSentiment::Liberal,
        });

        // 3 liberal points, 0 conservative: score -10, confidence 60
        let result = database_score(&mediator);
        assert!((result.ideology_score - (-10.0)).abs() < 1e-9);
        assert_eq!(result.confidence, 60.0);
        assert_eq!(result.leaning, Leaning::Liberal);
        assert_eq!(result.indicators.len(), 2);
    }

    #[test]
    fn test_merge_weighting() {
        let scraped = IdeologyResult {
            leaning: Leaning::Conservative,
            confidence: 80.0,
            ideology_score: 5.0,
            reasoning: "s".to_string(),
            indicators: vec![],
        };
        let database = IdeologyResult {
            leaning: Leaning::Neutral,
            confidence: 40.0,
            ideology_score: 0.0,
            reasoning: "d".to_string(),
            indicators: vec![],
        };

        let merged = merge(&scraped, &database);
        assert!((merged.ideology_score - 3.0).abs() < 1e-9);
        assert!((merged.confidence - 64.0).abs() < 1e-9);
        assert_eq!(merged.leaning, Leaning::Neutral); // 3.0 is inside the band
    }

    #[tokio::test]
    async fn test_failing_scrape_yields_neutral_and_no_persist() {
        // No stored score, zero bias indicators, failing fetch.
        let mediator = Mediator::new("Jane Doe");
        let (classifier, store, id) =
            classifier_with(mediator, Arc::new(NullFetcher)).await;

        let result = classifier.classify(id).await.unwrap();
        assert_eq!(result.leaning, Leaning::Neutral);
        assert_eq!(result.confidence, 0.0);

        // Below the persistence threshold: the stored record is untouched.
        let stored = store.find_mediator(id).await.unwrap().unwrap();
        assert!(stored.ideology_score.is_none());
    }

    #[tokio::test]
    async fn test_strong_prior_skips_scrape() {
        let mut mediator = Mediator::new("Jane Doe");
        mediator.ideology_score = Some(-6.0);

        // A scripted fetcher that would shift the score if consulted.
        let fetcher = Arc::new(ScriptedIdeologyFetcher {
            score: 8.0,
            confidence: 90.0,
        });
        let (classifier, _store, id) = classifier_with(mediator, fetcher).await;

        let result = classifier.classify(id).await.unwrap();
        // Confidence 70 >= threshold 60: database result stands alone.
        assert_eq!(result.ideology_score, -6.0);
        assert_eq!(result.confidence, 70.0);
        assert_eq!(result.leaning, Leaning::Liberal);
    }

    #[tokio::test]
    async fn test_merged_result_persists_above_threshold() {
        let mediator = Mediator::new("Jane Doe");
        let fetcher = Arc::new(ScriptedIdeologyFetcher {
            score: 9.0,
            confidence: 95.0,
        });
        let (classifier, store, id) = classifier_with(mediator, fetcher).await;

        let result = classifier.classify(id).await.unwrap();
        // scraped 95 * 0.6 + db 0 * 0.4 = 57 > 50: persisted.
        assert!((result.confidence - 57.0).abs() < 1e-9);
        let stored = store.find_mediator(id).await.unwrap().unwrap();
        assert_eq!(stored.ideology_score, Some(result.ideology_score));
    }

    #[tokio::test]
    async fn test_classify_is_idempotent() {
        let mediator = Mediator::new("Jane Doe");
        let fetcher = Arc::new(ScriptedIdeologyFetcher {
            score: 9.0,
            confidence: 95.0,
        });
        let (classifier, _store, id) = classifier_with(mediator, fetcher).await;

        let first = classifier.classify(id).await.unwrap();
        let second = classifier.classify(id).await.unwrap();
        // First call persisted 5.4; second call trusts the stored score at
        // confidence 70 and skips the scrape, reading back the same value.
        assert!((first.ideology_score - second.ideology_score).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let mediator = Mediator::new("Jane Doe");
        let good_id = mediator.id;
        let (classifier, _store, _) =
            classifier_with(mediator, Arc::new(NullFetcher)).await;

        let entries = classifier
            .classify_batch(&[good_id, MediatorId::new()])
            .await;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].result.is_some());
        assert!(entries[1].error.is_some());
    }
}
