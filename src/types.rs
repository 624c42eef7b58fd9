//! Core data types for the mediatrust engine
//!
//! This module defines the fundamental data structures used throughout the
//! engine: mediator records, conflict findings, reviewed feedback, and model
//! versions. These types form the contract between the scoring components
//! and the surrounding discovery platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for mediators
///
/// Wraps a UUID to provide type safety and prevent mixing mediator IDs
/// with other UUID-based identifiers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediatorId(pub Uuid);

impl MediatorId {
    /// Create a new random mediator ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a mediator ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for MediatorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MediatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for reviewed feedback records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub Uuid);

impl FeedbackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FeedbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk level of a conflict finding
///
/// Ordered so that the aggregator's overall verdict is simply the maximum
/// across findings (High > Medium > Low).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Kind of overlap detected between a mediator and a case party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Match against an affiliation entry
    Affiliation,

    /// Match against the current or a former employer
    Employment,

    /// Party appeared in one of the mediator's prior cases
    PriorCase,

    /// Match reported by the web evidence fetcher
    ScrapedAffiliation,
}

/// Where a finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSource {
    Database,
    WebScrape,
}

/// A single detected overlap between a mediator's record and a case party
///
/// Ephemeral: findings are returned to callers and optionally captured as
/// feedback, never persisted as their own entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictFinding {
    /// What kind of overlap was detected
    pub kind: ConflictKind,

    /// The mediator-side entity that matched
    pub matched_entity: String,

    /// The case party that matched
    pub matched_party: String,

    /// Risk tier; current relationships are HIGH, former ones MEDIUM, and
    /// scraped fuzzy matches are never upgraded above MEDIUM
    pub risk: RiskLevel,

    /// Structured vs scraped provenance
    pub source: ConflictSource,

    /// Short human-readable explanation
    pub reason: String,
}

/// Relationship between a mediator and an organization, firm, or board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Affiliation {
    /// Entity name as recorded
    pub entity: String,

    /// Relationship type (member, board, counsel, ...)
    pub relationship: String,

    /// Whether the relationship is ongoing
    pub is_current: bool,
}

/// Outcome of a prior case the mediator handled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Names of the parties involved
    pub parties: Vec<String>,

    /// Role the mediator played (mediator, arbitrator, counsel, ...)
    pub role: String,

    /// Recorded outcome, free text
    pub outcome: Option<String>,
}

/// Pre-tagged sentiment of a public statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementSentiment {
    Liberal,
    Conservative,
    Neutral,
}

/// A public statement attributed to the mediator, tagged upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicStatement {
    pub text: String,
    pub sentiment: StatementSentiment,
}

/// A recorded political donation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    /// Recipient committee or campaign
    pub recipient: String,

    /// Party affiliation of the recipient, if known
    pub party: Option<PoliticalParty>,
}

/// Party classification used by the donation tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoliticalParty {
    Democratic,
    Republican,
    Other,
}

/// Signals used by the ideology classifier's database scorer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiasIndicators {
    /// Donation history
    pub donations: Vec<Donation>,

    /// Free-text political affiliation entries (party memberships,
    /// advocacy groups), matched against the keyword tables
    pub political_affiliations: Vec<String>,

    /// Public statements with pre-tagged sentiment
    pub public_statements: Vec<PublicStatement>,
}

/// Completeness and freshness metadata for a mediator record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQuality {
    /// Profile completeness in percent (0-100)
    pub completeness_pct: f64,

    /// When the record was last verified against a primary source
    pub last_verified_at: Option<DateTime<Utc>>,
}

impl Default for DataQuality {
    fn default() -> Self {
        Self {
            completeness_pct: 0.0,
            last_verified_at: None,
        }
    }
}

/// Geographic location of a mediator's practice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
}

/// How a mediator record entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeSource {
    Manual,
    Scraped,
    DocumentExtraction,
}

/// Complete mediator record as held by the evidence store
///
/// Lifecycle: created on intake; `ideology_score` and affiliations are
/// periodically overwritten by the classifier/matcher; records are
/// deactivated, never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mediator {
    // === Identity ===
    /// Unique identifier
    pub id: MediatorId,

    /// Full name
    pub name: String,

    /// How the record entered the system
    pub intake_source: IntakeSource,

    /// Soft-delete flag
    pub active: bool,

    // === Professional attributes ===
    /// Short biography
    pub bio: String,

    /// Practice location
    pub location: Location,

    /// Years of mediation experience
    pub years_experience: f64,

    /// Practice areas / specializations
    pub specializations: Vec<String>,

    /// Average star rating (0-5)
    pub rating: f64,

    /// Number of reviews behind the rating
    pub review_count: u32,

    /// Whether credentials have been verified
    pub verified: bool,

    /// Known public profile URLs, handed to the web evidence fetcher
    pub profile_urls: Vec<String>,

    // === Relationships ===
    /// Current employer, if any
    pub current_employer: Option<String>,

    /// Former employers
    pub former_employers: Vec<String>,

    /// Recorded affiliations
    pub affiliations: Vec<Affiliation>,

    /// Prior case history
    pub case_history: Vec<CaseRecord>,

    // === Bias & quality ===
    /// Signals for the ideology classifier
    pub bias_indicators: BiasIndicators,

    /// Derived ideology score (-10 liberal .. +10 conservative); written
    /// only by the classifier's persistence path
    pub ideology_score: Option<f64>,

    /// Completeness and freshness metadata
    pub data_quality: DataQuality,

    // === Timestamps ===
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mediator {
    /// Create a minimally populated record for the given name
    ///
    /// Intended for tests and intake scaffolding; real records arrive with
    /// fields populated by the platform.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MediatorId::new(),
            name: name.into(),
            intake_source: IntakeSource::Manual,
            active: true,
            bio: String::new(),
            location: Location::default(),
            years_experience: 0.0,
            specializations: Vec::new(),
            rating: 0.0,
            review_count: 0,
            verified: false,
            profile_urls: Vec::new(),
            current_employer: None,
            former_employers: Vec::new(),
            affiliations: Vec::new(),
            case_history: Vec::new(),
            bias_indicators: BiasIndicators::default(),
            ideology_score: None,
            data_quality: DataQuality::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Political leaning label derived from a merged ideology score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leaning {
    Liberal,
    Neutral,
    Conservative,
}

impl Leaning {
    /// Derive the label from a signed score on the -10..10 scale
    ///
    /// Fixed thresholds: below -3 liberal, above +3 conservative,
    /// neutral in between.
    pub fn from_score(score: f64) -> Self {
        if score < -3.0 {
            Leaning::Liberal
        } else if score > 3.0 {
            Leaning::Conservative
        } else {
            Leaning::Neutral
        }
    }
}

impl std::fmt::Display for Leaning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Leaning::Liberal => write!(f, "liberal"),
            Leaning::Neutral => write!(f, "neutral"),
            Leaning::Conservative => write!(f, "conservative"),
        }
    }
}

/// A human correction of a prior automated conflict prediction
///
/// Immutable once reviewed; consumed exactly once by the evaluator's
/// training-export step (marked, not deleted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// Unique identifier
    pub id: FeedbackId,

    /// Model type the prediction came from
    pub model_type: String,

    /// What the engine predicted
    pub predicted_has_conflict: bool,

    /// What the reviewer determined
    pub actual_has_conflict: bool,

    /// Confidence the engine attached to its prediction (0-1)
    pub prediction_confidence: f64,

    /// Case type the prediction was made for
    pub case_type: String,

    /// Reviewer's confidence in their own judgment (0-1)
    pub reviewer_confidence: f64,

    /// When the human review happened
    pub reviewed_at: DateTime<Utc>,

    /// Set by the training export; never unset
    pub used_for_retraining: bool,
}

/// Lifecycle state of a model version
///
/// created -> active -> deactivated (terminal). A deactivated version may
/// be referenced as `previous_version` by a later one but is never
/// reactivated in place; redeploying requires a fresh version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    Created,
    Active,
    Deactivated,
}

/// Confusion matrix over (predicted, actual) has-conflict pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: u32,
    pub false_positives: u32,
    pub true_negatives: u32,
    pub false_negatives: u32,
}

impl ConfusionMatrix {
    pub fn total(&self) -> u32 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Metrics snapshot attached to a model version by the evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,

    /// How many feedback records fed the evaluation
    pub sample_count: usize,

    /// When the evaluation ran
    pub evaluated_at: DateTime<Utc>,
}

impl ModelMetrics {
    /// Letter grade derived from F1 at read time, never stored
    pub fn performance_grade(&self) -> char {
        if self.f1 >= 0.9 {
            'A'
        } else if self.f1 >= 0.8 {
            'B'
        } else if self.f1 >= 0.7 {
            'C'
        } else if self.f1 >= 0.6 {
            'D'
        } else {
            'F'
        }
    }
}

/// An immutable, versioned classification model entry in the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Semantic version string, unique per model type
    pub version: String,

    /// Model family (e.g. "conflict_detector")
    pub model_type: String,

    /// Latest metrics snapshot, overwritten on re-evaluation
    pub metrics: Option<ModelMetrics>,

    /// Lifecycle state; at most one Active version per model type
    pub status: VersionStatus,

    /// When the version was activated
    pub deployed_at: Option<DateTime<Utc>>,

    /// When the version was deactivated
    pub deactivated_at: Option<DateTime<Utc>>,

    /// Version string this one superseded
    pub previous_version: Option<String>,

    /// Percentage F1 improvement over `previous_version`, computed when
    /// metrics are stored and the predecessor has metrics of its own
    pub improvement_over_previous_pct: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl ModelVersion {
    pub fn is_active(&self) -> bool {
        self.status == VersionStatus::Active
    }
}

/// Filter for pulling feedback out of the evidence store
#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    /// Restrict to a model type
    pub model_type: Option<String>,

    /// Minimum reviewer confidence (inclusive)
    pub min_reviewer_confidence: Option<f64>,

    /// Only records reviewed at or after this instant
    pub since: Option<DateTime<Utc>>,

    /// Only records reviewed strictly before this instant
    pub until: Option<DateTime<Utc>>,

    /// Restrict by retraining-consumption flag
    pub used_for_retraining: Option<bool>,
}

/// Case attributes the suitability scorer ranks against
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseContext {
    /// Requested practice areas; empty means no preference
    pub practice_areas: Vec<String>,

    /// Preferred location; None means no preference
    pub location: Option<Location>,

    /// Preferred ideological band; None means no preference
    pub ideology_preference: Option<Leaning>,

    /// Names of the parties to the case
    pub parties: Vec<String>,

    /// Case type label, carried into feedback records
    pub case_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mediator_id_creation() {
        let id1 = MediatorId::new();
        let id2 = MediatorId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::High > RiskLevel::Medium);
        assert!(RiskLevel::Medium > RiskLevel::Low);

        let max = [RiskLevel::Low, RiskLevel::High, RiskLevel::Medium]
            .into_iter()
            .max();
        assert_eq!(max, Some(RiskLevel::High));
    }

    #[test]
    fn test_leaning_thresholds() {
        assert_eq!(Leaning::from_score(-5.0), Leaning::Liberal);
        assert_eq!(Leaning::from_score(-3.0), Leaning::Neutral);
        assert_eq!(Leaning::from_score(0.0), Leaning::Neutral);
        assert_eq!(Leaning::from_score(3.0), Leaning::Neutral);
        assert_eq!(Leaning::from_score(3.1), Leaning::Conservative);
    }

    #[test]
    fn test_performance_grade() {
        let mut metrics = ModelMetrics {
            f1: 0.92,
            precision: 0.9,
            recall: 0.94,
            accuracy: 0.91,
            confusion: ConfusionMatrix::default(),
            sample_count: 200,
            evaluated_at: Utc::now(),
        };
        assert_eq!(metrics.performance_grade(), 'A');

        metrics.f1 = 0.74;
        assert_eq!(metrics.performance_grade(), 'C');

        metrics.f1 = 0.35;
        assert_eq!(metrics.performance_grade(), 'F');
    }

    #[test]
    fn test_risk_level_serialization() {
        let json = serde_json::to_string(&RiskLevel::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
    }
}
