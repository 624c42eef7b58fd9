//! Mediatrust - Trust & Suitability Engine for mediator discovery
//!
//! A Rust engine that turns stored mediator records and best-effort web
//! evidence into confidence-weighted judgments:
//! - Conflict-of-interest detection against case parties
//! - Ideology classification with database/scraped evidence fusion
//! - Seven-factor suitability scoring and ranking
//! - Model evaluation and versioning against human-reviewed feedback
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (Mediator, ConflictFinding, Feedback, ModelVersion)
//! - **Store / Fetch**: External collaborator traits (evidence store, web fetcher)
//! - **Components**: conflicts, ideology, scoring, evaluation
//! - **Engine**: facade wiring the components for the surrounding platform
//!
//! # Example
//!
//! ```ignore
//! use mediatrust::{EngineConfig, MemoryEvidenceStore, NullFetcher, TrustEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryEvidenceStore::new());
//!     let engine = TrustEngine::new(store, Arc::new(NullFetcher), EngineConfig::default());
//!
//!     let verdict = engine
//!         .check_conflicts(mediator_id, &["Acme LLC".to_string()])
//!         .await?;
//!     println!("{:?} {}", verdict.overall_risk, verdict.recommendation);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod conflicts;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fetch;
pub mod ideology;
pub mod scoring;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use conflicts::{BatchConflictEntry, ConflictVerdict, QuickCheck};
pub use engine::TrustEngine;
pub use error::{Result, TrustError};
pub use evaluation::{
    EvaluationOutcome, EvaluationReport, EvaluationWindow, ModelEvaluator, TrendReport,
    VersionRegistry,
};
pub use fetch::{
    FetchOutcome, NullFetcher, ScrapedAffiliations, ScrapedConflict, ScrapedIdeology,
    WebEvidenceFetcher,
};
pub use ideology::{IdeologyClassifier, IdeologyResult};
pub use scoring::{
    RankingReport, RecommendationLabel, ScoreBreakdown, SuitabilityScore, SuitabilityScorer,
};
pub use store::{memory::MemoryEvidenceStore, EvidenceStore};
pub use types::{
    Affiliation, BiasIndicators, CaseContext, CaseRecord, ConflictFinding, ConflictKind,
    ConflictSource, Feedback, FeedbackFilter, FeedbackId, Leaning, Mediator, MediatorId,
    ModelMetrics, ModelVersion, RiskLevel, VersionStatus,
};
