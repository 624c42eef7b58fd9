//! Web evidence fetcher abstraction
//!
//! The scraping transport (HTTP fetch, headless browser control) lives
//! outside this crate. What the engine needs is the shape of its answers
//! and a hard rule about failure: fetch problems surface as a typed
//! `Unavailable` outcome that every caller pattern-matches with an explicit
//! fallback branch, never as an error that aborts a conflict check.

use crate::types::{Leaning, RiskLevel};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Result of a best-effort external fetch
///
/// Deliberately not a `Result`: unavailability is an expected, recoverable
/// state, and modeling it as a variant forces callers into an explicit
/// fallback branch instead of an implicit default baked into error handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum FetchOutcome<T> {
    /// The fetch completed; the payload may still be empty
    Ok { data: T },

    /// Transport failure, timeout, or empty upstream; carry the reason for
    /// logging, never for user display
    Unavailable { reason: String },
}

impl<T> FetchOutcome<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        FetchOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, FetchOutcome::Ok { .. })
    }
}

/// A potential conflict reported by the scraping tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedConflict {
    /// Entity the scraper associated with the mediator
    pub entity: String,

    /// Case party the entity was checked against
    pub party: String,

    /// Scraper's own risk estimate; the aggregator caps this at MEDIUM
    pub risk: RiskLevel,
}

/// Affiliation evidence scraped from public profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedAffiliations {
    /// Raw affiliation strings found on the profiles
    pub affiliations: Vec<String>,

    /// Overlaps the scraper itself flagged against the requested parties
    pub potential_conflicts: Vec<ScrapedConflict>,
}

/// Ideology evidence scraped from public statements and profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedIdeology {
    pub leaning: Leaning,

    /// Scraper confidence (0-100)
    pub confidence: f64,

    /// Signed score on the -10..10 scale
    pub ideology_score: f64,

    /// Evidence snippets backing the estimate
    pub indicators: Vec<String>,
}

/// Web evidence fetcher trait
///
/// Implementations must degrade gracefully: any transport error becomes
/// `Unavailable`, and callers never see a hard failure from this seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebEvidenceFetcher: Send + Sync {
    /// Scrape affiliations for a mediator and flag overlaps with `check_for`
    async fn fetch_affiliations(
        &self,
        urls: &[String],
        name: &str,
        check_for: &[String],
    ) -> FetchOutcome<ScrapedAffiliations>;

    /// Scrape ideology evidence for a mediator
    async fn fetch_ideology(&self, urls: &[String], name: &str) -> FetchOutcome<ScrapedIdeology>;
}

/// Fetcher for hosts without a scraping tier; always unavailable
pub struct NullFetcher;

#[async_trait]
impl WebEvidenceFetcher for NullFetcher {
    async fn fetch_affiliations(
        &self,
        _urls: &[String],
        _name: &str,
        _check_for: &[String],
    ) -> FetchOutcome<ScrapedAffiliations> {
        FetchOutcome::unavailable("no scraping tier configured")
    }

    async fn fetch_ideology(&self, _urls: &[String], _name: &str) -> FetchOutcome<ScrapedIdeology> {
        FetchOutcome::unavailable("no scraping tier configured")
    }
}

/// Bound a fetch future by the configured timeout
///
/// An elapsed timer is just another `Unavailable`; the caller proceeds with
/// database-only results rather than blocking the whole check.
pub async fn with_timeout<T, F>(bound: Duration, what: &str, fut: F) -> FetchOutcome<T>
where
    F: Future<Output = FetchOutcome<T>>,
{
    match tokio::time::timeout(bound, fut).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!("Web evidence fetch timed out after {:?} ({})", bound, what);
            FetchOutcome::unavailable(format!("timeout after {:?}", bound))
        }
    }
}
