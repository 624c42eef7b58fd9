//! Conflict-of-interest detection
//!
//! Two layers: a pure matcher over the stored mediator record, and an
//! aggregator that folds in best-effort scraped evidence and derives the
//! overall verdict and recommendation text.

pub mod aggregator;
pub mod matcher;

pub use aggregator::{BatchConflictEntry, ConflictAggregator, ConflictVerdict};
pub use matcher::{find_conflicts, quick_check, QuickCheck};
