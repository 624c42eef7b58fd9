//! Ideology classification
//!
//! Converts keyword and statement evidence into a signed ideology score on
//! the -10..10 scale (negative liberal, positive conservative) with a 0-100
//! confidence. The keyword lists are a fixed enumerated weight table,
//! iterated once per input, so the numeric contract stays testable
//! independent of list contents.

pub mod classifier;

pub use classifier::{BatchIdeologyEntry, IdeologyClassifier, IdeologyResult};

use crate::types::Leaning;

/// Signed keyword weights: negative pulls liberal, positive conservative.
///
/// Lists carried over from the production classifier's keyword fallback.
pub(crate) const KEYWORD_WEIGHTS: &[(&str, i32)] = &[
    // Liberal-leaning terms
    ("progressive", -1),
    ("equality", -1),
    ("social justice", -1),
    ("regulation", -1),
    ("welfare", -1),
    ("rights", -1),
    ("diversity", -1),
    ("inclusion", -1),
    ("climate", -1),
    ("healthcare", -1),
    ("education", -1),
    ("labor union", -1),
    // Conservative-leaning terms
    ("traditional", 1),
    ("free market", 1),
    ("individual responsibility", 1),
    ("limited government", 1),
    ("conservative", 1),
    ("liberty", 1),
    ("freedom", 1),
    ("deregulation", 1),
    ("privatization", 1),
    ("family values", 1),
];

/// Signed point tally over ideological signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub liberal: u32,
    pub conservative: u32,
}

impl Tally {
    pub fn total(&self) -> u32 {
        self.liberal + self.conservative
    }

    pub fn add_liberal(&mut self, points: u32) {
        self.liberal += points;
    }

    pub fn add_conservative(&mut self, points: u32) {
        self.conservative += points;
    }

    /// Normalize to the -10..10 range
    ///
    /// score = (conservative - liberal) / total * 10; zero signals yield a
    /// neutral zero.
    pub fn score(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.conservative as f64 - self.liberal as f64) / total as f64 * 10.0
    }

    /// Confidence grows with signal count, capped at 80 for the database
    /// scorer (stored scores alone rate 70; only merged results reach 100)
    pub fn confidence(&self) -> f64 {
        (self.total() as f64 * 20.0).min(80.0)
    }
}

/// Tally keyword hits in a single pass over the weight table
pub(crate) fn tally_keywords(text: &str) -> Tally {
    let text = text.to_lowercase();
    let mut tally = Tally::default();
    for (keyword, weight) in KEYWORD_WEIGHTS {
        if text.contains(keyword) {
            if *weight < 0 {
                tally.add_liberal(weight.unsigned_abs());
            } else {
                tally.add_conservative(*weight as u32);
            }
        }
    }
    tally
}

/// Classify arbitrary text with the keyword table alone
///
/// Used to match a user's case description against candidate leanings;
/// no mediator context and no persistence.
pub fn classify_text(text: &str) -> IdeologyResult {
    let tally = tally_keywords(text);
    let score = tally.score();
    IdeologyResult {
        leaning: Leaning::from_score(score),
        confidence: tally.confidence(),
        ideology_score: score,
        reasoning: format!(
            "Found {} liberal and {} conservative keywords",
            tally.liberal, tally.conservative
        ),
        indicators: Vec::new(),
    }
}
