//! Confusion-matrix metrics
//!
//! Pure numeric helpers shared by the evaluator: confusion matrix from
//! (predicted, actual) pairs, precision/recall/F1/accuracy with explicit
//! zero-denominator rules, and the percentage trend delta between two
//! evaluations. All ratios are rounded to 4 decimal places.

use crate::error::{Result, TrustError};
use crate::types::ConfusionMatrix;
use serde::{Deserialize, Serialize};

/// Round to 4 decimal places
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Build a confusion matrix from (predicted, actual) has-conflict pairs
pub fn confusion_from_pairs<I>(pairs: I) -> ConfusionMatrix
where
    I: IntoIterator<Item = (bool, bool)>,
{
    let mut matrix = ConfusionMatrix::default();
    for (predicted, actual) in pairs {
        match (predicted, actual) {
            (true, true) => matrix.true_positives += 1,
            (true, false) => matrix.false_positives += 1,
            (false, false) => matrix.true_negatives += 1,
            (false, true) => matrix.false_negatives += 1,
        }
    }
    matrix
}

/// Precision, recall, F1, and accuracy for one confusion matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
}

/// Derive the four ratios, with 0-denominators yielding 0.0
pub fn summarize(matrix: &ConfusionMatrix) -> MetricScores {
    let tp = matrix.true_positives as f64;
    let fp = matrix.false_positives as f64;
    let tn = matrix.true_negatives as f64;
    let fn_ = matrix.false_negatives as f64;

    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
    let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    let total = tp + fp + tn + fn_;
    let accuracy = if total > 0.0 { (tp + tn) / total } else { 0.0 };

    MetricScores {
        precision: round4(precision),
        recall: round4(recall),
        f1: round4(f1),
        accuracy: round4(accuracy),
    }
}

/// Metrics from parallel predicted/actual arrays
///
/// Arrays must be the same length; the pairing is positional.
pub fn calculate_f1(predicted: &[bool], actual: &[bool]) -> Result<MetricScores> {
    if predicted.len() != actual.len() {
        return Err(TrustError::Validation(format!(
            "predicted/actual length mismatch: {} vs {}",
            predicted.len(),
            actual.len()
        )));
    }
    let matrix = confusion_from_pairs(predicted.iter().copied().zip(actual.iter().copied()));
    Ok(summarize(&matrix))
}

/// Percentage F1 delta between the latest and previous evaluation
///
/// None when the previous F1 is zero (no meaningful baseline).
pub fn f1_delta_pct(latest_f1: f64, previous_f1: f64) -> Option<f64> {
    if previous_f1 == 0.0 {
        return None;
    }
    Some(round4((latest_f1 - previous_f1) / previous_f1 * 100.0))
}
