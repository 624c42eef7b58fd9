//! Model evaluation and version registry
//!
//! The active-learning control loop: human-reviewed feedback accumulates in
//! the evidence store, the evaluator periodically re-scores the classifier
//! against it (confusion-matrix metrics, quality gate, trend), and the
//! registry promotes improved versions with a single-active-per-type
//! invariant enforced atomically by the store.

pub mod evaluator;
pub mod metrics;
pub mod registry;

pub use evaluator::{
    EvaluationOutcome, EvaluationReport, EvaluationWindow, ModelEvaluator, TrendReport,
};
pub use metrics::{calculate_f1, MetricScores};
pub use registry::VersionRegistry;
