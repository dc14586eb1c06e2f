//! Model tuning
//!
//! Chronological replay of past games and the greedy search over weights.

pub mod evaluator;
pub mod metrics;
pub mod weight_search;

pub use evaluator::AccuracyEvaluator;
pub use metrics::{EvaluationResult, Metrics};
pub use weight_search::{Improvement, ParamRange, SearchOutcome, WeightSearch};
