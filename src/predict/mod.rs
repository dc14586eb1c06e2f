//! Prediction
//!
//! Weighted-factor win probability and score from two teams' form.

pub mod factors;

pub use factors::{
    FactorPrediction, FactorPredictor, WeightConfig, WeightParam, BASELINE_PROBABILITY,
    HOME_SCORE_BONUS, MAX_PROBABILITY, MIN_PROBABILITY,
};
