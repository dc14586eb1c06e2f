//! Greedy coordinate-wise weight search
//!
//! Walks the parameters in declared order, trying each candidate value on a
//! copy of the current best weights. A strictly better trial is adopted at
//! once, so later parameters are tuned against the improved baseline and the
//! result depends on parameter order.

use serde::{Deserialize, Serialize};

use crate::data::GameSeries;
use crate::predict::{WeightConfig, WeightParam};

use super::evaluator::AccuracyEvaluator;
use super::metrics::EvaluationResult;

/// Candidate values for one weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub param: WeightParam,
    pub values: Vec<f64>,
}

impl ParamRange {
    pub fn new(param: WeightParam, values: Vec<f64>) -> Self {
        ParamRange { param, values }
    }

    /// Stock candidate grid, one entry per weight in declared order
    pub fn defaults() -> Vec<ParamRange> {
        vec![
            ParamRange::new(WeightParam::WinRate, vec![20.0, 25.0, 30.0, 35.0, 40.0]),
            ParamRange::new(WeightParam::ScoreDiff, vec![1.5, 2.0, 2.5, 3.0, 3.5]),
            ParamRange::new(WeightParam::HomeAdvantage, vec![3.0, 4.0, 5.0, 6.0, 7.0]),
            ParamRange::new(WeightParam::FgPct, vec![15.0, 20.0, 25.0, 30.0]),
            ParamRange::new(WeightParam::ThreePct, vec![5.0, 10.0, 15.0, 20.0]),
            ParamRange::new(WeightParam::Assists, vec![0.5, 1.0, 1.5, 2.0]),
            ParamRange::new(WeightParam::Rebounds, vec![0.3, 0.5, 0.8, 1.0]),
            ParamRange::new(WeightParam::Turnovers, vec![0.5, 1.0, 1.5, 2.0]),
        ]
    }
}

/// An accepted trial
#[derive(Debug, Clone, PartialEq)]
pub struct Improvement {
    pub param: WeightParam,
    pub value: f64,
    pub accuracy: f64,
    /// Gain over the best accuracy at the time of acceptance
    pub improvement: f64,
    pub result: EvaluationResult,
}

/// Everything a search run produced
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Evaluation of the initial weights
    pub baseline: Option<EvaluationResult>,
    pub best_weights: WeightConfig,
    pub best_accuracy: f64,
    /// Accepted trials in acceptance order
    pub improvements: Vec<Improvement>,
}

impl SearchOutcome {
    /// The `n` largest gains, largest first
    pub fn top_improvements(&self, n: usize) -> Vec<&Improvement> {
        let mut ranked: Vec<&Improvement> = self.improvements.iter().collect();
        // Stable sort keeps acceptance order among equal gains
        ranked.sort_by(|a, b| b.improvement.total_cmp(&a.improvement));
        ranked.truncate(n);
        ranked
    }
}

/// Running best threaded through the sweep
struct Best {
    weights: WeightConfig,
    accuracy: f64,
    improvements: Vec<Improvement>,
}

/// Per-parameter grid search over weight configurations
#[derive(Debug, Clone)]
pub struct WeightSearch {
    pub evaluator: AccuracyEvaluator,
    pub ranges: Vec<ParamRange>,
}

impl Default for WeightSearch {
    fn default() -> Self {
        WeightSearch {
            evaluator: AccuracyEvaluator::default(),
            ranges: ParamRange::defaults(),
        }
    }
}

impl WeightSearch {
    pub fn new(evaluator: AccuracyEvaluator, ranges: Vec<ParamRange>) -> Self {
        WeightSearch { evaluator, ranges }
    }

    /// Best weights and their accuracy
    pub fn optimize(&self, series: &GameSeries, initial: &WeightConfig) -> (WeightConfig, f64) {
        let outcome = self.run(series, initial);
        (outcome.best_weights, outcome.best_accuracy)
    }

    /// One pass over every parameter's candidates.
    ///
    /// The initial weights score 0 if they cannot be evaluated. Trials that
    /// cannot be evaluated are never accepted.
    pub fn run(&self, series: &GameSeries, initial: &WeightConfig) -> SearchOutcome {
        log::info!(
            "Optimizing {} weights over {} games",
            self.ranges.len(),
            series.len()
        );

        let baseline = self.evaluator.evaluate(series, initial);
        match &baseline {
            Some(result) => log::info!("Initial weights: {}", result),
            None => log::warn!("Initial weights scored no games"),
        }

        let start = Best {
            weights: *initial,
            accuracy: baseline.map_or(0.0, |r| r.accuracy),
            improvements: Vec::new(),
        };

        let best = self
            .ranges
            .iter()
            .flat_map(|range| range.values.iter().map(move |&value| (range.param, value)))
            .fold(start, |best, (param, value)| self.try_candidate(series, best, param, value));

        if best.improvements.is_empty() {
            log::info!("No candidate beat the initial weights");
        }
        log::info!("Best accuracy: {:.1}%", best.accuracy * 100.0);

        SearchOutcome {
            baseline,
            best_weights: best.weights,
            best_accuracy: best.accuracy,
            improvements: best.improvements,
        }
    }

    fn try_candidate(
        &self,
        series: &GameSeries,
        mut best: Best,
        param: WeightParam,
        value: f64,
    ) -> Best {
        let trial = best.weights.with(param, value);
        let Some(result) = self.evaluator.evaluate(series, &trial) else {
            log::debug!("{}={}: no games scored", param, value);
            return best;
        };
        log::debug!("{}={}: {}", param, value, result);

        if result.accuracy > best.accuracy {
            let improvement = result.accuracy - best.accuracy;
            log::info!(
                "{}: {} -> {:.1}% (+{:.1}%)",
                param,
                value,
                result.accuracy * 100.0,
                improvement * 100.0
            );
            best.improvements.push(Improvement {
                param,
                value,
                accuracy: result.accuracy,
                improvement,
                result,
            });
            best.weights = trial;
            best.accuracy = result.accuracy;
        }
        best
    }
}
