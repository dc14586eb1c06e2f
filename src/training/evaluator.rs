//! Chronological replay of a game series
//!
//! Each game is predicted from form computed only from games dated before it.

use crate::data::GameSeries;
use crate::features::FormCalculator;
use crate::predict::{FactorPredictor, WeightConfig, BASELINE_PROBABILITY};

use super::metrics::{EvaluationResult, Metrics};

/// Scores a weight configuration against past results
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyEvaluator {
    pub form: FormCalculator,
}

impl AccuracyEvaluator {
    pub fn new(form: FormCalculator) -> Self {
        AccuracyEvaluator { form }
    }

    /// Replay every game with `weights`.
    ///
    /// Games where either side lacks form are skipped. Returns `None` if no
    /// game could be scored.
    pub fn evaluate(
        &self,
        series: &GameSeries,
        weights: &WeightConfig,
    ) -> Option<EvaluationResult> {
        let predictor = FactorPredictor::new(*weights);
        let mut metrics = Metrics::new();
        let mut skipped = 0usize;

        for game in series {
            let home_form = self.form.form(series, &game.home.name, game.date);
            let away_form = self.form.form(series, &game.away.name, game.date);

            let Some(prediction) = predictor.predict(home_form.as_ref(), away_form.as_ref(), true)
            else {
                skipped += 1;
                continue;
            };

            let home_won = game.home.won;
            let predicted_home_win = prediction.win_probability > BASELINE_PROBABILITY;

            let score_error = (prediction.predicted_score - game.home.score as f64).abs();
            let actual = if home_won { 100.0 } else { 0.0 };
            let prob_error = (prediction.win_probability - actual).abs();

            metrics.update(predicted_home_win == home_won, score_error, prob_error);
        }

        log::debug!(
            "Evaluated {} games ({} counted, {} skipped for missing form)",
            series.len(),
            metrics.total,
            skipped
        );

        metrics.finish()
    }
}
