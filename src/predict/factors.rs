//! Weighted linear-factor predictor
//!
//! Each factor is a form differential times its weight. The factors are summed
//! onto an even 50% baseline and clamped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::FormSummary;

/// Baseline win probability before any factor applies
pub const BASELINE_PROBABILITY: f64 = 50.0;
/// Lowest reported win probability
pub const MIN_PROBABILITY: f64 = 10.0;
/// Highest reported win probability
pub const MAX_PROBABILITY: f64 = 90.0;
/// Points added to the home side's predicted score
pub const HOME_SCORE_BONUS: f64 = 3.0;

/// Named model weights, in declared search order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightParam {
    WinRate,
    ScoreDiff,
    HomeAdvantage,
    FgPct,
    ThreePct,
    Assists,
    Rebounds,
    Turnovers,
}

impl WeightParam {
    pub const ALL: [WeightParam; 8] = [
        WeightParam::WinRate,
        WeightParam::ScoreDiff,
        WeightParam::HomeAdvantage,
        WeightParam::FgPct,
        WeightParam::ThreePct,
        WeightParam::Assists,
        WeightParam::Rebounds,
        WeightParam::Turnovers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeightParam::WinRate => "win_rate",
            WeightParam::ScoreDiff => "score_diff",
            WeightParam::HomeAdvantage => "home_advantage",
            WeightParam::FgPct => "fg_pct",
            WeightParam::ThreePct => "three_pct",
            WeightParam::Assists => "assists",
            WeightParam::Rebounds => "rebounds",
            WeightParam::Turnovers => "turnovers",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        WeightParam::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for WeightParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Factor weights.
///
/// A plain `Copy` value: trial configurations are always fresh copies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub win_rate: f64,
    pub score_diff: f64,
    pub home_advantage: f64,
    pub fg_pct: f64,
    pub three_pct: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub turnovers: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        WeightConfig {
            win_rate: 30.0,
            score_diff: 2.5,
            home_advantage: 5.0,
            fg_pct: 20.0,
            three_pct: 10.0,
            assists: 1.0,
            rebounds: 0.5,
            turnovers: 1.0,
        }
    }
}

impl WeightConfig {
    pub fn get(&self, param: WeightParam) -> f64 {
        match param {
            WeightParam::WinRate => self.win_rate,
            WeightParam::ScoreDiff => self.score_diff,
            WeightParam::HomeAdvantage => self.home_advantage,
            WeightParam::FgPct => self.fg_pct,
            WeightParam::ThreePct => self.three_pct,
            WeightParam::Assists => self.assists,
            WeightParam::Rebounds => self.rebounds,
            WeightParam::Turnovers => self.turnovers,
        }
    }

    /// Copy with one weight replaced
    pub fn with(mut self, param: WeightParam, value: f64) -> Self {
        let slot = match param {
            WeightParam::WinRate => &mut self.win_rate,
            WeightParam::ScoreDiff => &mut self.score_diff,
            WeightParam::HomeAdvantage => &mut self.home_advantage,
            WeightParam::FgPct => &mut self.fg_pct,
            WeightParam::ThreePct => &mut self.three_pct,
            WeightParam::Assists => &mut self.assists,
            WeightParam::Rebounds => &mut self.rebounds,
            WeightParam::Turnovers => &mut self.turnovers,
        };
        *slot = value;
        self
    }

    /// `(param, weight)` pairs sorted by name
    pub fn sorted_entries(&self) -> Vec<(WeightParam, f64)> {
        let mut entries: Vec<_> = WeightParam::ALL.iter().map(|&p| (p, self.get(p))).collect();
        entries.sort_by_key(|(p, _)| p.name());
        entries
    }
}

/// Predictor output for one side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorPrediction {
    /// Win probability in percent, within [10, 90] unless an input was NaN
    pub win_probability: f64,
    pub predicted_score: f64,
}

/// Linear-factor predictor over two form summaries
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorPredictor {
    pub weights: WeightConfig,
}

impl FactorPredictor {
    pub fn new(weights: WeightConfig) -> Self {
        FactorPredictor { weights }
    }

    /// Predict `team` against `opponent`.
    ///
    /// Returns `None` if either summary is missing. NaN stat averages are not
    /// sanitized: they carry through the factor sum and `f64::clamp`, so the
    /// probability comes out NaN.
    pub fn predict(
        &self,
        team: Option<&FormSummary>,
        opponent: Option<&FormSummary>,
        is_home: bool,
    ) -> Option<FactorPrediction> {
        let (team, opponent) = (team?, opponent?);

        let advantage: f64 = self.factors(team, opponent, is_home).iter().sum();
        let win_probability =
            (BASELINE_PROBABILITY + advantage).clamp(MIN_PROBABILITY, MAX_PROBABILITY);

        let predicted_score = if is_home {
            team.avg_score + HOME_SCORE_BONUS
        } else {
            team.avg_score
        };

        Some(FactorPrediction {
            win_probability,
            predicted_score,
        })
    }

    /// The individual weighted factors, home advantage included only for the home side
    pub fn factors(&self, team: &FormSummary, opponent: &FormSummary, is_home: bool) -> Vec<f64> {
        let w = &self.weights;
        let mut factors = Vec::with_capacity(8);

        factors.push((team.win_rate - opponent.win_rate) * w.win_rate);
        factors.push((team.avg_margin() - opponent.avg_margin()) * w.score_diff);
        if is_home {
            factors.push(w.home_advantage);
        }
        factors.push((team.avg_fg_pct - opponent.avg_fg_pct) * w.fg_pct);
        factors.push((team.avg_3pt_pct - opponent.avg_3pt_pct) * w.three_pct);
        factors.push((team.avg_assists - opponent.avg_assists) * w.assists);
        factors.push((team.avg_rebounds - opponent.avg_rebounds) * w.rebounds);
        // Fewer turnovers is better
        factors.push((opponent.avg_turnovers - team.avg_turnovers) * w.turnovers);

        factors
    }
}
