//! Rolling team form
//!
//! Summarizes a team's most recent games before a reference instant.

use chrono::{DateTime, Utc};

use crate::data::GameSeries;
use crate::{GameRecord, GameStatistics};

/// Default number of recent games in a form window
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Fewer qualifying games than this and no form is reported
pub const MIN_FORM_GAMES: usize = 3;

/// A team's form over its recent window.
///
/// Stat averages only cover window games that recorded the stat, and are
/// NaN when none did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSummary {
    /// Games in the window
    pub games_played: usize,
    /// Win ratio (0-1)
    pub win_rate: f64,
    pub avg_score: f64,
    pub avg_opponent_score: f64,
    /// Wins at home over games at home, 0 with no home games
    pub home_win_rate: f64,
    /// Wins away over games away, 0 with no away games
    pub away_win_rate: f64,
    pub avg_fg_pct: f64,
    pub avg_3pt_pct: f64,
    pub avg_assists: f64,
    pub avg_rebounds: f64,
    pub avg_turnovers: f64,
}

impl FormSummary {
    /// Average scoring margin per game
    pub fn avg_margin(&self) -> f64 {
        self.avg_score - self.avg_opponent_score
    }
}

/// One game from a specific team's perspective
#[derive(Debug, Clone, Copy)]
struct Appearance {
    won: bool,
    score: u32,
    opponent_score: u32,
    statistics: GameStatistics,
    was_home: bool,
}

impl Appearance {
    fn from_game(game: &GameRecord, team: &str) -> Option<Self> {
        let was_home = game.is_home(team)?;
        let (side, opponent) = game.sides_for(team)?;
        Some(Appearance {
            won: side.won,
            score: side.score,
            opponent_score: opponent.score,
            statistics: side.statistics,
            was_home,
        })
    }
}

/// Computes form summaries from a game series
#[derive(Debug, Clone, Copy)]
pub struct FormCalculator {
    /// Window size (number of recent games)
    pub window_size: usize,
    /// Minimum games in the window for a summary
    pub min_games: usize,
}

impl Default for FormCalculator {
    fn default() -> Self {
        FormCalculator {
            window_size: DEFAULT_WINDOW_SIZE,
            min_games: MIN_FORM_GAMES,
        }
    }
}

impl FormCalculator {
    pub fn new(window_size: usize, min_games: usize) -> Self {
        FormCalculator {
            window_size,
            min_games,
        }
    }

    /// Form for `team` over its last `window_size` games strictly before `cutoff`.
    ///
    /// Returns `None` when fewer than `min_games` games qualify.
    pub fn form(
        &self,
        series: &GameSeries,
        team: &str,
        cutoff: DateTime<Utc>,
    ) -> Option<FormSummary> {
        let appearances: Vec<Appearance> = series
            .iter()
            .filter(|g| g.date < cutoff)
            .filter_map(|g| Appearance::from_game(g, team))
            .collect();

        let start = appearances.len().saturating_sub(self.window_size);
        let window = &appearances[start..];

        if window.len() < self.min_games.max(1) {
            return None;
        }

        Some(summarize(window))
    }
}

fn summarize(window: &[Appearance]) -> FormSummary {
    let n = window.len() as f64;

    let wins = window.iter().filter(|a| a.won).count();
    let home_games = window.iter().filter(|a| a.was_home).count();
    let home_wins = window.iter().filter(|a| a.won && a.was_home).count();
    let away_games = window.len() - home_games;
    let away_wins = wins - home_wins;

    let total_score: u64 = window.iter().map(|a| a.score as u64).sum();
    let total_against: u64 = window.iter().map(|a| a.opponent_score as u64).sum();

    FormSummary {
        games_played: window.len(),
        win_rate: wins as f64 / n,
        avg_score: total_score as f64 / n,
        avg_opponent_score: total_against as f64 / n,
        // Empty splits report 0 rather than undefined
        home_win_rate: home_wins as f64 / home_games.max(1) as f64,
        away_win_rate: away_wins as f64 / away_games.max(1) as f64,
        avg_fg_pct: mean_recorded(window.iter().map(|a| a.statistics.field_goal_pct)),
        avg_3pt_pct: mean_recorded(window.iter().map(|a| a.statistics.three_point_pct)),
        avg_assists: mean_recorded(window.iter().map(|a| a.statistics.assists)),
        avg_rebounds: mean_recorded(window.iter().map(|a| a.statistics.rebounds)),
        avg_turnovers: mean_recorded(window.iter().map(|a| a.statistics.turnovers)),
    }
}

/// Mean over the recorded values, NaN if nothing was recorded
fn mean_recorded<I>(values: I) -> f64
where
    I: Iterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sport, TeamResult};
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn make_game(n: i64, home: &str, away: &str, home_score: u32, away_score: u32) -> GameRecord {
        GameRecord {
            date: day(n),
            sport: Sport::Nba,
            home: TeamResult {
                name: home.to_string(),
                score: home_score,
                won: home_score > away_score,
                statistics: GameStatistics::default(),
            },
            away: TeamResult {
                name: away.to_string(),
                score: away_score,
                won: away_score > home_score,
                statistics: GameStatistics::default(),
            },
        }
    }

    fn with_fg(mut game: GameRecord, home_fg: Option<f64>) -> GameRecord {
        game.home.statistics.field_goal_pct = home_fg;
        game
    }

    #[test]
    fn test_too_few_games() {
        let series = GameSeries::new(vec![
            make_game(0, "A", "B", 100, 90),
            make_game(1, "B", "A", 95, 99),
            make_game(2, "C", "D", 80, 70),
        ]);
        let calc = FormCalculator::default();
        assert!(calc.form(&series, "A", day(10)).is_none());
        assert!(calc.form(&series, "Z", day(10)).is_none());
    }

    #[test]
    fn test_basic_summary() {
        let series = GameSeries::new(vec![
            make_game(0, "A", "B", 100, 90), // home win
            make_game(1, "B", "A", 95, 99),  // away win
            make_game(2, "A", "C", 88, 92),  // home loss
        ]);
        let form = FormCalculator::default().form(&series, "A", day(3)).unwrap();

        assert_eq!(form.games_played, 3);
        assert_relative_eq!(form.win_rate, 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(form.avg_score, (100.0 + 99.0 + 88.0) / 3.0, epsilon = 1e-12);
        assert_relative_eq!(form.avg_opponent_score, (90.0 + 95.0 + 92.0) / 3.0, epsilon = 1e-12);
        assert_relative_eq!(form.home_win_rate, 0.5, epsilon = 1e-12);
        assert_relative_eq!(form.away_win_rate, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cutoff_is_strict() {
        let series = GameSeries::new(vec![
            make_game(0, "A", "B", 100, 90),
            make_game(1, "A", "B", 100, 90),
            make_game(2, "A", "B", 100, 90),
            make_game(3, "A", "B", 10, 90),
        ]);
        let calc = FormCalculator::default();

        // Game on the cutoff itself is excluded
        let form = calc.form(&series, "A", day(3)).unwrap();
        assert_eq!(form.games_played, 3);
        assert_relative_eq!(form.win_rate, 1.0);

        assert!(calc.form(&series, "A", day(2)).is_none());
    }

    #[test]
    fn test_window_keeps_most_recent() {
        // Supplied newest-first; the series sorts before windowing
        let games: Vec<_> = (0..6)
            .rev()
            .map(|n| {
                if n < 3 {
                    make_game(n, "A", "B", 80, 100)
                } else {
                    make_game(n, "A", "B", 100, 80)
                }
            })
            .collect();
        let series = GameSeries::new(games);
        let form = FormCalculator::new(3, 3).form(&series, "A", day(10)).unwrap();

        assert_eq!(form.games_played, 3);
        assert_relative_eq!(form.win_rate, 1.0);
        assert_relative_eq!(form.avg_score, 100.0);
    }

    #[test]
    fn test_empty_split_reports_zero() {
        let series = GameSeries::new(vec![
            make_game(0, "A", "B", 100, 90),
            make_game(1, "A", "C", 100, 90),
            make_game(2, "A", "D", 100, 90),
        ]);
        let form = FormCalculator::default().form(&series, "A", day(5)).unwrap();
        assert_relative_eq!(form.home_win_rate, 1.0);
        assert_eq!(form.away_win_rate, 0.0);
    }

    #[test]
    fn test_stat_average_skips_unrecorded_games() {
        let series = GameSeries::new(vec![
            with_fg(make_game(0, "A", "B", 100, 90), Some(40.0)),
            with_fg(make_game(1, "A", "B", 100, 90), None),
            with_fg(make_game(2, "A", "B", 100, 90), Some(50.0)),
        ]);
        let form = FormCalculator::default().form(&series, "A", day(5)).unwrap();
        assert_relative_eq!(form.avg_fg_pct, 45.0);
    }

    #[test]
    fn test_unrecorded_stat_is_nan() {
        let series = GameSeries::new(vec![
            make_game(0, "A", "B", 100, 90),
            make_game(1, "A", "B", 100, 90),
            make_game(2, "A", "B", 100, 90),
        ]);
        let form = FormCalculator::default().form(&series, "A", day(5)).unwrap();
        assert!(form.avg_fg_pct.is_nan());
        assert!(form.avg_turnovers.is_nan());
        assert!(form.avg_score.is_finite());
    }
}
