//! Checkball model tuning
//!
//! Rolling team form, a weighted linear-factor win predictor, and a greedy
//! per-parameter search for the weights that predict past results best.

pub mod data;
pub mod features;
pub mod predict;
pub mod training;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::predict::WeightConfig;
use crate::training::ParamRange;

/// League a game was played in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nba,
    Wnba,
    Nfl,
    Mlb,
    Nhl,
}

impl Sport {
    pub fn code(&self) -> &'static str {
        match self {
            Sport::Nba => "nba",
            Sport::Wnba => "wnba",
            Sport::Nfl => "nfl",
            Sport::Mlb => "mlb",
            Sport::Nhl => "nhl",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "nba" => Some(Sport::Nba),
            "wnba" => Some(Sport::Wnba),
            "nfl" => Some(Sport::Nfl),
            "mlb" => Some(Sport::Mlb),
            "nhl" => Some(Sport::Nhl),
            _ => None,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code().to_uppercase())
    }
}

impl FromStr for Sport {
    type Err = CheckballError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Sport::from_code(s).ok_or_else(|| CheckballError::UnknownSport(s.to_string()))
    }
}

/// Box-score statistics the model consumes.
///
/// Every field is optional: the upstream feed only reports what it has, and a
/// missing stat is excluded from that stat's average rather than counted as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    #[serde(rename = "fieldGoalPct", default, skip_serializing_if = "Option::is_none")]
    pub field_goal_pct: Option<f64>,
    #[serde(
        rename = "threePointFieldGoalPct",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub three_point_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assists: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebounds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnovers: Option<f64>,
}

impl GameStatistics {
    /// Build from feed `(name, displayValue)` pairs.
    ///
    /// Display values like `"47.3%"` lose the percent sign before parsing.
    /// Unknown names are ignored and unparseable values count as not recorded.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut stats = GameStatistics::default();
        for (name, display_value) in entries {
            let value = display_value.trim().trim_end_matches('%').trim().parse::<f64>().ok();
            match name {
                "fieldGoalPct" => stats.field_goal_pct = value,
                "threePointFieldGoalPct" => stats.three_point_pct = value,
                "assists" => stats.assists = value,
                "rebounds" => stats.rebounds = value,
                "turnovers" => stats.turnovers = value,
                _ => {}
            }
        }
        stats
    }
}

/// One side of a completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResult {
    pub name: String,
    pub score: u32,
    pub won: bool,
    #[serde(default)]
    pub statistics: GameStatistics,
}

/// A completed game as supplied by the schedule feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(with = "crate::data::games::feed_date")]
    pub date: DateTime<Utc>,
    pub sport: Sport,
    pub home: TeamResult,
    pub away: TeamResult,
}

impl GameRecord {
    /// Check if a team played in this game
    pub fn involves(&self, team: &str) -> bool {
        self.home.name == team || self.away.name == team
    }

    /// Check if a team was playing at home
    pub fn is_home(&self, team: &str) -> Option<bool> {
        if self.home.name == team {
            Some(true)
        } else if self.away.name == team {
            Some(false)
        } else {
            None
        }
    }

    /// Get the side for a team and the opposing side
    pub fn sides_for(&self, team: &str) -> Option<(&TeamResult, &TeamResult)> {
        match self.is_home(team)? {
            true => Some((&self.home, &self.away)),
            false => Some((&self.away, &self.home)),
        }
    }

    /// Ties are filtered upstream, so at most one side may be the winner
    pub fn validate(&self) -> Result<()> {
        if self.home.won && self.away.won {
            return Err(CheckballError::Parse(format!(
                "game on {} lists both {} and {} as winner",
                self.date, self.home.name, self.away.name
            )));
        }
        Ok(())
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum CheckballError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown sport: {0}")]
    UnknownSport(String),

    #[error("Not enough games to tune the model: have {found}, need {required}")]
    InsufficientGames { found: usize, required: usize },
}

pub type Result<T> = std::result::Result<T, CheckballError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub form: FormConfig,
    pub weights: WeightConfig,
    pub search: SearchConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    pub window_size: usize,
    pub min_games: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub ranges: Vec<ParamRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub games_path: String,
    pub sport: Sport,
    pub min_training_games: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            form: FormConfig {
                window_size: features::form::DEFAULT_WINDOW_SIZE,
                min_games: features::form::MIN_FORM_GAMES,
            },
            weights: WeightConfig::default(),
            search: SearchConfig {
                ranges: ParamRange::defaults(),
            },
            data: DataConfig {
                games_path: "data/games.json".to_string(),
                sport: Sport::Nba,
                min_training_games: 50,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckballError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CheckballError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CheckballError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sport_codes() {
        assert_eq!(Sport::from_code("NBA"), Some(Sport::Nba));
        assert_eq!(Sport::from_code("wnba"), Some(Sport::Wnba));
        assert_eq!(Sport::from_code("cricket"), None);
        assert_eq!(Sport::Nhl.to_string(), "NHL");
        assert!("soccer".parse::<Sport>().is_err());
    }

    #[test]
    fn test_statistics_from_entries() {
        let stats = GameStatistics::from_entries([
            ("fieldGoalPct", "47.3%"),
            ("threePointFieldGoalPct", "35"),
            ("assists", "24"),
            ("turnovers", "--"),
            ("fouls", "19"),
        ]);
        assert_eq!(stats.field_goal_pct, Some(47.3));
        assert_eq!(stats.three_point_pct, Some(35.0));
        assert_eq!(stats.assists, Some(24.0));
        assert_eq!(stats.rebounds, None);
        assert_eq!(stats.turnovers, None);
    }

    #[test]
    fn test_game_record_json() {
        let raw = r#"{
            "date": "2024-01-15T00:30:00Z",
            "sport": "nba",
            "home": {"name": "Celtics", "score": 112, "won": true,
                     "statistics": {"fieldGoalPct": 48.1, "assists": 27}},
            "away": {"name": "Knicks", "score": 104, "won": false}
        }"#;
        let game: GameRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(game.sport, Sport::Nba);
        assert_eq!(game.home.statistics.field_goal_pct, Some(48.1));
        assert_eq!(game.away.statistics, GameStatistics::default());
        assert_eq!(game.is_home("Knicks"), Some(false));
        assert!(game.sides_for("Lakers").is_none());
        assert!(game.validate().is_ok());
    }

    #[test]
    fn test_double_winner_rejected() {
        let raw = r#"{
            "date": "2024-01-15T00:30:00Z",
            "sport": "nba",
            "home": {"name": "Celtics", "score": 100, "won": true},
            "away": {"name": "Knicks", "score": 100, "won": true}
        }"#;
        let game: GameRecord = serde_json::from_str(raw).unwrap();
        assert!(matches!(game.validate(), Err(CheckballError::Parse(_))));
    }

    #[test]
    fn test_config_toml_roundtrip_keeps_range_order() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        let names: Vec<_> = parsed.search.ranges.iter().map(|r| r.param).collect();
        let expected: Vec<_> = config.search.ranges.iter().map(|r| r.param).collect();
        assert_eq!(names, expected);
        assert_eq!(parsed.form.window_size, 10);
        assert_eq!(parsed.data.min_training_games, 50);
    }
}
