//! Chronological game sequence
//!
//! Every consumer of past games relies on "later in the slice" meaning
//! "later in time", so the sequence type owns the sort.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::path::Path;

use crate::{GameRecord, Result, Sport};

/// Completed games in ascending date order
#[derive(Debug, Clone, Default)]
pub struct GameSeries {
    games: Vec<GameRecord>,
}

impl GameSeries {
    /// Create a series, stably sorting by date.
    ///
    /// Games that share a timestamp keep the order they were supplied in.
    pub fn new(mut games: Vec<GameRecord>) -> Self {
        games.sort_by(|a, b| a.date.cmp(&b.date));
        GameSeries { games }
    }

    /// Load a JSON array of game records from disk
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let series = Self::from_json_str(&raw)?;
        log::info!("Loaded {} games from {}", series.len(), path.display());
        Ok(series)
    }

    /// Parse a JSON array of game records
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let games: Vec<GameRecord> = serde_json::from_str(raw)?;
        for game in &games {
            game.validate()?;
        }
        Ok(Self::new(games))
    }

    /// Keep only games from one league
    pub fn of_sport(&self, sport: Sport) -> Self {
        GameSeries {
            games: self
                .games
                .iter()
                .filter(|g| g.sport == sport)
                .cloned()
                .collect(),
        }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameRecord> {
        self.games.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl From<Vec<GameRecord>> for GameSeries {
    fn from(games: Vec<GameRecord>) -> Self {
        Self::new(games)
    }
}

impl<'a> IntoIterator for &'a GameSeries {
    type Item = &'a GameRecord;
    type IntoIter = std::slice::Iter<'a, GameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.games.iter()
    }
}

/// Parse a game timestamp.
///
/// The schedule feed reports minute precision (`2024-01-15T00:30Z`), which is
/// not valid RFC 3339, so both forms are accepted.
pub fn parse_game_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for game dates, always written back as RFC 3339
pub(crate) mod feed_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_game_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid game date: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameStatistics, TeamResult};
    use chrono::TimeZone;

    fn make_game(day: u32, home: &str, away: &str) -> GameRecord {
        GameRecord {
            date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            sport: Sport::Nba,
            home: TeamResult {
                name: home.to_string(),
                score: 100,
                won: true,
                statistics: GameStatistics::default(),
            },
            away: TeamResult {
                name: away.to_string(),
                score: 90,
                won: false,
                statistics: GameStatistics::default(),
            },
        }
    }

    #[test]
    fn test_series_sorts_by_date() {
        let series = GameSeries::new(vec![
            make_game(3, "A", "B"),
            make_game(1, "C", "D"),
            make_game(2, "E", "F"),
        ]);
        let homes: Vec<_> = series.iter().map(|g| g.home.name.as_str()).collect();
        assert_eq!(homes, vec!["C", "E", "A"]);
    }

    #[test]
    fn test_sort_is_stable_for_shared_timestamps() {
        let series = GameSeries::new(vec![
            make_game(2, "Late", "X"),
            make_game(1, "First", "X"),
            make_game(1, "Second", "X"),
        ]);
        let homes: Vec<_> = series.iter().map(|g| g.home.name.as_str()).collect();
        assert_eq!(homes, vec!["First", "Second", "Late"]);
    }

    #[test]
    fn test_feed_date_formats() {
        let expected: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 1, 15, 0, 30, 0).unwrap();
        assert_eq!(parse_game_date("2024-01-15T00:30Z"), Some(expected));
        assert_eq!(parse_game_date("2024-01-15T00:30:00Z"), Some(expected));
        assert_eq!(parse_game_date("2024-01-14T19:30:00-05:00"), Some(expected));
        assert_eq!(parse_game_date("yesterday"), None);
    }

    #[test]
    fn test_from_json_str() {
        let raw = r#"[
            {"date": "2024-01-16T00:00Z", "sport": "nba",
             "home": {"name": "A", "score": 101, "won": false},
             "away": {"name": "B", "score": 110, "won": true}},
            {"date": "2024-01-15T00:00Z", "sport": "wnba",
             "home": {"name": "C", "score": 80, "won": true},
             "away": {"name": "D", "score": 70, "won": false}}
        ]"#;
        let series = GameSeries::from_json_str(raw).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.games()[0].home.name, "C");
        assert_eq!(series.of_sport(Sport::Nba).len(), 1);

        let out = serde_json::to_string(&series.games()[0]).unwrap();
        assert!(out.contains("2024-01-15T00:00:00Z"));
    }

    #[test]
    fn test_from_json_str_rejects_bad_records() {
        assert!(GameSeries::from_json_str("not json").is_err());
        let two_winners = r#"[
            {"date": "2024-01-16T00:00Z", "sport": "nba",
             "home": {"name": "A", "score": 101, "won": true},
             "away": {"name": "B", "score": 110, "won": true}}
        ]"#;
        assert!(GameSeries::from_json_str(two_winners).is_err());
    }
}
