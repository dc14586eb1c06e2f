//! Game data
//!
//! The ordered game sequence and loading it from the feed's JSON output.

pub mod games;

pub use games::GameSeries;
