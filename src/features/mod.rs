//! Feature extraction
//!
//! Turns raw game history into per-team form summaries.

pub mod form;

pub use form::{FormCalculator, FormSummary};
