//! Evaluation metrics

use std::fmt;

/// Accuracy and error metrics from replaying a game series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationResult {
    /// correct / total (0-1)
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
    /// Mean absolute error of the predicted home score
    pub avg_score_error: f64,
    /// Mean distance between home win probability and the 0/100 outcome
    pub avg_prob_error: f64,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acc: {:.1}% ({}/{}) | Score MAE: {:.1} | Prob error: {:.1}%",
            self.accuracy * 100.0,
            self.correct,
            self.total,
            self.avg_score_error,
            self.avg_prob_error
        )
    }
}

/// Metrics accumulated while replaying games
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Number of correct win predictions
    pub correct: usize,
    /// Counted predictions
    pub total: usize,
    /// Sum of absolute home score errors
    pub score_error_sum: f64,
    pub score_error_count: usize,
    /// Sum of absolute probability errors
    pub prob_error_sum: f64,
    pub prob_error_count: usize,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one counted prediction
    pub fn update(&mut self, was_correct: bool, score_error: f64, prob_error: f64) {
        self.total += 1;
        if was_correct {
            self.correct += 1;
        }
        self.score_error_sum += score_error;
        self.score_error_count += 1;
        self.prob_error_sum += prob_error;
        self.prob_error_count += 1;
    }

    /// Get win prediction accuracy
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn avg_score_error(&self) -> f64 {
        if self.score_error_count == 0 {
            0.0
        } else {
            self.score_error_sum / self.score_error_count as f64
        }
    }

    pub fn avg_prob_error(&self) -> f64 {
        if self.prob_error_count == 0 {
            0.0
        } else {
            self.prob_error_sum / self.prob_error_count as f64
        }
    }

    /// Final result, `None` when nothing was counted
    pub fn finish(&self) -> Option<EvaluationResult> {
        if self.total == 0 {
            return None;
        }
        Some(EvaluationResult {
            accuracy: self.accuracy(),
            correct: self.correct,
            total: self.total,
            avg_score_error: self.avg_score_error(),
            avg_prob_error: self.avg_prob_error(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_metrics() {
        let m = Metrics::new();
        assert_eq!(m.accuracy(), 0.0);
        assert_eq!(m.avg_score_error(), 0.0);
        assert!(m.finish().is_none());
    }

    #[test]
    fn test_accumulate() {
        let mut m = Metrics::new();
        m.update(true, 4.0, 20.0);
        m.update(false, 6.0, 70.0);
        m.update(true, 2.0, 30.0);

        let result = m.finish().unwrap();
        assert_eq!(result.correct, 2);
        assert_eq!(result.total, 3);
        assert_relative_eq!(result.accuracy, 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(result.avg_score_error, 4.0, epsilon = 1e-12);
        assert_relative_eq!(result.avg_prob_error, 40.0, epsilon = 1e-12);
        assert!(result.to_string().starts_with("Acc: 66.7% (2/3)"));
    }
}
