use super::candidate::Candidate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Whether a fitness score should be maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationDirection {
    Maximize,
    Minimize,
}

impl OptimizationDirection {
    /// Ordering that puts the better score first.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        let ordering = match self {
            OptimizationDirection::Maximize => b.partial_cmp(&a),
            OptimizationDirection::Minimize => a.partial_cmp(&b),
        };
        ordering.unwrap_or(Ordering::Equal)
    }

    /// Strict improvement of `a` over `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            OptimizationDirection::Maximize => a > b,
            OptimizationDirection::Minimize => a < b,
        }
    }

    /// Finite score that loses against everything.
    pub fn worst(self) -> f64 {
        match self {
            OptimizationDirection::Maximize => f64::MIN,
            OptimizationDirection::Minimize => f64::MAX,
        }
    }

    /// Maps NaN and infinities onto [`OptimizationDirection::worst`].
    pub fn sanitize(self, score: f64) -> f64 {
        if score.is_finite() {
            score
        } else {
            self.worst()
        }
    }

    /// Whether `score` has reached `threshold`.
    pub fn reaches(self, score: f64, threshold: f64) -> bool {
        match self {
            OptimizationDirection::Maximize => score >= threshold,
            OptimizationDirection::Minimize => score <= threshold,
        }
    }
}

/// Stable sort, best first, so equal scores keep their previous order.
pub fn sort_by_score<C: Candidate>(candidates: &mut [C], direction: OptimizationDirection) {
    candidates.sort_by(|a, b| direction.compare(a.score(), b.score()));
}

/// Sorts and keeps the top `elite_count` candidates.
pub fn select_elite<C: Candidate>(
    candidates: &mut Vec<C>,
    elite_count: usize,
    direction: OptimizationDirection,
) {
    sort_by_score(candidates, direction);
    candidates.truncate(elite_count);
}
