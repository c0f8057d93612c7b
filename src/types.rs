use serde::{Deserialize, Serialize};

/// One tick of training data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f64>,
    /// Empty when the provider has no labels for this tick
    #[serde(default)]
    pub targets: Vec<f64>,
    pub price: f64,
}

impl Sample {
    pub fn new(features: Vec<f64>, targets: Vec<f64>, price: f64) -> Self {
        Self {
            features,
            targets,
            price,
        }
    }

    pub fn unlabeled(features: Vec<f64>, price: f64) -> Self {
        Self::new(features, Vec::new(), price)
    }

    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

/// Three-way trading decision decoded from a network response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Hold,
    Buy,
    Sell,
}

impl Decision {
    /// Response layout is `[hold, buy, sell]`.
    pub fn from_response(response: &[f64]) -> Option<Self> {
        if !is_decisive(response) {
            return None;
        }
        match response.iter().position(|v| *v == 1.0) {
            Some(0) => Some(Decision::Hold),
            Some(1) => Some(Decision::Buy),
            Some(2) => Some(Decision::Sell),
            _ => None,
        }
    }

    pub fn to_response(self) -> Vec<f64> {
        match self {
            Decision::Hold => vec![1.0, 0.0, 0.0],
            Decision::Buy => vec![0.0, 1.0, 0.0],
            Decision::Sell => vec![0.0, 0.0, 1.0],
        }
    }
}

/// Whether a three-way response carries exactly one usable signal.
pub fn is_decisive(response: &[f64]) -> bool {
    if response.len() < 3 {
        return false;
    }
    let hot = response[..3].iter().filter(|v| **v == 1.0).count();
    let cold = response[..3].iter().filter(|v| **v == 0.0).count();
    hot == 1 && cold == 2
}

/// Exact-match prediction tally
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub percent: f64,
    pub true_count: usize,
    pub false_count: usize,
}

impl AccuracyStats {
    pub fn record(&mut self, matched: bool) -> bool {
        if matched {
            self.true_count += 1;
        } else {
            self.false_count += 1;
        }
        matched
    }

    /// Recomputes `percent` from the tallies.
    ///
    /// The score is centred on zero: all hits give 100, all misses -100.
    pub fn finish(&mut self) -> f64 {
        let total = self.true_count + self.false_count;
        self.percent = if total == 0 {
            0.0
        } else {
            let diff = self.true_count as f64 - self.false_count as f64;
            (diff / (total as f64 / 2.0) * 100.0) / 2.0
        };
        self.percent
    }

    pub fn meets(&self, min_percent: f64) -> bool {
        self.percent >= min_percent
    }

    pub fn summary(&self) -> String {
        format!(
            "accuracy: {:.2}%",
            crate::utils::numeric::to_fixed(self.percent, 1)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_round_trip_through_response() {
        for decision in [Decision::Hold, Decision::Buy, Decision::Sell] {
            assert_eq!(Decision::from_response(&decision.to_response()), Some(decision));
        }
    }

    #[test]
    fn test_multi_hot_responses_are_rejected() {
        assert!(!is_decisive(&[0.0, 0.0, 0.0]));
        assert!(!is_decisive(&[1.0, 1.0, 1.0]));
        assert!(!is_decisive(&[1.0, 0.0, 1.0]));
        assert!(!is_decisive(&[0.0, 1.0, 1.0]));
        assert!(is_decisive(&[0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_accuracy_percent() {
        let mut stats = AccuracyStats::default();
        for matched in [true, true, true, false] {
            stats.record(matched);
        }
        // (3 - 1) / 2 * 100 / 2
        assert_eq!(stats.finish(), 50.0);
        assert!(stats.meets(50.0));
        assert_eq!(stats.summary(), "accuracy: 50.00%");
    }

    #[test]
    fn test_accuracy_without_predictions_is_zero() {
        let mut stats = AccuracyStats::default();
        assert_eq!(stats.finish(), 0.0);
    }
}
