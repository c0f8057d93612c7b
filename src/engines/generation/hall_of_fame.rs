use super::candidate::Candidate;
use super::selection::OptimizationDirection;
use serde::{Deserialize, Serialize};

/// Best candidate seen across all generations, kept independently of the
/// live population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestEver<C> {
    pub score: f64,
    /// Generation in which it was found
    pub iteration: usize,
    pub candidate: C,
}

impl<C: Candidate> BestEver<C> {
    pub fn new(candidate: &C, iteration: usize) -> Self {
        Self {
            score: candidate.score(),
            iteration,
            candidate: candidate.clone(),
        }
    }

    /// Replaces the record when `candidate` strictly beats it.
    pub fn offer(
        record: &mut Option<Self>,
        candidate: &C,
        iteration: usize,
        direction: OptimizationDirection,
    ) -> bool {
        let improved = match record {
            Some(best) => direction.is_better(candidate.score(), best.score),
            None => true,
        };
        if improved {
            *record = Some(Self::new(candidate, iteration));
        }
        improved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::order::Order;

    fn scored(score: f64) -> Order {
        let mut order = Order::new(vec![1, 2]);
        order.score = score;
        order
    }

    #[test]
    fn test_only_strict_improvements_replace() {
        let mut record = None;
        assert!(BestEver::offer(&mut record, &scored(5.0), 0, OptimizationDirection::Maximize));
        assert!(!BestEver::offer(&mut record, &scored(5.0), 1, OptimizationDirection::Maximize));
        assert!(!BestEver::offer(&mut record, &scored(4.0), 2, OptimizationDirection::Maximize));
        assert!(BestEver::offer(&mut record, &scored(6.0), 3, OptimizationDirection::Maximize));

        let best = record.unwrap();
        assert_eq!(best.score, 6.0);
        assert_eq!(best.iteration, 3);
    }
}
