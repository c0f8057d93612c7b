use super::selection::OptimizationDirection;
use crate::config::EvolutionConfig;
use crate::engines::network::Network;
use crate::error::Result;
use crate::types::Sample;
use rand::Rng;

/// A population member the engine can score, clone and mutate.
pub trait Candidate: Clone + Send + Sync {
    fn score(&self) -> f64;
    fn set_score(&mut self, score: f64);
    /// Copy handed to the mutator; transient per-generation stats are reset.
    fn offspring(&self) -> Self;
}

/// Read-only view shared by every worker during a generation
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub samples: &'a [Sample],
    pub prices: &'a [f64],
    pub config: &'a EvolutionConfig,
}

impl<'a> EvaluationContext<'a> {
    /// Upper bound (exclusive) for trade indices.
    pub fn max_ticks(&self) -> usize {
        if self.config.ticks > 0 {
            self.config.ticks
        } else {
            self.prices.len()
        }
    }
}

pub trait Fitness<C>: Send + Sync {
    fn direction(&self) -> OptimizationDirection;

    fn evaluate<R: Rng + ?Sized>(
        &self,
        candidate: &mut C,
        context: &EvaluationContext<'_>,
        rng: &mut R,
    ) -> f64;

    /// Whether `best_score` satisfies the convergence threshold.
    fn converged(&self, best_score: f64, threshold: f64) -> bool {
        self.direction().reaches(best_score, threshold)
    }
}

pub trait Mutator<C>: Send + Sync {
    fn mutate<R: Rng + ?Sized>(&self, candidate: &mut C, context: &EvaluationContext<'_>, rng: &mut R);
}

pub trait Seeder<C>: Send + Sync {
    /// Initial population of `config.population_size` candidates.
    fn seed<R: Rng + ?Sized>(&self, context: &EvaluationContext<'_>, rng: &mut R) -> Result<Vec<C>>;

    /// One freshly seeded candidate injected during refill.
    fn fresh<R: Rng + ?Sized>(&self, context: &EvaluationContext<'_>, rng: &mut R) -> C;
}

impl Candidate for Network {
    fn score(&self) -> f64 {
        self.score
    }

    fn set_score(&mut self, score: f64) {
        self.score = score;
    }

    fn offspring(&self) -> Self {
        Network::offspring(self)
    }
}
