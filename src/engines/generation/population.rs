use super::hall_of_fame::BestEver;
use crate::config::EvolutionConfig;
use crate::error::Result;
use crate::persistence;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to pause and resume an evolution run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationState<C> {
    pub candidates: Vec<C>,
    pub config: EvolutionConfig,
    pub iteration: usize,
    /// Best score of the most recent generation
    pub best_score: f64,
    pub best_ever: Option<BestEver<C>>,
    /// Generations since the best-ever record last improved
    pub stagnant_generations: usize,
    pub started_at: DateTime<Utc>,
}

impl<C> PopulationState<C> {
    pub fn new(candidates: Vec<C>, config: EvolutionConfig, initial_score: f64) -> Self {
        Self {
            candidates,
            config,
            iteration: 0,
            best_score: initial_score,
            best_ever: None,
            stagnant_generations: 0,
            started_at: Utc::now(),
        }
    }

    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

impl<C: Serialize + DeserializeOwned> PopulationState<C> {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save(path, self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load(path)
    }

    pub fn try_load<P: AsRef<Path>>(path: P) -> Option<Self> {
        persistence::try_load(path)
    }
}
