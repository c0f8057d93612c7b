use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvotradeError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Survivors kept after each selection
    pub elite_count: usize,
    /// Mutations applied to every clone before it rejoins the population
    pub sub_mutations: usize,
    /// Freshly seeded candidates injected per generation
    pub new_items: usize,
    pub parent_selection: ParentSelection,
    pub min_weight: f64,
    pub max_weight: f64,
    /// Convergence threshold for `StopStrategy::ScoreThreshold`
    pub best_result: f64,
    pub budget: f64,
    /// Tick count of the price series; 0 means "use the sample count"
    pub ticks: usize,
    /// Order density as a percent of `ticks`
    pub perc_by_ticks: usize,
    /// Spread around `perc_by_ticks`, also in percent of `ticks`
    pub diff_shift: usize,
    pub max_mutate_attempts: usize,
    pub hours: f64,
    pub trades_by_day: f64,
    pub stop_strategy: StopStrategy,
    pub max_iterations: usize,
    pub max_stagnant_generations: usize,
    /// Progress lines are emitted every `log_every` generations
    pub log_every: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopStrategy {
    ScoreThreshold,
    MaxIterations,
    NoImprovement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentSelection {
    /// Uniformly among the surviving elites
    Uniform,
    /// Always the current leader
    Best,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            elite_count: 100,
            sub_mutations: 100,
            new_items: 0,
            parent_selection: ParentSelection::Uniform,
            min_weight: -100.0,
            max_weight: 100.0,
            best_result: 0.001,
            budget: 1000.0,
            ticks: 0,
            perc_by_ticks: 10,
            diff_shift: 2,
            max_mutate_attempts: 100,
            hours: 0.0,
            trades_by_day: 0.0,
            stop_strategy: StopStrategy::MaxIterations,
            max_iterations: 1000,
            max_stagnant_generations: 1000,
            log_every: 100,
        }
    }
}

impl EvolutionConfig {
    /// Number of trades expected over the configured horizon, used to
    /// normalise trading scores.
    pub fn expected_trades(&self) -> f64 {
        self.hours / 24.0 * self.trades_by_day
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvotradeError> {
        if self.population_size == 0 {
            return Err(EvotradeError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.elite_count == 0 || self.elite_count > self.population_size {
            return Err(EvotradeError::Configuration(format!(
                "Elite count must be between 1 and the population size ({})",
                self.population_size
            )));
        }
        if self.min_weight > self.max_weight {
            return Err(EvotradeError::Configuration(
                "Minimum weight must not exceed maximum weight".to_string(),
            ));
        }
        if !self.budget.is_finite() {
            return Err(EvotradeError::Configuration(
                "Budget must be a finite number".to_string(),
            ));
        }
        if self.stop_strategy == StopStrategy::MaxIterations && self.max_iterations == 0 {
            return Err(EvotradeError::Configuration(
                "Max iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    json!(500),
                    "Number of candidates in the population",
                )
                .bounded(Some(1.0), None),
                FieldManifest::new(
                    "elite_count",
                    "integer",
                    json!(100),
                    "Candidates retained after selection",
                )
                .bounded(Some(1.0), None),
                FieldManifest::new(
                    "sub_mutations",
                    "integer",
                    json!(100),
                    "Mutations applied to each clone",
                ),
                FieldManifest::new(
                    "new_items",
                    "integer",
                    json!(0),
                    "Fresh random candidates per generation",
                ),
                FieldManifest::new(
                    "parent_selection",
                    "enum",
                    json!("uniform"),
                    "uniform | best",
                ),
                FieldManifest::new("min_weight", "float", json!(-100.0), "Lower mutation bound"),
                FieldManifest::new("max_weight", "float", json!(100.0), "Upper mutation bound"),
                FieldManifest::new(
                    "best_result",
                    "float",
                    json!(0.001),
                    "Score that ends a threshold-stopped run",
                ),
                FieldManifest::new("budget", "float", json!(1000.0), "Simulated starting budget"),
                FieldManifest::new(
                    "ticks",
                    "integer",
                    json!(0),
                    "Price series length, 0 derives it from the samples",
                ),
                FieldManifest::new(
                    "perc_by_ticks",
                    "integer",
                    json!(10),
                    "Order density in percent of ticks",
                )
                .bounded(Some(0.0), Some(100.0)),
                FieldManifest::new(
                    "diff_shift",
                    "integer",
                    json!(2),
                    "Density spread in percent of ticks",
                )
                .bounded(Some(0.0), Some(100.0)),
                FieldManifest::new(
                    "max_mutate_attempts",
                    "integer",
                    json!(100),
                    "Retries for duplicate-avoiding mutations",
                ),
                FieldManifest::new("hours", "float", json!(0.0), "Horizon of the sample series"),
                FieldManifest::new(
                    "trades_by_day",
                    "float",
                    json!(0.0),
                    "Expected trade frequency",
                ),
                FieldManifest::new(
                    "stop_strategy",
                    "enum",
                    json!("max_iterations"),
                    "score_threshold | max_iterations | no_improvement",
                ),
                FieldManifest::new("max_iterations", "integer", json!(1000), "Iteration budget"),
                FieldManifest::new(
                    "max_stagnant_generations",
                    "integer",
                    json!(1000),
                    "Generations without a new best before stopping",
                ),
                FieldManifest::new("log_every", "integer", json!(100), "Progress throttle"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 500);
        assert_eq!(config.elite_count, 100);
        assert_eq!(config.budget, 1000.0);
        assert_eq!(config.best_result, 0.001);
    }

    #[test]
    fn test_elite_larger_than_population_is_rejected() {
        let config = EvolutionConfig {
            population_size: 10,
            elite_count: 11,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_weight_bounds_are_rejected() {
        let config = EvolutionConfig {
            min_weight: 5.0,
            max_weight: -5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manifest_lists_every_field() {
        let manifest = EvolutionConfig::default().to_manifest();
        let json = serde_json::to_value(EvolutionConfig::default()).unwrap();
        let keys = json.as_object().unwrap();
        assert_eq!(manifest.fields.len(), keys.len());
        for key in keys.keys() {
            assert!(manifest.field(key).is_some(), "missing manifest for {}", key);
        }
    }
}
