use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvotradeError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden_layers: usize,
    pub neurons: usize,
    /// Output width; 0 takes the width of the samples' targets
    pub outputs: usize,
    pub learn_rate: f64,
    pub bias: bool,
    pub regression: bool,
    pub final_activation: bool,
    pub min_weight: f64,
    pub max_weight: f64,
    /// Full-dataset sweeps performed by `Network::train`
    pub iterations: usize,
    pub log_every: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden_layers: 1,
            neurons: 10,
            outputs: 0,
            learn_rate: 0.01,
            bias: false,
            regression: false,
            final_activation: true,
            min_weight: -10.0,
            max_weight: 10.0,
            iterations: 100,
            log_every: 50,
        }
    }
}

impl ConfigSection for NetworkConfig {
    fn section_name() -> &'static str {
        "network"
    }

    fn validate(&self) -> Result<(), EvotradeError> {
        if self.hidden_layers > 0 && self.neurons == 0 {
            return Err(EvotradeError::Configuration(
                "Hidden layers need at least one neuron".to_string(),
            ));
        }
        if self.min_weight > self.max_weight {
            return Err(EvotradeError::Configuration(
                "Minimum weight must not exceed maximum weight".to_string(),
            ));
        }
        if !self.learn_rate.is_finite() {
            return Err(EvotradeError::Configuration(
                "Learn rate must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Network".to_string(),
            fields: vec![
                FieldManifest::new("hidden_layers", "integer", json!(1), "Hidden layer count"),
                FieldManifest::new("neurons", "integer", json!(10), "Neurons per hidden layer")
                    .bounded(Some(1.0), None),
                FieldManifest::new(
                    "outputs",
                    "integer",
                    json!(0),
                    "Output width, 0 derives it from targets",
                ),
                FieldManifest::new("learn_rate", "float", json!(0.01), "Backpropagation step"),
                FieldManifest::new("bias", "bool", json!(false), "Append bias neurons"),
                FieldManifest::new(
                    "regression",
                    "bool",
                    json!(false),
                    "Return raw outputs instead of classes",
                ),
                FieldManifest::new(
                    "final_activation",
                    "bool",
                    json!(true),
                    "Squash the output layer",
                ),
                FieldManifest::new("min_weight", "float", json!(-10.0), "Initial weight lower bound"),
                FieldManifest::new("max_weight", "float", json!(10.0), "Initial weight upper bound"),
                FieldManifest::new("iterations", "integer", json!(100), "Training sweeps"),
                FieldManifest::new("log_every", "integer", json!(50), "Training log throttle"),
            ],
        }
    }
}
