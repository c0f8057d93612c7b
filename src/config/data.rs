use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::EvotradeError;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Feature construction for the CSV sample provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Previous ticks folded into each feature vector
    pub window: usize,
    pub include_volume: bool,
    pub include_trades: bool,
    /// Attach hold/buy/sell targets from the next tick's move
    pub labels: bool,
    /// Percent move that counts as buy/sell when labelling
    pub label_threshold: f64,
    pub min_rows: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            window: 24,
            include_volume: true,
            include_trades: true,
            labels: false,
            label_threshold: 0.5,
            min_rows: 100,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), EvotradeError> {
        if self.window == 0 {
            return Err(EvotradeError::Configuration(
                "Feature window must be at least 1".to_string(),
            ));
        }
        if self.label_threshold < 0.0 {
            return Err(EvotradeError::Configuration(
                "Label threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Data".to_string(),
            fields: vec![
                FieldManifest::new("window", "integer", json!(24), "Ticks per feature window")
                    .bounded(Some(1.0), None),
                FieldManifest::new("include_volume", "bool", json!(true), "Volume change features"),
                FieldManifest::new("include_trades", "bool", json!(true), "Trade count features"),
                FieldManifest::new("labels", "bool", json!(false), "Attach next-move targets"),
                FieldManifest::new(
                    "label_threshold",
                    "float",
                    json!(0.5),
                    "Percent move treated as a signal",
                )
                .bounded(Some(0.0), None),
                FieldManifest::new("min_rows", "integer", json!(100), "Minimum CSV rows"),
            ],
        }
    }
}
