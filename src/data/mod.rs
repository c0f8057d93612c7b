pub mod connectors;
pub mod features;
pub mod provider;

pub use connectors::{CsvConnector, DatasetMetadata, PriceSeries};
pub use provider::{prices, validate_samples, SampleProvider, VecProvider};
