mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{DatasetMetadata, PriceSeries, SeriesColumn};
pub use validator::DataValidator;
