use serde::{Deserialize, Serialize};

/// Columns the sample builder reads from market data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesColumn {
    Close,
    Volume,
    Trades,
}

impl SeriesColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Volume => "volume",
            Self::Trades => "trades",
        }
    }

    /// Common alternative column names
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Close => vec!["close", "Close", "CLOSE", "c"],
            Self::Volume => vec!["volume", "Volume", "VOLUME", "vol", "Vol", "v"],
            Self::Trades => vec!["trades", "Trades", "TRADES", "num_trades", "n"],
        }
    }
}

/// Raw per-tick series pulled out of a data file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub close: Vec<f64>,
    pub volume: Option<Vec<f64>>,
    pub trades: Option<Vec<f64>>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

/// Summary of a loaded data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_samples: usize,
    pub feature_width: usize,
    pub price_range: (f64, f64), // (min, max)
}
