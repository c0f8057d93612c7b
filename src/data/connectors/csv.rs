use super::{
    types::{DatasetMetadata, PriceSeries, SeriesColumn},
    validator::DataValidator,
};
use crate::config::DataConfig;
use crate::data::features::build_samples;
use crate::data::provider::SampleProvider;
use crate::error::{EvotradeError, Result};
use crate::types::Sample;
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Sample provider backed by a market data CSV
pub struct CsvConnector {
    path: PathBuf,
    config: DataConfig,
}

impl CsvConnector {
    pub fn new<P: AsRef<Path>>(path: P, config: DataConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| EvotradeError::InvalidData(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Pull the close series and, when present, volume and trade counts.
    pub fn extract_series(df: &DataFrame) -> Result<PriceSeries> {
        let close_name = DataValidator::require_column(df, &SeriesColumn::Close)?;
        let close = Self::column_values(df, close_name)?;

        let volume = match DataValidator::find_column(df, &SeriesColumn::Volume) {
            Some(name) => Some(Self::column_values(df, name)?),
            None => None,
        };
        let trades = match DataValidator::find_column(df, &SeriesColumn::Trades) {
            Some(name) => Some(Self::column_values(df, name)?),
            None => None,
        };

        Ok(PriceSeries {
            close,
            volume,
            trades,
        })
    }

    /// Load, validate and convert the file into samples plus a summary.
    pub fn load_with_metadata(&self) -> Result<(Vec<Sample>, DatasetMetadata)> {
        let df = Self::load(&self.path)?;
        DataValidator::validate_minimum_rows(&df, self.config.min_rows)?;

        // Warn about nulls but don't fail
        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected, forward filling: {:?}", null_report);
        }

        let series = Self::extract_series(&df)?;
        let samples = build_samples(&series, &self.config)?;

        let (min, max) = series
            .close
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(*p), hi.max(*p)));

        let metadata = DatasetMetadata {
            file_path: self.path.to_string_lossy().to_string(),
            num_rows: df.height(),
            num_samples: samples.len(),
            feature_width: samples.first().map(|s| s.features.len()).unwrap_or(0),
            price_range: (min, max),
        };
        log::info!(
            "Loaded {} samples ({} features) from {}",
            metadata.num_samples,
            metadata.feature_width,
            metadata.file_path
        );

        Ok((samples, metadata))
    }

    /// Column as `f64`, nulls forward-filled from the previous row.
    fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        let values = column.f64()?;

        let mut out = Vec::with_capacity(values.len());
        let mut last: Option<f64> = None;
        for (row, value) in values.into_iter().enumerate() {
            match value.or(last) {
                Some(v) => {
                    out.push(v);
                    last = Some(v);
                }
                None => {
                    return Err(EvotradeError::InvalidData(format!(
                        "Column '{}' starts with a null at row {}",
                        name, row
                    )))
                }
            }
        }
        Ok(out)
    }
}

impl SampleProvider for CsvConnector {
    fn load_samples(&self) -> Result<Vec<Sample>> {
        self.load_with_metadata().map(|(samples, _)| samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_extract_series_with_aliases() {
        let df = df! {
            "Close" => &[100.0, 101.0, 102.0],
            "Vol" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap();

        let series = CsvConnector::extract_series(&df).unwrap();
        assert_eq!(series.close, vec![100.0, 101.0, 102.0]);
        assert_eq!(series.volume, Some(vec![1000.0, 1500.0, 1200.0]));
        assert!(series.trades.is_none());
    }

    #[test]
    fn test_nulls_are_forward_filled() {
        let df = df! {
            "close" => &[Some(100.0), None, Some(102.0)],
        }
        .unwrap();

        let series = CsvConnector::extract_series(&df).unwrap();
        assert_eq!(series.close, vec![100.0, 100.0, 102.0]);
    }

    #[test]
    fn test_leading_null_is_rejected() {
        let df = df! {
            "close" => &[None, Some(101.0)],
        }
        .unwrap();

        assert!(CsvConnector::extract_series(&df).is_err());
    }
}
