use super::types::SeriesColumn;
use crate::error::{EvotradeError, Result};
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Find the actual name of `column` by checking its aliases
    pub fn find_column<'a>(df: &'a DataFrame, column: &SeriesColumn) -> Option<&'a str> {
        let columns = df.get_column_names();
        columns
            .into_iter()
            .find(|col| column.aliases().contains(&col.as_str()))
            .map(|col| col.as_str())
    }

    pub fn require_column<'a>(df: &'a DataFrame, column: &SeriesColumn) -> Result<&'a str> {
        Self::find_column(df, column).ok_or_else(|| {
            EvotradeError::InvalidData(format!(
                "Missing required column: {} (tried aliases: {:?})",
                column.as_str(),
                column.aliases()
            ))
        })
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(EvotradeError::InvalidData(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, empty when the frame is complete
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}
