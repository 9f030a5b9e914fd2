//! Data Processor Module
//! Handles data cleaning (forward-fill) and typed column extraction.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("{0}")]
    ColumnNotFound(String),
}

/// Handles data cleaning and column access operations.
pub struct DataProcessor;

impl DataProcessor {
    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::ColumnNotFound(name.to_string()))
    }

    /// Fail with `ColumnNotFound` naming the first absent column.
    pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<(), ProcessorError> {
        names.iter().try_for_each(|name| Self::column(df, name).map(|_| ()))
    }

    /// Values of a column as `f64`, nulls preserved.
    pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let values = Self::column(df, name)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().collect())
    }

    /// Non-null values of a column as `f64`.
    pub fn present_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        Ok(Self::column_values(df, name)?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Values of an integer label column, nulls preserved.
    pub fn class_labels(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, ProcessorError> {
        let labels = Self::column(df, name)?.cast(&DataType::Int64)?;
        Ok(labels.i64()?.into_iter().collect())
    }

    /// Number of null cells per column, in column order.
    pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Replace each null with the nearest preceding non-null value of its column.
    ///
    /// Leading nulls have nothing to copy and stay null. Returns the number of
    /// cells filled.
    pub fn forward_fill(df: &mut DataFrame) -> Result<usize, ProcessorError> {
        let mut filled = 0;
        let mut columns = Vec::with_capacity(df.width());

        for col in df.get_columns() {
            let before = col.null_count();
            let series = col
                .as_materialized_series()
                .fill_null(FillNullStrategy::Forward(None))?;
            filled += before - series.null_count();
            columns.push(series.into_column());
        }

        *df = DataFrame::new(columns)?;
        log::info!("Forward-filled {} missing cells", filled);
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{wine_columns, TableLoader};

    fn table_with_gaps() -> DataFrame {
        let data = ",14.23,,2.43,15.6,127,2.80,3.06,.28,2.29,5.64,1.04,3.92,1065\n\
                    1,,1.78,2.14,11.2,100,2.65,2.76,.26,1.28,4.38,1.05,3.4,1050\n\
                    2,13.16,,2.67,18.6,101,2.8,3.24,.3,2.81,5.68,1.03,3.17,\n";
        TableLoader::load(data.as_bytes(), &wine_columns()).unwrap()
    }

    #[test]
    fn table_fill_respects_column_boundaries() {
        let mut df = table_with_gaps();
        let filled = DataProcessor::forward_fill(&mut df).unwrap();

        // Class and Malic_Acid start with a null that stays put
        assert_eq!(filled, 3);
        assert_eq!(
            DataProcessor::column_values(&df, "Alcohol").unwrap(),
            vec![Some(14.23), Some(14.23), Some(13.16)]
        );
        assert_eq!(
            DataProcessor::column_values(&df, "Malic_Acid").unwrap(),
            vec![None, Some(1.78), Some(1.78)]
        );
        assert_eq!(
            DataProcessor::class_labels(&df, "Class").unwrap(),
            vec![None, Some(1), Some(2)]
        );
        assert_eq!(df.column("Class").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn fill_is_idempotent() {
        let mut once = table_with_gaps();
        DataProcessor::forward_fill(&mut once).unwrap();
        let mut twice = once.clone();
        assert_eq!(DataProcessor::forward_fill(&mut twice).unwrap(), 0);
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn fill_never_changes_present_cells() {
        let raw = table_with_gaps();
        let mut df = raw.clone();
        DataProcessor::forward_fill(&mut df).unwrap();

        for name in wine_columns() {
            let before = DataProcessor::column_values(&raw, name).unwrap();
            let after = DataProcessor::column_values(&df, name).unwrap();
            for (b, a) in before.iter().zip(after.iter()) {
                if b.is_some() {
                    assert_eq!(b, a, "column {name}");
                }
            }
        }
    }

    #[test]
    fn null_counts_follow_column_order() {
        let counts = DataProcessor::null_counts(&table_with_gaps());
        assert_eq!(counts.len(), 14);
        assert_eq!(counts[0], ("Class".to_string(), 1));
        assert_eq!(counts[1], ("Alcohol".to_string(), 1));
        assert_eq!(counts[2], ("Malic_Acid".to_string(), 2));
        assert_eq!(counts[13], ("Proline".to_string(), 1));
    }

    #[test]
    fn unknown_column_is_reported_by_name() {
        let df = table_with_gaps();
        match DataProcessor::column_values(&df, "Vintage").unwrap_err() {
            ProcessorError::ColumnNotFound(name) => assert_eq!(name, "Vintage"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
