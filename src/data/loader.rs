//! Table Loader Module
//! Parses headerless comma-delimited text into a labeled Polars DataFrame.

use crate::data::ArchiveMember;
use polars::prelude::*;
use thiserror::Error;

/// Name of the categorical label column (always the first field).
pub const CLASS_COLUMN: &str = "Class";

/// The 13 numeric measurements, in file order after the class label.
pub const FEATURE_COLUMNS: [&str; 13] = [
    "Alcohol",
    "Malic_Acid",
    "Ash",
    "Alcalinity_of_Ash",
    "Magnesium",
    "Total_Phenols",
    "Flavanoids",
    "Nonflavanoid_Phenols",
    "Proanthocyanins",
    "Color_Intensity",
    "Hue",
    "OD280/OD315_of_Diluted_Wines",
    "Proline",
];

/// Cell contents treated as a missing value.
const MISSING_MARKERS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "<NA>", "#N/A",
];

/// Full positional schema of the wine data file.
pub fn wine_columns() -> Vec<&'static str> {
    std::iter::once(CLASS_COLUMN)
        .chain(FEATURE_COLUMNS.iter().copied())
        .collect()
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Parse error on line {line}: {reason}")]
    ParseError { line: u64, reason: String },
    #[error("Schema must name at least one column")]
    EmptySchema,
    #[error("Failed to build table: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Loads delimited text into a DataFrame with a caller-supplied schema.
///
/// The first schema column is parsed as an integer class label, every other
/// column as `f64`. Loading is all-or-nothing.
pub struct TableLoader;

impl TableLoader {
    /// Load the wine member extracted from an archive.
    pub fn load_member(member: &ArchiveMember) -> Result<DataFrame, LoaderError> {
        log::debug!("Parsing member '{}'", member.name);
        Self::load(&member.bytes, &wine_columns())
    }

    /// Parse `bytes` as headerless CSV, naming fields positionally after `columns`.
    pub fn load(bytes: &[u8], columns: &[&str]) -> Result<DataFrame, LoaderError> {
        let (class_name, feature_names) = columns.split_first().ok_or(LoaderError::EmptySchema)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut classes: Vec<Option<i64>> = Vec::new();
        let mut features: Vec<Vec<Option<f64>>> = vec![Vec::new(); feature_names.len()];

        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|e| LoaderError::ParseError {
                line: e.position().map(|p| p.line()).unwrap_or(idx as u64 + 1),
                reason: e.to_string(),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(idx as u64 + 1);

            // Blank lines are skipped
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }

            if record.len() != columns.len() {
                return Err(LoaderError::ParseError {
                    line,
                    reason: format!(
                        "expected {} fields, found {}",
                        columns.len(),
                        record.len()
                    ),
                });
            }

            classes.push(Self::parse_class(&record[0], class_name, line)?);
            for (i, name) in feature_names.iter().enumerate() {
                features[i].push(Self::parse_number(&record[i + 1], name, line)?);
            }
        }

        let mut frame_columns = Vec::with_capacity(columns.len());
        frame_columns.push(Column::new((*class_name).into(), classes));
        for (name, values) in feature_names.iter().zip(features) {
            frame_columns.push(Column::new((*name).into(), values));
        }

        let df = DataFrame::new(frame_columns)?;
        log::info!("Loaded table: {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }

    fn is_missing(field: &str) -> bool {
        MISSING_MARKERS.contains(&field)
    }

    fn parse_number(field: &str, column: &str, line: u64) -> Result<Option<f64>, LoaderError> {
        if Self::is_missing(field) {
            return Ok(None);
        }
        field
            .parse::<f64>()
            .map(Some)
            .map_err(|_| LoaderError::ParseError {
                line,
                reason: format!("non-numeric value '{}' in column '{}'", field, column),
            })
    }

    fn parse_class(field: &str, column: &str, line: u64) -> Result<Option<i64>, LoaderError> {
        if Self::is_missing(field) {
            return Ok(None);
        }
        if let Ok(v) = field.parse::<i64>() {
            return Ok(Some(v));
        }
        match field.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
            _ => Err(LoaderError::ParseError {
                line,
                reason: format!("non-integer label '{}' in column '{}'", field, column),
            }),
        }
    }
}
