//! Console report formatting.

use crate::data::DataProcessor;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Let Polars print every column of the wide wine tables.
pub fn configure_display() {
    std::env::set_var("POLARS_FMT_MAX_COLS", "-1");
    std::env::set_var("POLARS_FMT_STR_LEN", "40");
}

pub fn format_listing(listing: &[String]) -> String {
    format!("Files in ZIP: {:?}", listing)
}

/// Row count plus per-column non-null count and dtype.
pub fn format_info(df: &DataFrame) -> String {
    let width = df
        .get_column_names()
        .iter()
        .map(|n| n.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut out = String::new();
    out.push_str(&format!(
        "DataFrame: {} entries, {} columns\n",
        df.height(),
        df.width()
    ));
    out.push_str(&format!(
        " #   {:<width$}  Non-Null Count  Dtype\n",
        "Column",
        width = width
    ));
    for (i, col) in df.get_columns().iter().enumerate() {
        let non_null = col.len() - col.null_count();
        out.push_str(&format!(
            " {:<3} {:<width$}  {:>5} non-null  {}\n",
            i,
            col.name().as_str(),
            non_null,
            col.dtype(),
            width = width
        ));
    }
    let mut dtypes: BTreeMap<String, usize> = BTreeMap::new();
    for col in df.get_columns() {
        *dtypes.entry(col.dtype().to_string()).or_default() += 1;
    }
    let tally: Vec<String> = dtypes
        .iter()
        .map(|(dtype, n)| format!("{}({})", dtype, n))
        .collect();
    out.push_str(&format!("dtypes: {}\n", tally.join(", ")));
    out
}

/// Per-column count of missing cells.
pub fn format_null_counts(df: &DataFrame) -> String {
    let counts = DataProcessor::null_counts(df);
    let width = counts.iter().map(|(n, _)| n.len()).max().unwrap_or(0);

    let mut out = String::from("Missing values:\n");
    for (name, count) in counts {
        out.push_str(&format!("{:<width$}  {}\n", name, count, width = width));
    }
    out
}
