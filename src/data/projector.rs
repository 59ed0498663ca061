//! Column Projector Module
//! Restricts a table to a caller-ordered subset of its columns.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("No columns selected")]
    EmptySelection,
    #[error("Column '{name}' not found")]
    ColumnNotFound { name: String },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Return a table with exactly the named columns, in the order supplied
/// by the caller, rows unchanged. An empty selection is rejected rather
/// than producing a zero-column table.
pub fn select_columns(df: &DataFrame, columns: &[String]) -> Result<DataFrame, ProjectError> {
    if columns.is_empty() {
        return Err(ProjectError::EmptySelection);
    }
    for name in columns {
        if df.column(name).is_err() {
            return Err(ProjectError::ColumnNotFound { name: name.clone() });
        }
    }
    Ok(df.select(columns.iter().map(String::as_str))?)
}
