//! Table Comparator Module
//! Structural and value equality between two parsed tables.

use polars::prelude::*;

/// Outcome of comparing two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDiff {
    Equal,
    Different,
}

/// Compare two tables: equal iff column names match in order, row counts
/// match, and every cell is value-equal under its parsed type (null ==
/// null, but a numeric 1 never equals the text "1"). Symmetric and
/// reflexive.
pub fn compare(left: &DataFrame, right: &DataFrame) -> TableDiff {
    if left.equals_missing(right) {
        TableDiff::Equal
    } else {
        TableDiff::Different
    }
}
