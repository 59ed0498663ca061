//! Quality Advisor Module
//! Read-only null/duplicate inspection behind the cleaning suggestions.

use polars::prelude::*;

/// Snapshot of a table's data quality. Stale as soon as the table is
/// mutated; callers recompute instead of caching across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityReport {
    pub has_nulls: bool,
    pub has_duplicates: bool,
}

impl QualityReport {
    /// Inspect a table without mutating it. The duplicate check is
    /// hash-based, O(rows * cols).
    pub fn inspect(df: &DataFrame) -> PolarsResult<Self> {
        let has_nulls = df.get_columns().iter().any(|c| c.null_count() > 0);
        let has_duplicates = if df.height() == 0 || df.width() == 0 {
            false
        } else {
            df.unique_stable(None, UniqueKeepStrategy::First, None)?
                .height()
                != df.height()
        };
        Ok(Self {
            has_nulls,
            has_duplicates,
        })
    }

    pub fn is_clean(&self) -> bool {
        !self.has_nulls && !self.has_duplicates
    }
}
