//! Data Cleaner Module
//! User-triggered cleaning operations: duplicate removal and mean fill.

use polars::prelude::*;
use thiserror::Error;

use crate::data::is_numeric_dtype;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Handles the two cleaning operations. Both return a new DataFrame the
/// caller swaps in for the session table.
pub struct DataCleaner;

impl DataCleaner {
    /// Drop every row that duplicates an earlier row, keeping the first
    /// occurrence and the relative order of kept rows. Idempotent.
    pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame, CleanError> {
        Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
    }

    /// Replace nulls in numeric columns with that column's mean.
    ///
    /// Means are computed from the values present before any replacement
    /// in this pass. Columns with no non-null value keep their nulls,
    /// and non-numeric columns are untouched.
    pub fn fill_missing_numeric(df: &DataFrame) -> Result<DataFrame, CleanError> {
        let mut exprs = Vec::new();
        for column in df.get_columns() {
            if !is_numeric_dtype(column.dtype()) || column.null_count() == 0 {
                continue;
            }
            let Some(mean) = column.as_materialized_series().mean() else {
                continue;
            };
            exprs.push(col(column.name().as_str()).fill_null(lit(mean)));
        }

        if exprs.is_empty() {
            return Ok(df.clone());
        }
        Ok(df.clone().lazy().with_columns(exprs).collect()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ingest::ParserRegistry;
    use crate::data::QualityReport;

    #[test]
    fn remove_duplicates_keeps_first_occurrence_in_order() {
        let df = df!(
            "a" => [1i64, 2, 1, 3],
            "b" => ["x", "y", "x", "z"]
        )
        .unwrap();
        let cleaned = DataCleaner::remove_duplicates(&df).unwrap();
        let expected = df!(
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"]
        )
        .unwrap();
        assert!(cleaned.equals_missing(&expected));
    }

    #[test]
    fn remove_duplicates_is_idempotent() {
        let df = df!("a" => [1i64, 1, 2], "b" => [5i64, 5, 6]).unwrap();
        let once = DataCleaner::remove_duplicates(&df).unwrap();
        let twice = DataCleaner::remove_duplicates(&once).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn fill_uses_mean_of_non_null_values() {
        let df = df!(
            "v" => [Some(1.0f64), None, Some(3.0)],
            "label" => [Some("a"), None, Some("c")]
        )
        .unwrap();
        let filled = DataCleaner::fill_missing_numeric(&df).unwrap();

        let v = filled.column("v").unwrap().f64().unwrap();
        assert_eq!(v.get(1), Some(2.0));
        // Text columns keep their nulls.
        assert_eq!(filled.column("label").unwrap().null_count(), 1);
    }

    #[test]
    fn fill_leaves_all_null_numeric_columns_untouched() {
        let df = df!(
            "empty" => [None::<f64>, None],
            "v" => [Some(1.0f64), None]
        )
        .unwrap();
        let filled = DataCleaner::fill_missing_numeric(&df).unwrap();
        assert_eq!(filled.column("empty").unwrap().null_count(), 2);
        assert_eq!(filled.column("v").unwrap().null_count(), 0);
    }

    #[test]
    fn fill_is_idempotent_once_no_nulls_remain() {
        let df = df!("v" => [Some(2.0f64), None, Some(4.0)]).unwrap();
        let once = DataCleaner::fill_missing_numeric(&df).unwrap();
        let twice = DataCleaner::fill_missing_numeric(&once).unwrap();
        assert!(once.equals_missing(&twice));
    }

    // Rows (1,null),(1,3): filling the null with the mean of {3} makes
    // the rows identical; deduplication then keeps a single (1,3) row.
    #[test]
    fn fill_then_dedup_collapses_near_duplicate_rows() {
        let registry = ParserRegistry::with_default_parsers();
        let df = registry.parse("example.csv", b"a,b\n1,\n1,3\n").unwrap();

        let report = QualityReport::inspect(&df).unwrap();
        assert!(report.has_nulls);
        assert!(!report.has_duplicates);

        let filled = DataCleaner::fill_missing_numeric(&df).unwrap();
        let report = QualityReport::inspect(&filled).unwrap();
        assert!(!report.has_nulls);
        assert!(report.has_duplicates);
        let b = filled.column("b").unwrap().f64().unwrap();
        assert_eq!(b.get(0), Some(3.0));

        let deduped = DataCleaner::remove_duplicates(&filled).unwrap();
        assert_eq!(deduped.height(), 1);
    }
}
