//! Data module - ingestion, quality checks, cleaning, projection and
//! comparison of in-memory tables.

pub mod cleaner;
pub mod compare;
pub mod file;
pub mod ingest;
pub mod projector;
pub mod quality;
pub mod session;

pub use cleaner::DataCleaner;
pub use compare::{compare, TableDiff};
pub use file::UploadedFile;
pub use ingest::ParserRegistry;
pub use quality::QualityReport;
pub use session::FileSession;

use polars::prelude::*;

/// True for the dtypes treated as numeric throughout the app (mean
/// fill, chart column selection).
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Names of the numeric columns, in table order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_columns_preserve_table_order() {
        let df = df!(
            "name" => ["a", "b"],
            "age" => [30i64, 40],
            "score" => [0.5f64, 0.9]
        )
        .unwrap();
        assert_eq!(numeric_columns(&df), vec!["age", "score"]);
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(is_numeric_dtype(&DataType::UInt16));
    }
}
