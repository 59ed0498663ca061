//! Format Conversion Module
//! Serializes the current table to CSV or Excel bytes for download.

mod xlsx;

use polars::prelude::*;
use thiserror::Error;

use crate::data::UploadedFile;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Workbook packaging failed: {0}")]
    Zip(#[from] ::zip::result::ZipError),
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Target format selected in the conversion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Excel,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => ".csv",
            OutputFormat::Excel => ".xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "CSV",
            OutputFormat::Excel => "Excel",
        }
    }
}

/// Serialized output: bytes plus the filename and MIME type to offer
/// for download. Lives only as long as the request that produced it.
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

pub struct Converter;

impl Converter {
    /// Serialize the table in the requested format. The output filename
    /// is the source name with the extension swapped.
    pub fn convert(
        df: &DataFrame,
        source: &UploadedFile,
        format: OutputFormat,
    ) -> Result<ConversionResult, ConvertError> {
        let bytes = match format {
            OutputFormat::Csv => Self::write_csv(df)?,
            OutputFormat::Excel => xlsx::write_workbook(df)?,
        };
        Ok(ConversionResult {
            bytes,
            file_name: source.name_with_extension(format.extension()),
            mime_type: format.mime_type(),
        })
    }

    /// Comma-separated output with a header row and no row-index column.
    fn write_csv(df: &DataFrame) -> Result<Vec<u8>, ConvertError> {
        let mut buffer = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(&mut df.clone())?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::compare::{compare, TableDiff};
    use crate::data::ingest::ParserRegistry;

    fn sample() -> DataFrame {
        df!(
            "name" => [Some("ada"), Some("grace"), None],
            "age" => [Some(36i64), None, Some(45)],
            "score" => [Some(0.5f64), Some(2.5), None]
        )
        .unwrap()
    }

    fn source(name: &str) -> UploadedFile {
        UploadedFile::new(name, Vec::new())
    }

    #[test]
    fn csv_result_carries_filename_and_mime_type() {
        let result =
            Converter::convert(&sample(), &source("people.xlsx"), OutputFormat::Csv).unwrap();
        assert_eq!(result.file_name, "people.csv");
        assert_eq!(result.mime_type, "text/csv");
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn excel_result_carries_filename_and_mime_type() {
        let result =
            Converter::convert(&sample(), &source("people.csv"), OutputFormat::Excel).unwrap();
        assert_eq!(result.file_name, "people.xlsx");
        assert_eq!(
            result.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn csv_round_trip_preserves_the_table() {
        let df = sample();
        let result = Converter::convert(&df, &source("t.csv"), OutputFormat::Csv).unwrap();

        let registry = ParserRegistry::with_default_parsers();
        let reparsed = registry.parse(&result.file_name, &result.bytes).unwrap();
        assert_eq!(compare(&df, &reparsed), TableDiff::Equal);
    }

    #[test]
    fn excel_round_trip_preserves_the_table() {
        let df = sample();
        let result = Converter::convert(&df, &source("t.csv"), OutputFormat::Excel).unwrap();

        let registry = ParserRegistry::with_default_parsers();
        let reparsed = registry.parse(&result.file_name, &result.bytes).unwrap();
        assert_eq!(compare(&df, &reparsed), TableDiff::Equal);
    }

    #[test]
    fn excel_to_csv_preserves_headers_and_values() {
        let df = df!(
            "name" => ["ada", "grace"],
            "age" => [36i64, 45]
        )
        .unwrap();

        let registry = ParserRegistry::with_default_parsers();
        let as_excel = Converter::convert(&df, &source("t.csv"), OutputFormat::Excel).unwrap();
        let from_excel = registry.parse(&as_excel.file_name, &as_excel.bytes).unwrap();

        let as_csv =
            Converter::convert(&from_excel, &source("t.xlsx"), OutputFormat::Csv).unwrap();
        let from_csv = registry.parse(&as_csv.file_name, &as_csv.bytes).unwrap();

        assert_eq!(compare(&df, &from_csv), TableDiff::Equal);
    }

    #[test]
    fn csv_output_has_header_and_no_index_column() {
        let df = df!("a" => [1i64], "b" => ["x"]).unwrap();
        let result = Converter::convert(&df, &source("t.csv"), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(result.bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("a,b"));
        assert_eq!(lines.next(), Some("1,x"));
    }
}
