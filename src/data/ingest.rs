//! File Ingestion Module
//! Parses uploaded CSV/Excel bytes into Polars DataFrames.

use std::io::Cursor;

use calamine::{Data, DataType as CellData, Reader, Xlsx};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },
    #[error("Failed to parse file: {0}")]
    Parse(#[from] PolarsError),
    #[error("Failed to read workbook: {0}")]
    Excel(#[from] calamine::XlsxError),
    #[error("Workbook has no worksheets")]
    EmptyWorkbook,
}

/// Lower-cased extension of a file name, including the dot (".csv").
/// Empty string when the name has no extension.
pub fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) => name[idx..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Parses one file format into a DataFrame.
pub trait TableParser {
    /// Extensions this parser claims, lower-cased with the dot.
    fn extensions(&self) -> &'static [&'static str];
    fn parse(&self, bytes: &[u8]) -> Result<DataFrame, IngestError>;
}

/// Dispatches uploaded bytes to a parser by file extension.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn TableParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_default_parsers()
    }
}

impl ParserRegistry {
    /// Registry with the built-in CSV and Excel parsers.
    pub fn with_default_parsers() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser), Box::new(ExcelParser)],
        }
    }

    /// Add a parser for another format.
    #[allow(dead_code)]
    pub fn register(&mut self, parser: Box<dyn TableParser>) {
        self.parsers.push(parser);
    }

    /// Parse uploaded bytes, selecting the parser by the file name's
    /// extension (case-insensitive).
    pub fn parse(&self, file_name: &str, bytes: &[u8]) -> Result<DataFrame, IngestError> {
        let extension = file_extension(file_name);
        let parser = self
            .parsers
            .iter()
            .find(|p| p.extensions().contains(&extension.as_str()))
            .ok_or_else(|| IngestError::UnsupportedFormat {
                extension: extension.clone(),
            })?;
        parser.parse(bytes)
    }
}

/// Delimited-text parser backed by the Polars CSV reader.
pub struct CsvParser;

impl TableParser for CsvParser {
    fn extensions(&self) -> &'static [&'static str] {
        &[".csv"]
    }

    fn parse(&self, bytes: &[u8]) -> Result<DataFrame, IngestError> {
        let df = CsvReadOptions::default()
            .with_infer_schema_length(Some(10_000))
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;
        Ok(df)
    }
}

/// Inferred type for an Excel column.
#[derive(Clone, Copy)]
enum ExcelColType {
    Int64,
    Float64,
    Boolean,
    Utf8,
}

/// Workbook parser backed by calamine. Reads the first worksheet, first
/// row as headers, and infers one type per column from the cells below.
pub struct ExcelParser;

impl TableParser for ExcelParser {
    fn extensions(&self) -> &'static [&'static str] {
        &[".xlsx"]
    }

    fn parse(&self, bytes: &[u8]) -> Result<DataFrame, IngestError> {
        let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(IngestError::EmptyWorkbook)??;

        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        if rows.is_empty() {
            return Ok(DataFrame::empty());
        }

        let headers: Vec<String> = rows[0]
            .iter()
            .map(|c| CellData::as_string(c).unwrap_or_else(|| c.to_string()))
            .collect();

        let mut columns = Vec::with_capacity(headers.len());
        for (col_idx, header) in headers.iter().enumerate() {
            let cells: Vec<Option<&Data>> = rows[1..].iter().map(|row| row.get(col_idx)).collect();
            let name = if header.is_empty() {
                format!("column_{}", col_idx + 1)
            } else {
                header.clone()
            };
            let col_type = Self::infer_column_type(&cells);
            columns.push(Self::column_from_cells(&name, &cells, col_type));
        }

        Ok(DataFrame::new(columns)?)
    }
}

impl ExcelParser {
    /// Infers a column type from calamine cells. Any string cell forces
    /// Utf8; whole-number floats collapse to Int64 (spreadsheet numbers
    /// all arrive as floats).
    fn infer_column_type(cells: &[Option<&Data>]) -> ExcelColType {
        let mut has_float = false;
        let mut has_int = false;
        let mut has_bool = false;

        for cell in cells.iter().flatten() {
            if cell.is_empty() {
                continue;
            }
            if cell.is_string() {
                return ExcelColType::Utf8;
            }
            if cell.is_float() || cell.is_datetime() {
                has_float = true;
            }
            if cell.is_int() {
                has_int = true;
            }
            if cell.is_bool() {
                has_bool = true;
            }
        }

        if has_int && !has_float {
            ExcelColType::Int64
        } else if has_float {
            let all_whole = cells.iter().flatten().all(|cell| {
                cell.as_f64()
                    .is_none_or(|f| f.is_finite() && (f - f.trunc()).abs() < 1e-10)
            });
            if all_whole {
                ExcelColType::Int64
            } else {
                ExcelColType::Float64
            }
        } else if has_bool {
            ExcelColType::Boolean
        } else {
            ExcelColType::Utf8
        }
    }

    /// Build a Polars column from calamine cells using the inferred type.
    /// Empty and unreadable cells become nulls.
    fn column_from_cells(name: &str, cells: &[Option<&Data>], col_type: ExcelColType) -> Column {
        match col_type {
            ExcelColType::Int64 => {
                let v: Vec<Option<i64>> = cells
                    .iter()
                    .map(|c| c.and_then(|cell| cell.as_i64()))
                    .collect();
                Column::new(name.into(), v)
            }
            ExcelColType::Float64 => {
                let v: Vec<Option<f64>> = cells
                    .iter()
                    .map(|c| c.and_then(|cell| cell.as_f64()))
                    .collect();
                Column::new(name.into(), v)
            }
            ExcelColType::Boolean => {
                let v: Vec<Option<bool>> = cells
                    .iter()
                    .map(|c| c.and_then(|cell| cell.get_bool()))
                    .collect();
                Column::new(name.into(), v)
            }
            ExcelColType::Utf8 => {
                let v: Vec<Option<String>> = cells
                    .iter()
                    .map(|c| {
                        c.and_then(|cell| {
                            if cell.is_empty() {
                                None
                            } else {
                                cell.as_string()
                            }
                        })
                    })
                    .collect();
                Column::new(name.into(), v)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_parse_infers_shape_and_types() {
        let registry = ParserRegistry::with_default_parsers();
        let df = registry.parse("data.csv", b"a,b\n1,\n1,3\n").unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(df.column("a").unwrap().dtype().is_integer());
        assert_eq!(df.column("b").unwrap().null_count(), 1);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let registry = ParserRegistry::with_default_parsers();
        let df = registry.parse("DATA.CSV", b"x\n1\n").unwrap();
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn unknown_extension_is_rejected_by_name() {
        let registry = ParserRegistry::with_default_parsers();
        let err = registry.parse("notes.txt", b"a,b\n1,2\n").unwrap_err();
        match err {
            IngestError::UnsupportedFormat { extension } => assert_eq!(extension, ".txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_extension_handles_missing_dot() {
        assert_eq!(file_extension("report.XLSX"), ".xlsx");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
    }
}
