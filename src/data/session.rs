//! Per-file session state.
//! Each uploaded file gets one session object owning its bytes and the
//! current working table; every operation receives the session
//! explicitly instead of sharing module-level state.

use polars::prelude::*;

use crate::convert::OutputFormat;
use crate::data::{QualityReport, UploadedFile};

pub struct FileSession {
    pub file: UploadedFile,
    pub table: DataFrame,
    pub quality: QualityReport,
    /// Checkbox state aligned with the table's columns.
    pub selected_columns: Vec<bool>,
    pub show_chart: bool,
    pub output_format: OutputFormat,
    /// Index of another session chosen for comparison.
    pub compare_with: Option<usize>,
    pub status: String,
}

impl FileSession {
    pub fn new(file: UploadedFile, table: DataFrame) -> PolarsResult<Self> {
        let quality = QualityReport::inspect(&table)?;
        let width = table.width();
        Ok(Self {
            file,
            table,
            quality,
            selected_columns: vec![true; width],
            show_chart: false,
            output_format: OutputFormat::Csv,
            compare_with: None,
            status: String::new(),
        })
    }

    /// Swap in a mutated table and refresh everything derived from it.
    /// The quality report is recomputed, never carried across mutations.
    pub fn set_table(&mut self, table: DataFrame) -> PolarsResult<()> {
        self.selected_columns = vec![true; table.width()];
        self.quality = QualityReport::inspect(&table)?;
        self.table = table;
        Ok(())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.table
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Column names whose checkbox is ticked, in table order.
    pub fn selected_column_names(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .zip(self.selected_columns.iter())
            .filter(|(_, &selected)| selected)
            .map(|(name, _)| name)
            .collect()
    }

    /// The first `rows` rows rendered as display strings for the
    /// preview grid. Nulls render as empty cells.
    pub fn preview(&self, rows: usize) -> (Vec<String>, Vec<Vec<String>>) {
        let head = self.table.head(Some(rows));
        let headers: Vec<String> = head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut grid = Vec::with_capacity(head.height());
        for i in 0..head.height() {
            let mut row = Vec::with_capacity(head.width());
            for column in head.get_columns() {
                let cell = column
                    .get(i)
                    .map(|v| {
                        if v.is_null() {
                            String::new()
                        } else {
                            v.to_string().trim_matches('"').to_string()
                        }
                    })
                    .unwrap_or_default();
                row.push(cell);
            }
            grid.push(row);
        }
        (headers, grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> FileSession {
        let file = UploadedFile::new("t.csv", b"a,b\n1,x\n2,y\n3,z\n".to_vec());
        let table = df!(
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"]
        )
        .unwrap();
        FileSession::new(file, table).unwrap()
    }

    #[test]
    fn selection_defaults_to_all_columns() {
        let session = session();
        assert_eq!(session.selected_column_names(), vec!["a", "b"]);
    }

    #[test]
    fn set_table_refreshes_selection_and_quality() {
        let mut session = session();
        session.selected_columns[1] = false;

        let replacement = df!("only" => [Some(1i64), None]).unwrap();
        session.set_table(replacement).unwrap();

        assert_eq!(session.selected_column_names(), vec!["only"]);
        assert!(session.quality.has_nulls);
    }

    #[test]
    fn preview_caps_rows_and_renders_nulls_empty() {
        let file = UploadedFile::new("t.csv", Vec::new());
        let table = df!("a" => [Some(1i64), None, Some(3), Some(4), Some(5), Some(6)]).unwrap();
        let session = FileSession::new(file, table).unwrap();

        let (headers, grid) = session.preview(5);
        assert_eq!(headers, vec!["a"]);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0], "1");
        assert_eq!(grid[1][0], "");
    }
}
