//! Uploaded file metadata and payload.

use chrono::{DateTime, Local};

use crate::data::ingest::file_extension;

/// A file received from the user. Immutable once constructed; parsing
/// produces an independent table, so later table mutations never write
/// back into these bytes.
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub uploaded_at: DateTime<Local>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            uploaded_at: Local::now(),
        }
    }

    /// File size in kilobytes, as shown in the metadata header.
    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }

    /// Lower-cased extension including the dot (".csv").
    pub fn extension(&self) -> String {
        file_extension(&self.name)
    }

    /// The file name with its extension replaced, used to label
    /// conversion output.
    pub fn name_with_extension(&self, new_extension: &str) -> String {
        let current = self.extension();
        if current.is_empty() {
            format!("{}{}", self.name, new_extension)
        } else {
            format!(
                "{}{}",
                &self.name[..self.name.len() - current.len()],
                new_extension
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_the_final_extension() {
        let file = UploadedFile::new("sales.report.xlsx", vec![0u8; 10]);
        assert_eq!(file.name_with_extension(".csv"), "sales.report.csv");
        assert_eq!(file.extension(), ".xlsx");
    }

    #[test]
    fn appends_when_there_is_no_extension() {
        let file = UploadedFile::new("export", Vec::new());
        assert_eq!(file.name_with_extension(".csv"), "export.csv");
    }

    #[test]
    fn size_is_reported_in_kilobytes() {
        let file = UploadedFile::new("a.csv", vec![0u8; 2048]);
        assert!((file.size_kb() - 2.0).abs() < f64::EPSILON);
    }
}
