//! Excel Workbook Writer
//! Builds a minimal single-sheet .xlsx package with direct ZIP/XML
//! generation: content types, relationships, document properties,
//! workbook and one worksheet.
//!
//! Strings are written as inline strings, numbers as plain values and
//! booleans as `t="b"` cells; null cells are omitted entirely.

use std::io::{Cursor, Write};

use polars::prelude::*;
use ::zip::write::FileOptions;
use ::zip::ZipWriter;

use super::ConvertError;
use crate::data::is_numeric_dtype;

/// Typed view over one column, prepared once before the row loop.
enum SheetColumn {
    Number(Float64Chunked),
    Boolean(BooleanChunked),
    Text(StringChunked),
}

/// Serialize the table into an in-memory .xlsx workbook: header row
/// first, then data rows in column order, no row-index column.
pub fn write_workbook(df: &DataFrame) -> Result<Vec<u8>, ConvertError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("docProps/core.xml", options)?;
    zip.write_all(CORE_PROPS_XML.as_bytes())?;

    zip.start_file("docProps/app.xml", options)?;
    zip.write_all(APP_PROPS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(WORKBOOK_XML.as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(worksheet_xml(df)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn worksheet_xml(df: &DataFrame) -> Result<String, ConvertError> {
    let mut sheet_columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let prepared = if is_numeric_dtype(column.dtype()) {
            SheetColumn::Number(column.cast(&DataType::Float64)?.f64()?.clone())
        } else if column.dtype() == &DataType::Boolean {
            SheetColumn::Boolean(column.bool()?.clone())
        } else {
            SheetColumn::Text(column.cast(&DataType::String)?.str()?.clone())
        };
        sheet_columns.push(prepared);
    }

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
    );

    // Header row.
    xml.push_str(r#"<row r="1">"#);
    for (col_idx, name) in df.get_column_names().iter().enumerate() {
        xml.push_str(&format!(
            r#"<c r="{}1" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_letter(col_idx),
            xml_escape(name.as_str())
        ));
    }
    xml.push_str("</row>\n");

    // Data rows.
    for row_idx in 0..df.height() {
        let row_ref = row_idx + 2;
        xml.push_str(&format!(r#"<row r="{row_ref}">"#));
        for (col_idx, column) in sheet_columns.iter().enumerate() {
            let cell_ref = format!("{}{}", column_letter(col_idx), row_ref);
            match column {
                SheetColumn::Number(ca) => {
                    if let Some(value) = ca.get(row_idx) {
                        if value.is_finite() {
                            xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{value}</v></c>"#));
                        }
                    }
                }
                SheetColumn::Boolean(ca) => {
                    if let Some(value) = ca.get(row_idx) {
                        let flag = if value { 1 } else { 0 };
                        xml.push_str(&format!(
                            r#"<c r="{cell_ref}" t="b"><v>{flag}</v></c>"#
                        ));
                    }
                }
                SheetColumn::Text(ca) => {
                    if let Some(value) = ca.get(row_idx) {
                        xml.push_str(&format!(
                            r#"<c r="{cell_ref}" t="inlineStr"><is><t>{}</t></is></c>"#,
                            xml_escape(value)
                        ));
                    }
                }
            }
        }
        xml.push_str("</row>\n");
    }

    xml.push_str("</sheetData>\n</worksheet>");
    Ok(xml)
}

/// Spreadsheet column letters: 0 -> A, 25 -> Z, 26 -> AA.
fn column_letter(mut idx: usize) -> String {
    let mut letters = String::new();
    loop {
        letters.insert(0, (b'A' + (idx % 26) as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#;

const CORE_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:creator>TableMorph</dc:creator>
<cp:lastModifiedBy>TableMorph</cp:lastModifiedBy>
<cp:revision>1</cp:revision>
</cp:coreProperties>"#;

const APP_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
<Application>TableMorph</Application>
<DocSecurity>0</DocSecurity>
<ScaleCrop>false</ScaleCrop>
<LinksUpToDate>false</LinksUpToDate>
<SharedDoc>false</SharedDoc>
<HyperlinksChanged>false</HyperlinksChanged>
<AppVersion>1.0000</AppVersion>
</Properties>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_cover_multi_letter_references() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
    }

    #[test]
    fn worksheet_escapes_markup_in_text_cells() {
        let df = df!("h<1>" => ["a&b"]).unwrap();
        let xml = worksheet_xml(&df).unwrap();
        assert!(xml.contains("h&lt;1&gt;"));
        assert!(xml.contains("a&amp;b"));
        assert!(!xml.contains("a&b<"));
    }

    #[test]
    fn null_cells_are_omitted() {
        let df = df!("a" => [Some(1i64), None]).unwrap();
        let xml = worksheet_xml(&df).unwrap();
        assert!(xml.contains(r#"<c r="A2"><v>1</v></c>"#));
        assert!(xml.contains(r#"<row r="3"></row>"#));
    }

    #[test]
    fn workbook_is_a_zip_package() {
        let df = df!("a" => [1i64]).unwrap();
        let bytes = write_workbook(&df).unwrap();
        // Local file header magic of the first ZIP entry.
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }
}
