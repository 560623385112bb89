//! XLSX workbook writer.
//!
//! Writes a minimal SpreadsheetML package: one worksheet with a header row of
//! field paths and a single data row. Strings are stored inline so no shared
//! string table is needed.

use crate::target::SaveTarget;
use place_core::export::{truncate_utf16, MAX_CELL_LEN};
use place_core::{export_filename, CellValue, Column, Error, ExportRecord, Result, EXPORT_MIME_TYPE};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Sheet name used unless configured otherwise.
pub const DEFAULT_SHEET_NAME: &str = "Place Details";

/// Longest sheet name Excel accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel rejects in sheet names.
const SHEET_NAME_RESERVED: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

mod ns {
    pub const CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
    pub const RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    pub const DOC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const REL_OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const REL_WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
}

mod content_types {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const WORKBOOK: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
}

/// Package part paths.
pub mod parts {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const WORKBOOK: &str = "xl/workbook.xml";
    pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
    pub const SHEET: &str = "xl/worksheets/sheet1.xml";
}

/// An export ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Hand the artifact to a save target.
    ///
    /// Failures of the target surface as [`Error::ExportDelivery`].
    pub fn deliver<T: SaveTarget + ?Sized>(&self, target: &mut T) -> Result<()> {
        log::debug!(
            "Delivering {} ({} bytes) to save target",
            self.filename,
            self.bytes.len()
        );

        target
            .save(&self.filename, self.mime_type, &self.bytes)
            .map_err(|e| Error::ExportDelivery(format!("{}: {}", self.filename, e)))
    }
}

/// Writes export records as single-sheet XLSX workbooks.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    sheet_name: String,
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl XlsxExporter {
    /// Create an exporter writing to a sheet named "Place Details".
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom sheet name. Characters Excel rejects are replaced with
    /// `_`, the name is cut to 31 characters, and a blank name falls back to
    /// the default.
    pub fn with_sheet_name(mut self, name: &str) -> Self {
        self.sheet_name = sanitize_sheet_name(name);
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Serialize a record into XLSX bytes. The output depends only on the
    /// record and the sheet name.
    pub fn serialize(&self, record: &ExportRecord) -> Result<Vec<u8>> {
        let columns = record.columns();
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        write_part(&mut zip, parts::CONTENT_TYPES, &content_types_xml()?)?;
        write_part(&mut zip, parts::ROOT_RELS, &root_rels_xml()?)?;
        write_part(&mut zip, parts::WORKBOOK, &workbook_xml(&self.sheet_name)?)?;
        write_part(&mut zip, parts::WORKBOOK_RELS, &workbook_rels_xml()?)?;
        write_part(&mut zip, parts::SHEET, &sheet_xml(&columns)?)?;

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        let bytes = cursor.into_inner();

        log::debug!(
            "Wrote workbook with {} columns ({} bytes)",
            columns.len(),
            bytes.len()
        );

        Ok(bytes)
    }

    /// Serialize a record and pick its filename from the place name.
    pub fn export(&self, record: &ExportRecord) -> Result<ExportArtifact> {
        Ok(ExportArtifact {
            filename: export_filename(record.basic_info.name.as_deref()),
            mime_type: EXPORT_MIME_TYPE,
            bytes: self.serialize(record)?,
        })
    }

    /// Serialize a record and deliver it to `target` in one go.
    pub fn export_to<T: SaveTarget + ?Sized>(
        &self,
        record: &ExportRecord,
        target: &mut T,
    ) -> Result<()> {
        self.export(record)?.deliver(target)
    }
}

/// Make a name acceptable as an Excel sheet name.
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|&c| is_xml_char(c) && !c.is_control())
        .map(|c| {
            if SHEET_NAME_RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    if cleaned.trim().is_empty() {
        DEFAULT_SHEET_NAME.to_string()
    } else {
        cleaned
    }
}

/// Spreadsheet column letters for a zero-based index: 0 is `A`, 26 is `AA`.
fn column_letters(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Whether XML 1.0 allows `c` in character data (the `Char` production).
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

/// Strip characters XML 1.0 cannot carry and cut to the cell size limit,
/// counted in UTF-16 units.
fn cell_text(text: &str) -> Cow<'_, str> {
    let fits = |t: &str| t.len() <= MAX_CELL_LEN || t.encode_utf16().count() <= MAX_CELL_LEN;

    if text.chars().all(is_xml_char) && fits(text) {
        return Cow::Borrowed(text);
    }

    let cleaned: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    if !fits(&cleaned) {
        log::warn!(
            "Truncating cell text from {} to {} UTF-16 units",
            cleaned.encode_utf16().count(),
            MAX_CELL_LEN
        );
        return Cow::Owned(truncate_utf16(&cleaned, MAX_CELL_LEN));
    }

    Cow::Owned(cleaned)
}

fn write_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    content: &[u8],
) -> Result<()> {
    // Fixed timestamp so identical records give identical bytes.
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    zip.start_file(path, options)
        .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", path, e)))?;
    zip.write_all(content)
        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", path, e)))?;

    Ok(())
}

/// Thin wrapper over the quick-xml writer mapping errors into ours.
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self> {
        let mut part = Self {
            writer: Writer::new(Vec::new()),
        };
        part.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(part)
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(elem))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(elem))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn content_types_xml() -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start("Types", &[("xmlns", ns::CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", content_types::RELATIONSHIPS)],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", content_types::XML)])?;
    xml.empty(
        "Override",
        &[("PartName", "/xl/workbook.xml"), ("ContentType", content_types::WORKBOOK)],
    )?;
    xml.empty(
        "Override",
        &[
            ("PartName", "/xl/worksheets/sheet1.xml"),
            ("ContentType", content_types::WORKSHEET),
        ],
    )?;
    xml.end("Types")?;
    Ok(xml.finish())
}

fn root_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start("Relationships", &[("xmlns", ns::RELATIONSHIPS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", ns::REL_OFFICE_DOCUMENT),
            ("Target", parts::WORKBOOK),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "workbook",
        &[("xmlns", ns::SPREADSHEET), ("xmlns:r", ns::DOC_RELATIONSHIPS)],
    )?;
    xml.start("sheets", &[])?;
    xml.empty(
        "sheet",
        &[("name", sheet_name), ("sheetId", "1"), ("r:id", "rId1")],
    )?;
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.finish())
}

fn workbook_rels_xml() -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start("Relationships", &[("xmlns", ns::RELATIONSHIPS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", ns::REL_WORKSHEET),
            ("Target", "worksheets/sheet1.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn sheet_xml(columns: &[Column]) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start("worksheet", &[("xmlns", ns::SPREADSHEET)])?;
    xml.start("sheetData", &[])?;

    xml.start("row", &[("r", "1")])?;
    for (idx, column) in columns.iter().enumerate() {
        let reference = format!("{}1", column_letters(idx));
        write_string_cell(&mut xml, &reference, &column.path)?;
    }
    xml.end("row")?;

    xml.start("row", &[("r", "2")])?;
    for (idx, column) in columns.iter().enumerate() {
        let reference = format!("{}2", column_letters(idx));
        match &column.value {
            CellValue::Empty => {}
            CellValue::Text(text) => write_string_cell(&mut xml, &reference, text)?,
            CellValue::Number(n) => {
                xml.start("c", &[("r", reference.as_str())])?;
                write_value(&mut xml, &n.to_string())?;
                xml.end("c")?;
            }
            CellValue::Bool(b) => {
                xml.start("c", &[("r", reference.as_str()), ("t", "b")])?;
                write_value(&mut xml, if *b { "1" } else { "0" })?;
                xml.end("c")?;
            }
        }
    }
    xml.end("row")?;

    xml.end("sheetData")?;
    xml.end("worksheet")?;
    Ok(xml.finish())
}

fn write_string_cell(xml: &mut XmlPart, reference: &str, text: &str) -> Result<()> {
    xml.start("c", &[("r", reference), ("t", "inlineStr")])?;
    xml.start("is", &[])?;
    xml.start("t", &[("xml:space", "preserve")])?;
    xml.text(&cell_text(text))?;
    xml.end("t")?;
    xml.end("is")?;
    xml.end("c")
}

fn write_value(xml: &mut XmlPart, value: &str) -> Result<()> {
    xml.start("v", &[])?;
    xml.text(value)?;
    xml.end("v")
}
