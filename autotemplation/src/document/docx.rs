//! Office Open XML word-processing documents (`.docx`).
//!
//! Only `word/document.xml` is read or rewritten; every other package part
//! is copied through byte-for-byte.
//!
//! Reading follows the usual paragraph/table view: body-level `w:p`
//! elements are paragraphs (text = concatenated `w:t` runs), body-level
//! `w:tbl` elements are tables, and a cell's text is its direct paragraphs
//! joined with `\n`. Nested tables do not contribute to their parent cell.
//!
//! Rendering works per paragraph, anywhere in the body. Word splits text
//! into runs at arbitrary points, so a placeholder may span several `w:t`
//! elements. When a paragraph's rendered text differs from its source, the
//! whole rendered text goes into its first run and the remaining runs are
//! emptied. Run formatting beyond the first run is not preserved.

use std::io::{Cursor, Read, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{DocumentModel, Table};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::template::render;

/// Package part holding the main document body.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// MIME type of a `.docx` package.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const W_BODY: &[u8] = b"w:body";
const W_P: &[u8] = b"w:p";
const W_T: &[u8] = b"w:t";
const W_TBL: &[u8] = b"w:tbl";
const W_TR: &[u8] = b"w:tr";
const W_TC: &[u8] = b"w:tc";

/// A `.docx` template held in memory.
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    name: String,
    package: Vec<u8>,
    body: String,
}

impl DocxTemplate {
    /// Open a package. `name` is the document's display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a zip archive or the archive has
    /// no `word/document.xml` part.
    pub fn from_bytes(name: impl Into<String>, package: Vec<u8>) -> Result<Self> {
        let body = {
            let mut archive = ZipArchive::new(Cursor::new(package.as_slice()))?;
            let mut part = match archive.by_name(DOCUMENT_PART) {
                Ok(part) => part,
                Err(zip::result::ZipError::FileNotFound) => {
                    return Err(Error::document(format!("missing {DOCUMENT_PART} part")));
                }
                Err(err) => return Err(err.into()),
            };
            let mut body = String::new();
            part.read_to_string(&mut body)?;
            body
        };
        Ok(Self {
            name: name.into(),
            package,
            body,
        })
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw package bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.package
    }

    /// Extract the paragraph/table text view.
    ///
    /// # Errors
    ///
    /// Returns an error if the document XML is malformed.
    pub fn model(&self) -> Result<DocumentModel> {
        let mut reader = Reader::from_str(&self.body);
        let mut model = ModelBuilder::default();
        loop {
            match reader.read_event()? {
                Event::Eof => break,
                Event::Start(e) => model.start(e.name().as_ref()),
                Event::End(e) => model.end(e.name().as_ref()),
                Event::Empty(e) => {
                    let name = e.name();
                    model.start(name.as_ref());
                    model.end(name.as_ref());
                }
                Event::Text(t) => model.text(&t.unescape()?),
                _ => {}
            }
        }
        Ok(model.finish(&self.name))
    }

    /// Render every paragraph against `context` and return the new package.
    ///
    /// Placeholders without a context value are left in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the document XML is malformed or the package
    /// cannot be rewritten.
    pub fn render(&self, context: &Context) -> Result<Vec<u8>> {
        let body = render_body(&self.body, context)?;
        repackage(&self.package, &body)
    }
}

/// Build a minimal `.docx` package from a text model.
///
/// Paragraphs are written first, then tables. Cell text containing `\n` is
/// split into one paragraph per line.
///
/// # Errors
///
/// Returns an error if the package cannot be written.
pub fn write_model(model: &DocumentModel) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("w:document").with_attributes([("xmlns:w", WORDPROCESSING_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for paragraph in &model.paragraphs {
        write_paragraph(&mut writer, paragraph)?;
    }
    for table in &model.tables {
        writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;
        for row in table {
            writer.write_event(Event::Start(BytesStart::new("w:tr")))?;
            for cell in row {
                writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
                for line in cell.split('\n') {
                    write_paragraph(&mut writer, line)?;
                }
                writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
            }
            writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    let document = writer.into_inner().into_inner();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes()),
        (DOCUMENT_PART, document.as_slice()),
    ] {
        zip.start_file(name, options)?;
        zip.write_all(bytes)?;
    }
    Ok(zip.finish()?.into_inner())
}

fn write_paragraph<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    if !text.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;
        writer.write_event(Event::Start(preserved_text_start()))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn preserved_text_start() -> BytesStart<'static> {
    BytesStart::new("w:t").with_attributes([("xml:space", "preserve")])
}

/// Accumulates the text view while walking the XML event stream.
#[derive(Debug, Default)]
struct ModelBuilder {
    elements: Vec<Vec<u8>>,
    open_paragraphs: Vec<String>,
    paragraphs: Vec<String>,
    tables: Vec<Table>,
    table_depth: usize,
    body_table: bool,
    rows: Table,
    row: Vec<String>,
    cell: Vec<String>,
}

impl ModelBuilder {
    fn start(&mut self, name: &[u8]) {
        match name {
            W_P => self.open_paragraphs.push(String::new()),
            W_TBL => {
                if self.table_depth == 0 {
                    self.body_table = self.parent() == Some(W_BODY);
                    self.rows.clear();
                }
                self.table_depth += 1;
            }
            W_TR if self.table_depth == 1 => self.row.clear(),
            W_TC if self.table_depth == 1 => self.cell.clear(),
            _ => {}
        }
        self.elements.push(name.to_vec());
    }

    fn end(&mut self, name: &[u8]) {
        self.elements.pop();
        match name {
            W_P => {
                let text = self.open_paragraphs.pop().unwrap_or_default();
                match self.parent() {
                    Some(W_BODY) => self.paragraphs.push(text),
                    Some(W_TC) if self.table_depth == 1 => self.cell.push(text),
                    _ => {}
                }
            }
            W_TBL => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 && self.body_table {
                    self.tables.push(std::mem::take(&mut self.rows));
                }
            }
            W_TR if self.table_depth == 1 => self.rows.push(std::mem::take(&mut self.row)),
            W_TC if self.table_depth == 1 => {
                let text = std::mem::take(&mut self.cell).join("\n");
                self.row.push(text);
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.parent() == Some(W_T)
            && let Some(paragraph) = self.open_paragraphs.last_mut()
        {
            paragraph.push_str(text);
        }
    }

    fn parent(&self) -> Option<&[u8]> {
        self.elements.last().map(Vec::as_slice)
    }

    fn finish(self, title: &str) -> DocumentModel {
        DocumentModel {
            title: title.to_string(),
            paragraphs: self.paragraphs,
            tables: self.tables,
        }
    }
}

/// Location of one text run inside the buffered event list.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    text: usize,
}

fn render_body(body: &str, context: &Context) -> Result<String> {
    let mut reader = Reader::from_str(body);
    let mut events: Vec<Event<'static>> = Vec::new();
    let mut paragraphs: Vec<Vec<Run>> = Vec::new();
    let mut text_start: Option<usize> = None;
    let mut rewritten = 0_usize;

    loop {
        let event = reader.read_event()?.into_owned();
        let index = events.len();
        match &event {
            Event::Eof => break,
            Event::Start(e) if e.name().as_ref() == W_P => paragraphs.push(Vec::new()),
            Event::Start(e) if e.name().as_ref() == W_T => text_start = Some(index),
            Event::End(e) if e.name().as_ref() == W_T => text_start = None,
            Event::Text(_) => {
                if let (Some(start), Some(runs)) = (text_start, paragraphs.last_mut()) {
                    runs.push(Run { start, text: index });
                }
            }
            Event::End(e) if e.name().as_ref() == W_P => {
                if let Some(runs) = paragraphs.pop()
                    && rewrite_paragraph(&mut events, &runs, context)?
                {
                    rewritten += 1;
                }
            }
            _ => {}
        }
        events.push(event);
    }
    debug!(paragraphs = rewritten, "rendered document paragraphs");

    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for event in events {
        writer.write_event(event)?;
    }
    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| Error::document(format!("rendered XML is not UTF-8: {e}")))
}

/// Returns `true` if the paragraph text changed.
fn rewrite_paragraph(
    events: &mut [Event<'static>],
    runs: &[Run],
    context: &Context,
) -> Result<bool> {
    let mut source = String::new();
    for run in runs {
        if let Event::Text(t) = &events[run.text] {
            source.push_str(&t.unescape()?);
        }
    }
    let rendered = render(&source, context);
    if rendered == source.as_str() {
        return Ok(false);
    }

    let Some((first, rest)) = runs.split_first() else {
        return Ok(false);
    };
    events[first.start] = Event::Start(preserved_text_start());
    events[first.text] = Event::Text(BytesText::new(&rendered).into_owned());
    for run in rest {
        events[run.text] = Event::Text(BytesText::new(""));
    }
    Ok(true)
}

fn repackage(package: &[u8], body: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        if file.name() == DOCUMENT_PART {
            drop(file);
            zip.start_file(DOCUMENT_PART, options)?;
            zip.write_all(body.as_bytes())?;
        } else {
            zip.raw_copy_file(file)?;
        }
    }
    Ok(zip.finish()?.into_inner())
}
