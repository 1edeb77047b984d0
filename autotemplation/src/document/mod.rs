//! Structured document text.
//!
//! A [`DocumentModel`] is the text view of a template: its display name, its
//! body paragraphs in order, and its tables as rows of cell text. The
//! [`docx`] module reads and writes the model for Office Open XML files.

pub mod docx;

use serde::Serialize;

use crate::context::Context;
use crate::template::{IdentifierSet, render, scan_into};

/// A table as rows of cell text.
pub type Table = Vec<Vec<String>>;

/// Text surfaces of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentModel {
    /// Display name; also the output name template.
    pub title: String,
    /// Body paragraphs, in document order.
    pub paragraphs: Vec<String>,
    /// Body tables, in document order.
    pub tables: Vec<Table>,
}

/// Outcome of extracting the single table of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableExtraction {
    /// The document has exactly one table.
    Single(Table),
    /// Zero or several tables; carries the count.
    NotApplicable {
        /// Number of tables found.
        tables: usize,
    },
}

impl TableExtraction {
    /// The extracted grid, if there was exactly one table.
    #[must_use]
    pub fn into_table(self) -> Option<Table> {
        match self {
            Self::Single(table) => Some(table),
            Self::NotApplicable { .. } => None,
        }
    }
}

impl DocumentModel {
    /// Create a model with a title and no content.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Append a paragraph.
    #[must_use]
    pub fn with_paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }

    /// Append a table.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Every placeholder identifier in the title, paragraphs and table cells.
    #[must_use]
    pub fn identifiers(&self) -> IdentifierSet {
        let mut found = IdentifierSet::new();
        scan_into(&self.title, &mut found);
        for paragraph in &self.paragraphs {
            scan_into(paragraph, &mut found);
        }
        for cell in self.tables.iter().flatten().flatten() {
            scan_into(cell, &mut found);
        }
        found
    }

    /// Substitute `context` into every text surface, title included.
    #[must_use]
    pub fn render(&self, context: &Context) -> Self {
        let text = |s: &String| render(s, context).into_owned();
        Self {
            title: text(&self.title),
            paragraphs: self.paragraphs.iter().map(text).collect(),
            tables: self
                .tables
                .iter()
                .map(|table| {
                    table
                        .iter()
                        .map(|row| row.iter().map(text).collect())
                        .collect()
                })
                .collect(),
        }
    }

    /// The text grid of the only table, or `NotApplicable`.
    #[must_use]
    pub fn extract_table(&self) -> TableExtraction {
        match self.tables.as_slice() {
            [table] => TableExtraction::Single(table.clone()),
            tables => TableExtraction::NotApplicable {
                tables: tables.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect()
    }

    fn sample() -> DocumentModel {
        DocumentModel::new("Report_{{ CLIENT }}_{{ DATE_FULL_NUM }}")
            .with_paragraph("Dear {{ CLIENT }},")
            .with_paragraph("Status: {{ status__acme }}")
            .with_table(table(&[
                &["Item", "Owner"],
                &["{{ ITEM }}", "{{ owner__acme }}"],
                &["{{ CLIENT }}", ""],
            ]))
    }

    #[test]
    fn test_identifiers_union_of_surfaces() {
        let doc = sample();
        let mut expected = IdentifierSet::new();
        for surface in [&doc.title, &doc.paragraphs[0], &doc.paragraphs[1]] {
            expected.extend(crate::template::scan(surface));
        }
        for cell in doc.tables.iter().flatten().flatten() {
            expected.extend(crate::template::scan(cell));
        }
        assert_eq!(doc.identifiers(), expected);
        assert_eq!(doc.identifiers().len(), 5);
    }

    #[test]
    fn test_identifiers_idempotent() {
        let doc = sample();
        assert_eq!(doc.identifiers(), doc.identifiers());
    }

    #[test]
    fn test_render_all_surfaces() {
        let mut ctx = Context::new();
        ctx.insert("CLIENT", "Acme");
        ctx.insert("ITEM", "Widget");

        let rendered = sample().render(&ctx);
        assert_eq!(rendered.title, "Report_Acme_{{ DATE_FULL_NUM }}");
        assert_eq!(rendered.paragraphs[0], "Dear Acme,");
        assert_eq!(rendered.paragraphs[1], "Status: {{ status__acme }}");
        assert_eq!(rendered.tables[0][1][0], "Widget");
        assert_eq!(rendered.tables[0][2][0], "Acme");
    }

    #[test]
    fn test_extract_single_table() {
        let doc = DocumentModel::new("t").with_table(table(&[
            &["a", "b"],
            &["c", "d"],
            &["e", "f"],
        ]));
        let grid = doc.extract_table().into_table().expect("one table");
        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|row| row.len() == 2));
        assert_eq!(doc.extract_table(), doc.extract_table());
    }

    #[test]
    fn test_extract_keeps_ragged_rows() {
        let doc = DocumentModel::new("t").with_table(table(&[&["a", "b", "c"], &["d"]]));
        let grid = doc.extract_table().into_table().expect("one table");
        assert_eq!(grid[1], vec!["d".to_string()]);
    }

    #[test]
    fn test_extract_not_applicable() {
        let none = DocumentModel::new("t").with_paragraph("no tables");
        assert_eq!(
            none.extract_table(),
            TableExtraction::NotApplicable { tables: 0 }
        );

        let two = DocumentModel::new("t")
            .with_table(table(&[&["a"]]))
            .with_table(table(&[&["b"]]));
        assert_eq!(
            two.extract_table(),
            TableExtraction::NotApplicable { tables: 2 }
        );
    }
}
