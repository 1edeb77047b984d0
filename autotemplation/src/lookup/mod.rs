//! Lookup-sheet resolution.
//!
//! A lookup identifier encodes a column label and a row label separated by a
//! double underscore: `status__acme_corp` reads column `status`, row
//! `acme corp`. The identifier is lowercased, every `_` becomes a space, and
//! the result must split on a double space into exactly two parts.
//!
//! Failures are not errors. An identifier that cannot be mapped to a cell
//! resolves to its own placeholder text (`{{ status__acme_corp }}`), so the
//! gap stays visible in the rendered document.

mod source;

use std::collections::HashMap;

use tracing::warn;

use crate::error::Result;
use crate::prompter::Prompter;
use crate::template::placeholder;

pub use source::{
    CsvLookupSource, FileLookupSource, InteractiveLookupSource, SpreadsheetLookupSource,
};

/// Something that can produce the lookup sheet.
///
/// Called at most once per render, and only when a lookup identifier is
/// present.
pub trait LookupSource {
    /// Load the sheet. `prompter` is the run's prompter, for sources that
    /// need to ask where the sheet is.
    ///
    /// # Errors
    ///
    /// Returns an error if the sheet cannot be located or read.
    fn load(&mut self, prompter: &mut dyn Prompter) -> Result<LabeledTable>;
}

impl<S: LookupSource + ?Sized> LookupSource for &mut S {
    fn load(&mut self, prompter: &mut dyn Prompter) -> Result<LabeledTable> {
        (**self).load(prompter)
    }
}

/// Why a lookup identifier could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupFailure {
    /// The transformed identifier did not split into exactly one
    /// column/row pair.
    #[error("`{0}` does not name exactly one column and one row")]
    MalformedKey(String),

    /// Column or row label is absent from the sheet headers.
    #[error("Lookup failed for Column: {column}, Row: {row}")]
    NotFound {
        /// Derived column label.
        column: String,
        /// Derived row label.
        row: String,
    },
}

/// Split a lookup identifier into its `(column, row)` labels.
///
/// Returns `None` unless the transformed identifier contains exactly one
/// double-space separator.
#[must_use]
pub fn parse_key(identifier: &str) -> Option<(String, String)> {
    let spaced = identifier.to_lowercase().replace('_', " ");
    let mut parts = spaced.split("  ");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(column), Some(row), None) => Some((column.to_string(), row.to_string())),
        _ => None,
    }
}

/// A grid of text cells with header indices.
///
/// Column labels come from row 0 and row labels from column 0. Both are
/// lowercased; empty labels are skipped and a repeated label maps to its
/// last occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledTable {
    rows: Vec<Vec<String>>,
    columns: HashMap<String, usize>,
    row_labels: HashMap<String, usize>,
}

impl LabeledTable {
    /// Build a table and its header indices.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let columns = rows
            .first()
            .map(|header| index_labels(header.iter().map(String::as_str)))
            .unwrap_or_default();
        let row_labels =
            index_labels(rows.iter().map(|row| row.first().map_or("", String::as_str)));
        Self {
            rows,
            columns,
            row_labels,
        }
    }

    /// The raw rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of a column label (case-insensitive).
    #[must_use]
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.get(&label.to_lowercase()).copied()
    }

    /// Index of a row label (case-insensitive).
    #[must_use]
    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.row_labels.get(&label.to_lowercase()).copied()
    }

    /// Cell text at `(row, column)`. Cells past the end of a short row are
    /// empty.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map_or("", String::as_str)
    }

    /// Resolve a lookup identifier to its cell text.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupFailure`] if the identifier is malformed or either
    /// label is unknown.
    pub fn try_resolve(&self, identifier: &str) -> std::result::Result<&str, LookupFailure> {
        let (column, row) = parse_key(identifier)
            .ok_or_else(|| LookupFailure::MalformedKey(identifier.to_string()))?;
        match (self.columns.get(&column), self.row_labels.get(&row)) {
            (Some(&c), Some(&r)) => Ok(self.cell(r, c)),
            _ => Err(LookupFailure::NotFound { column, row }),
        }
    }

    /// Resolve a lookup identifier, falling back to its placeholder text.
    ///
    /// An empty cell is a valid result.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> String {
        match self.try_resolve(identifier) {
            Ok(value) => value.to_string(),
            Err(failure) => {
                warn!(identifier, "ERROR: {failure}");
                placeholder(identifier)
            }
        }
    }
}

impl LookupSource for LabeledTable {
    fn load(&mut self, _prompter: &mut dyn Prompter) -> Result<LabeledTable> {
        Ok(self.clone())
    }
}

fn index_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> HashMap<String, usize> {
    labels
        .into_iter()
        .enumerate()
        .filter(|(_, label)| !label.is_empty())
        .map(|(i, label)| (label.to_lowercase(), i))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> LabeledTable {
        LabeledTable::new(
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    /// Column `Status` at index 1, row `Acme` at index 2.
    fn sample() -> LabeledTable {
        grid(&[
            &["", "Status", "Account Manager"],
            &["Globex", "Pending", "Hank Scorpio"],
            &["Acme", "Active", ""],
            &["Initech Corp", "Closed"],
        ])
    }

    mod keys {
        use super::*;

        #[test]
        fn splits_column_and_row() {
            assert_eq!(
                parse_key("status__acme"),
                Some(("status".into(), "acme".into()))
            );
            assert_eq!(
                parse_key("Account_Manager__Initech_Corp"),
                Some(("account manager".into(), "initech corp".into()))
            );
        }

        #[test]
        fn triple_underscore_keeps_leading_space_on_row() {
            assert_eq!(parse_key("a___b"), Some(("a".into(), " b".into())));
        }

        #[test]
        fn rejects_zero_or_many_separators() {
            assert_eq!(parse_key("nodouble"), None);
            assert_eq!(parse_key("single_under"), None);
            assert_eq!(parse_key("a____b"), None);
            assert_eq!(parse_key("a__b__c"), None);
        }
    }

    mod table {
        use super::*;

        #[test]
        fn header_indices_are_lowercased() {
            let t = sample();
            assert_eq!(t.column_index("STATUS"), Some(1));
            assert_eq!(t.row_index("acme"), Some(2));
            assert_eq!(t.column_index(""), None);
        }

        #[test]
        fn repeated_label_maps_to_last() {
            let t = grid(&[&["", "x", "x"], &["r", "1", "2"]]);
            assert_eq!(t.column_index("x"), Some(2));
        }

        #[test]
        fn empty_table() {
            let t = LabeledTable::new(Vec::new());
            assert_eq!(t.column_index("a"), None);
            assert!(t.try_resolve("a__b").is_err());
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn found() {
            assert_eq!(sample().resolve("status__acme"), "Active");
            assert_eq!(
                sample().resolve("account_manager__globex"),
                "Hank Scorpio"
            );
        }

        #[test]
        fn empty_cell_is_valid() {
            let t = sample();
            assert_eq!(t.try_resolve("account_manager__acme"), Ok(""));
            assert_eq!(t.try_resolve("account_manager__initech_corp"), Ok(""));
        }

        #[test]
        fn unknown_row_yields_placeholder() {
            let t = sample();
            assert_eq!(
                t.try_resolve("status__unknown_co"),
                Err(LookupFailure::NotFound {
                    column: "status".into(),
                    row: "unknown co".into(),
                })
            );
            assert_eq!(t.resolve("status__unknown_co"), "{{ status__unknown_co }}");
        }

        #[test]
        fn unknown_column_yields_placeholder() {
            assert_eq!(sample().resolve("revenue__acme"), "{{ revenue__acme }}");
        }

        #[test]
        fn malformed_keys_yield_placeholder() {
            let t = sample();
            for id in ["status____acme", "__acme", "status__"] {
                assert_eq!(t.resolve(id), placeholder(id), "{id}");
            }
            assert!(matches!(
                t.try_resolve("status____acme"),
                Err(LookupFailure::MalformedKey(_))
            ));
        }

        #[test]
        fn deterministic() {
            let t = sample();
            assert_eq!(t.resolve("status__acme"), t.resolve("status__acme"));
            assert_eq!(t.resolve("x__y"), t.resolve("x__y"));
        }
    }
}
