//! CSV export of an extracted table.

use std::path::Path;

use tracing::info;

use crate::document::Table;
use crate::error::Result;

/// Write `table` to `path` as CSV, one record per row.
///
/// Rows keep their own lengths; a ragged table produces ragged records.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    for row in table {
        writer.write_record(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = table.len(), "wrote csv");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use assert_fs::TempDir;

    use super::*;

    #[test]
    fn test_writes_quoted_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let table = vec![
            vec!["Item".to_string(), "Note".to_string()],
            vec!["Widget, large".to_string(), "two\nlines".to_string()],
            vec!["solo".to_string()],
        ];

        write_csv(&path, &table).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Item,Note\n\"Widget, large\",\"two\nlines\"\nsolo\n"
        );
    }
}
