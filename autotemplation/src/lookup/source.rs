//! Lookup sheets loaded from local files.

use std::path::{Path, PathBuf};

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};
use chrono::{NaiveTime, TimeDelta};
use tracing::{debug, warn};

use super::{LabeledTable, LookupSource};
use crate::error::{Error, Result};
use crate::prompter::Prompter;

/// Question shown when the lookup sheet location is prompted for.
pub const SHEET_QUESTION: &str = "Please enter path of lookup sheet to use";

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Headerless CSV (or TSV) file. Rows may have different lengths.
#[derive(Debug, Clone)]
pub struct CsvLookupSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvLookupSource {
    /// Comma-separated file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Use a different field delimiter.
    #[must_use]
    pub const fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl LookupSource for CsvLookupSource {
    fn load(&mut self, _prompter: &mut dyn Prompter) -> Result<LabeledTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        debug!(path = %self.path.display(), rows = rows.len(), "loaded csv lookup sheet");
        Ok(LabeledTable::new(rows))
    }
}

/// First worksheet of a spreadsheet workbook (xlsx, xlsm, xlsb, xls, ods).
#[derive(Debug, Clone)]
pub struct SpreadsheetLookupSource {
    path: PathBuf,
}

impl SpreadsheetLookupSource {
    /// Workbook at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LookupSource for SpreadsheetLookupSource {
    fn load(&mut self, _prompter: &mut dyn Prompter) -> Result<LabeledTable> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::lookup_source("workbook has no worksheets"))??;

        // The used range may start below/right of A1; pad so that row 0 and
        // column 0 stay the sheet's first row and column.
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset as usize];
        for row in range.rows() {
            let mut cells = vec![String::new(); col_offset as usize];
            cells.extend(row.iter().map(cell_text));
            rows.push(cells);
        }
        debug!(path = %self.path.display(), rows = rows.len(), "loaded spreadsheet lookup sheet");
        Ok(LabeledTable::new(rows))
    }
}

/// Cell text as the spreadsheet shows it: dates as `m/d/yyyy`, booleans as
/// `TRUE`/`FALSE`, whole numbers without a fraction.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(value) => date_text(value),
        other => other.to_string(),
    }
}

fn date_text(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        return value
            .as_duration()
            .map_or_else(|| value.to_string(), duration_text);
    }
    let Some(datetime) = value.as_datetime() else {
        return value.to_string();
    };
    // Serials below one carry no date part.
    if value.as_f64() < 1.0 {
        datetime.format("%-H:%M:%S").to_string()
    } else if datetime.time() == NaiveTime::MIN {
        datetime.format("%-m/%-d/%Y").to_string()
    } else {
        datetime.format("%-m/%-d/%Y %-H:%M:%S").to_string()
    }
}

fn duration_text(duration: TimeDelta) -> String {
    let seconds = duration.num_seconds();
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.unsigned_abs();
    format!(
        "{sign}{}:{:02}:{:02}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    )
}

/// Local file, dispatched on extension.
#[derive(Debug, Clone)]
pub struct FileLookupSource {
    path: PathBuf,
}

impl FileLookupSource {
    /// File at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns `true` if the file extension names a readable sheet format.
    #[must_use]
    pub fn supports(path: &Path) -> bool {
        extension(path).is_some_and(|ext| {
            ext == "csv" || ext == "tsv" || SPREADSHEET_EXTENSIONS.contains(&ext.as_str())
        })
    }
}

impl LookupSource for FileLookupSource {
    fn load(&mut self, prompter: &mut dyn Prompter) -> Result<LabeledTable> {
        match extension(&self.path).as_deref() {
            Some("csv") => CsvLookupSource::new(&self.path).load(prompter),
            Some("tsv") => CsvLookupSource::new(&self.path).delimiter(b'\t').load(prompter),
            Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext) => {
                SpreadsheetLookupSource::new(&self.path).load(prompter)
            }
            _ => Err(Error::lookup_source(format!(
                "unsupported lookup sheet format: {}",
                self.path.display()
            ))),
        }
    }
}

/// Asks the prompter for a sheet path, re-asking until an existing file of a
/// supported format is named.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveLookupSource;

impl LookupSource for InteractiveLookupSource {
    fn load(&mut self, prompter: &mut dyn Prompter) -> Result<LabeledTable> {
        loop {
            let answer = prompter.ask(SHEET_QUESTION)?;
            let path = PathBuf::from(answer.trim());
            if !path.is_file() {
                warn!(path = %path.display(), "Invalid lookup sheet path!");
                continue;
            }
            if !FileLookupSource::supports(&path) {
                warn!(path = %path.display(), "Unsupported lookup sheet format!");
                continue;
            }
            return FileLookupSource::new(path).load(prompter);
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
