//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use autotemplation::prelude::*;
//! ```

pub use crate::context::{Context, ContextAssembler};
pub use crate::date::{DateKey, DateParseError, effective_date, parse_date, prompt_date};
pub use crate::document::docx::{DocxTemplate, write_model};
pub use crate::document::{DocumentModel, Table, TableExtraction};
pub use crate::error::{Error, Result};
pub use crate::export::write_csv;
pub use crate::lookup::{
    CsvLookupSource, FileLookupSource, InteractiveLookupSource, LabeledTable, LookupFailure,
    LookupSource, SpreadsheetLookupSource,
};
pub use crate::pipeline::{
    Delivery, Generator, GeneratorSettings, Outcome, RunOptions, ScanReport, ScannedIdentifier,
};
pub use crate::prompter::{ConsolePrompter, Prompter, ScriptedPrompter};
pub use crate::store::{DocumentId, DocumentStore, FolderId, FsDocumentStore, TemplateEntry};
pub use crate::template::{Classification, IdentifierClass, IdentifierSet, render, scan};
