//! Error types for the autotemplation engine.
//!
//! The hierarchy separates failures of the external collaborators (document
//! store, lookup sheet, document container) from domain outcomes the caller
//! must branch on, such as an empty template folder or a user-initiated quit.
//!
//! Recoverable conditions do not appear here: a malformed date is a
//! [`DateParseError`](crate::date::DateParseError) handled by the date layer,
//! and a failed lookup is a [`LookupFailure`](crate::lookup::LookupFailure)
//! surfaced in-band in the rendered text.

/// Result type alias for autotemplation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the autotemplation engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No template documents exist in any of the configured folders.
    #[error("no templates found in folder(s): {}", folders.join(", "))]
    NoTemplates {
        /// The folder identifiers that were searched.
        folders: Vec<String>,
    },

    /// A template was requested by name but does not exist.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The user chose to quit instead of answering a prompt.
    #[error("aborted by user")]
    Aborted,

    /// A discovered placeholder has no value in the context at render time.
    #[error("no value resolved for placeholder `{0}`")]
    MissingValue(String),

    /// The prompter could not produce an answer.
    #[error("prompt error: {0}")]
    Prompt(String),

    /// The document container or its XML body is malformed.
    #[error("document error: {0}")]
    Document(String),

    /// The document store rejected an operation.
    #[error("store error: {0}")]
    Store(String),

    /// The lookup sheet could not be located or read.
    #[error("lookup source error: {0}")]
    LookupSource(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip container error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// CSV reading or writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet workbook error.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

impl Error {
    /// Create a prompt error with a message.
    #[must_use]
    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Create a document error with a message.
    #[must_use]
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// Create a store error with a message.
    #[must_use]
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a lookup source error with a message.
    #[must_use]
    pub fn lookup_source(msg: impl Into<String>) -> Self {
        Self::LookupSource(msg.into())
    }

    /// Create a no-templates error for the given folders.
    #[must_use]
    pub fn no_templates<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NoTemplates {
            folders: folders.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the run ended because the user quit.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}
