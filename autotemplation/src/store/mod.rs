//! Template and output storage.
//!
//! A [`DocumentStore`] lists template documents in named folders, fetches
//! their bytes, and receives rendered documents. [`FsDocumentStore`] is the
//! local-directory implementation.

mod fs;

use std::fmt;

use crate::error::Result;

pub(crate) use fs::file_safe;
pub use fs::FsDocumentStore;

/// Opaque identifier of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wrap a store-specific identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a folder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FolderId(String);

impl FolderId {
    /// Wrap a store-specific identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A template document available for selection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TemplateEntry {
    /// Display name, which is also the output name template.
    pub name: String,
    /// Where to fetch it from.
    pub id: DocumentId,
}

/// Storage backend for templates and rendered documents.
pub trait DocumentStore {
    /// Template documents directly inside `folder`.
    ///
    /// A folder that does not exist has no templates.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be listed.
    fn list_templates(&self, folder: &FolderId) -> Result<Vec<TemplateEntry>>;

    /// The bytes of a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn fetch(&self, document: &DocumentId) -> Result<Vec<u8>>;

    /// Find the folder called `name`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder cannot be created.
    fn ensure_folder(&mut self, name: &str) -> Result<FolderId>;

    /// Store a document named `name` in `folder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn upload(&mut self, folder: &FolderId, name: &str, bytes: &[u8]) -> Result<DocumentId>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &mut S {
    fn list_templates(&self, folder: &FolderId) -> Result<Vec<TemplateEntry>> {
        (**self).list_templates(folder)
    }

    fn fetch(&self, document: &DocumentId) -> Result<Vec<u8>> {
        (**self).fetch(document)
    }

    fn ensure_folder(&mut self, name: &str) -> Result<FolderId> {
        (**self).ensure_folder(name)
    }

    fn upload(&mut self, folder: &FolderId, name: &str, bytes: &[u8]) -> Result<DocumentId> {
        (**self).upload(folder, name, bytes)
    }
}
