//! Directory-backed document store.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{DocumentId, DocumentStore, FolderId, TemplateEntry};
use crate::error::{Error, Result};

const DOCX_EXTENSION: &str = "docx";

/// Stores documents as `.docx` files under a root directory.
///
/// Folder identifiers are paths relative to the root; document identifiers
/// are full file paths.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder_path(&self, folder: &FolderId) -> PathBuf {
        self.root.join(folder.as_str())
    }
}

impl DocumentStore for FsDocumentStore {
    fn list_templates(&self, folder: &FolderId) -> Result<Vec<TemplateEntry>> {
        let dir = self.folder_path(folder);
        if !dir.is_dir() {
            debug!(folder = %dir.display(), "template folder does not exist");
            return Ok(Vec::new());
        }

        let mut templates = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_docx(&path) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Word keeps `~$name.docx` lock files next to open documents.
            if name.starts_with("~$") {
                continue;
            }
            templates.push(TemplateEntry {
                name: name.to_string(),
                id: DocumentId::new(path.to_string_lossy()),
            });
        }
        templates.sort();
        debug!(folder = %dir.display(), count = templates.len(), "listed templates");
        Ok(templates)
    }

    fn fetch(&self, document: &DocumentId) -> Result<Vec<u8>> {
        Ok(fs::read(document.as_str())?)
    }

    fn ensure_folder(&mut self, name: &str) -> Result<FolderId> {
        let folder = FolderId::new(name);
        let dir = self.folder_path(&folder);
        if dir.exists() && !dir.is_dir() {
            return Err(Error::store(format!(
                "{} exists and is not a directory",
                dir.display()
            )));
        }
        fs::create_dir_all(&dir)?;
        Ok(folder)
    }

    fn upload(&mut self, folder: &FolderId, name: &str, bytes: &[u8]) -> Result<DocumentId> {
        let path = self
            .folder_path(folder)
            .join(format!("{}.{DOCX_EXTENSION}", file_safe(name)));
        fs::write(&path, bytes)?;
        info!(path = %path.display(), "uploaded document");
        Ok(DocumentId::new(path.to_string_lossy()))
    }
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION))
}

/// Replace path separators so a rendered name stays a single file name.
pub(crate) fn file_safe(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    use super::*;

    #[test]
    fn test_lists_docx_by_stem_sorted() {
        let dir = TempDir::new().unwrap();
        let templates = dir.child("templates");
        templates.child("b_{{ CLIENT }}.docx").write_binary(b"b").unwrap();
        templates.child("A.DOCX").write_binary(b"a").unwrap();
        templates.child("notes.txt").write_str("x").unwrap();
        templates.child("~$b_{{ CLIENT }}.docx").write_binary(b"lock").unwrap();
        templates.child("nested/c.docx").write_binary(b"c").unwrap();

        let store = FsDocumentStore::new(dir.path());
        let found = store.list_templates(&FolderId::new("templates")).unwrap();
        let names: Vec<_> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A", "b_{{ CLIENT }}"]);
        assert_eq!(store.fetch(&found[0].id).unwrap(), b"a");
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FsDocumentStore::new(dir.path());
        assert!(store.list_templates(&FolderId::new("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_folder_and_upload() {
        let dir = TempDir::new().unwrap();
        let mut store = FsDocumentStore::new(dir.path());

        let folder = store.ensure_folder("out/docs").unwrap();
        let again = store.ensure_folder("out/docs").unwrap();
        assert_eq!(folder, again);

        let id = store.upload(&folder, "Report_Acme/2024", b"bytes").unwrap();
        let written = std::fs::read(dir.path().join("out/docs/Report_Acme_2024.docx")).unwrap();
        assert_eq!(written, b"bytes");
        assert_eq!(store.fetch(&id).unwrap(), b"bytes");
    }

    #[test]
    fn test_ensure_folder_rejects_file() {
        let dir = TempDir::new().unwrap();
        dir.child("taken").write_str("x").unwrap();
        let mut store = FsDocumentStore::new(dir.path());
        assert!(matches!(store.ensure_folder("taken"), Err(Error::Store(_))));
    }
}
