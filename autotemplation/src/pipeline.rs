//! End-to-end document generation.
//!
//! [`Generator`] ties the pieces together for one run: pick a template from
//! the store, scan it, resolve the date and every placeholder, render the
//! body and the name, save the result locally, then either export its table
//! to CSV or publish the document back to the store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::ContextAssembler;
use crate::date::{effective_date, prompt_date};
use crate::document::TableExtraction;
use crate::document::docx::DocxTemplate;
use crate::error::{Error, Result};
use crate::export::write_csv;
use crate::lookup::LookupSource;
use crate::prompter::Prompter;
use crate::store::{DocumentId, DocumentStore, FolderId, TemplateEntry, file_safe};
use crate::template::{IdentifierClass, render_checked};

/// Question shown under the template menu.
pub const SELECTION_QUESTION: &str = "Selection?";

const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

/// Where templates come from and where results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Store folders searched for templates, in order. A later folder's
    /// template replaces an earlier one with the same name.
    pub template_folders: Vec<String>,
    /// Store folder that receives published documents.
    pub destination_folder: String,
    /// Local directory for the rendered `.docx` and any CSV export.
    pub output_dir: PathBuf,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            template_folders: vec!["templates".to_string()],
            destination_folder: "autotemplation".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Per-run choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Template to use by exact name, skipping the menu.
    pub template: Option<String>,
    /// Document date as `YYYYMMDD`. Prompted for when absent.
    pub date: Option<String>,
    /// Export the document's table to CSV instead of publishing.
    pub csv: bool,
}

/// Where a generated document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Uploaded to the store.
    Published {
        /// Destination folder.
        folder: FolderId,
        /// The uploaded document.
        document: DocumentId,
    },
    /// Table written to a local CSV file.
    Exported {
        /// Path of the CSV file.
        csv: PathBuf,
    },
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Rendered output name.
    pub name: String,
    /// Local copy of the rendered document.
    pub document: PathBuf,
    /// Publish or export result.
    pub delivery: Delivery,
    /// Lookup identifiers left as placeholders.
    pub unresolved: Vec<String>,
}

/// One identifier found by [`Generator::scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedIdentifier {
    /// The identifier.
    pub name: String,
    /// How it will be resolved.
    pub class: IdentifierClass,
}

/// Placeholders of one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Template display name.
    pub template: String,
    /// Identifiers in sorted order.
    pub identifiers: Vec<ScannedIdentifier>,
}

/// A parsed menu answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the menu.
    Index(usize),
    /// The user asked to quit.
    Quit,
    /// Not a menu entry.
    Invalid,
}

/// Interpret a menu answer for a menu of `count` entries numbered from 1.
#[must_use]
pub fn parse_selection(answer: &str, count: usize) -> Selection {
    let answer = answer.trim();
    if QUIT_WORDS.iter().any(|w| answer.eq_ignore_ascii_case(w)) {
        return Selection::Quit;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Selection::Index(n - 1),
        _ => Selection::Invalid,
    }
}

/// Runs the template workflow against a store and a prompter.
#[derive(Debug)]
pub struct Generator<S, P> {
    store: S,
    prompter: P,
    settings: GeneratorSettings,
}

impl<S: DocumentStore, P: Prompter> Generator<S, P> {
    /// Create a generator.
    pub const fn new(store: S, prompter: P, settings: GeneratorSettings) -> Self {
        Self {
            store,
            prompter,
            settings,
        }
    }

    /// The settings in use.
    pub const fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Consume the generator, returning the store and prompter.
    pub fn into_parts(self) -> (S, P) {
        (self.store, self.prompter)
    }

    /// Templates across all folders, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder cannot be listed.
    pub fn templates(&self) -> Result<Vec<TemplateEntry>> {
        let mut merged = BTreeMap::new();
        for folder in &self.settings.template_folders {
            for entry in self.store.list_templates(&FolderId::new(folder.as_str()))? {
                merged.insert(entry.name, entry.id);
            }
        }
        Ok(merged
            .into_iter()
            .map(|(name, id)| TemplateEntry { name, id })
            .collect())
    }

    /// Pick a template by name, automatically when there is only one, or
    /// from a menu.
    ///
    /// # Errors
    ///
    /// - [`Error::NoTemplates`] if no folder holds a template.
    /// - [`Error::TemplateNotFound`] if `name` matches none.
    /// - [`Error::Aborted`] if the user quits the menu.
    pub fn select_template(&mut self, name: Option<&str>) -> Result<TemplateEntry> {
        let mut templates = self.templates()?;
        if templates.is_empty() {
            return Err(Error::no_templates(
                self.settings.template_folders.iter().cloned(),
            ));
        }

        if let Some(name) = name {
            return templates
                .into_iter()
                .find(|t| t.name == name)
                .ok_or_else(|| Error::TemplateNotFound(name.to_string()));
        }

        if templates.len() == 1 {
            let only = templates.remove(0);
            info!(template = %only.name, "one template found, using it");
            return Ok(only);
        }
        self.choose(templates)
    }

    fn choose(&mut self, mut templates: Vec<TemplateEntry>) -> Result<TemplateEntry> {
        self.prompter.say("Please Select a Template:")?;
        loop {
            for (i, template) in templates.iter().enumerate() {
                self.prompter.say(&format!("{}) {}", i + 1, template.name))?;
            }
            self.prompter.say("q) Quit")?;

            let answer = self.prompter.ask(SELECTION_QUESTION)?;
            match parse_selection(&answer, templates.len()) {
                Selection::Index(i) => {
                    let chosen = templates.swap_remove(i);
                    info!(template = %chosen.name, "template selected");
                    return Ok(chosen);
                }
                Selection::Quit => return Err(Error::Aborted),
                Selection::Invalid => warn!(answer = %answer, "Invalid Selection"),
            }
        }
    }

    /// Select, fetch and parse a template.
    ///
    /// # Errors
    ///
    /// Propagates selection, store and document errors.
    pub fn open(&mut self, name: Option<&str>) -> Result<DocxTemplate> {
        let entry = self.select_template(name)?;
        let bytes = self.store.fetch(&entry.id)?;
        debug!(template = %entry.name, bytes = bytes.len(), "fetched template");
        DocxTemplate::from_bytes(entry.name, bytes)
    }

    /// List the placeholders of a template with their classes.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::open`].
    pub fn scan(&mut self, name: Option<&str>) -> Result<ScanReport> {
        let template = self.open(name)?;
        let identifiers = template
            .model()?
            .identifiers()
            .into_iter()
            .map(|name| ScannedIdentifier {
                class: IdentifierClass::of(&name),
                name,
            })
            .collect();
        Ok(ScanReport {
            template: template.name().to_string(),
            identifiers,
        })
    }

    /// Run the whole workflow once.
    ///
    /// # Errors
    ///
    /// Propagates selection, prompt, lookup, document, store and local I/O
    /// errors. Unresolved lookups are reported in [`Outcome::unresolved`],
    /// not as errors.
    pub fn generate(
        &mut self,
        lookup: &mut dyn LookupSource,
        options: &RunOptions,
    ) -> Result<Outcome> {
        let template = self.open(options.template.as_deref())?;
        let identifiers = template.model()?.identifiers();
        debug!(count = identifiers.len(), "scanned template");

        let date = match options.date.as_deref() {
            Some(entry) => effective_date(Some(entry)),
            None => prompt_date(&mut self.prompter)?,
        };
        let context =
            ContextAssembler::new(&mut self.prompter, lookup).assemble(&identifiers, date)?;

        let name = render_checked(template.name(), &context, &identifiers)?;
        let bytes = template.render(&context)?;
        let unresolved: Vec<String> = context.unresolved().into_iter().map(String::from).collect();
        if !unresolved.is_empty() {
            warn!(count = unresolved.len(), "some lookups were left unresolved");
        }

        let output_dir = self.settings.output_dir.clone();
        fs::create_dir_all(&output_dir)?;
        let document = output_dir.join(format!("{}.docx", file_safe(&name)));
        fs::write(&document, &bytes)?;
        info!(path = %document.display(), "saved document");

        let exported = if options.csv {
            export_table(&name, &document, &output_dir)?
        } else {
            None
        };
        let delivery = match exported {
            Some(delivery) => delivery,
            None => self.publish(&name, &bytes)?,
        };

        Ok(Outcome {
            name,
            document,
            delivery,
            unresolved,
        })
    }

    fn publish(&mut self, name: &str, bytes: &[u8]) -> Result<Delivery> {
        let destination = self.settings.destination_folder.as_str();
        let folder = self.store.ensure_folder(destination)?;
        let document = self.store.upload(&folder, name, bytes)?;
        info!(name, folder = destination, "{name} placed in folder {destination}");
        Ok(Delivery::Published { folder, document })
    }
}

/// Re-read the saved document and write its only table as CSV.
///
/// Returns `None` when the document does not have exactly one table, or its
/// only table has no rows.
fn export_table(name: &str, document: &Path, output_dir: &Path) -> Result<Option<Delivery>> {
    let saved = DocxTemplate::from_bytes(name, fs::read(document)?)?;
    match saved.model()?.extract_table() {
        TableExtraction::Single(table) if table.is_empty() => {
            warn!("Unable to create CSV. The only table has no rows.");
            Ok(None)
        }
        TableExtraction::Single(table) => {
            let csv = output_dir.join(format!("{}.csv", file_safe(name)));
            write_csv(&csv, &table)?;
            Ok(Some(Delivery::Exported { csv }))
        }
        TableExtraction::NotApplicable { tables } => {
            warn!(
                tables,
                "Unable to create CSV. Less than or more than 1 table found."
            );
            Ok(None)
        }
    }
}
