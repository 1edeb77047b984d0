//! Resolved placeholder values and the assembler that builds them.
//!
//! A [`Context`] is built fresh for every render and consumed once. Entries
//! are first-wins: once a key is set, later inserts are ignored. The
//! [`ContextAssembler`] fills it in a fixed order:
//!
//! 1. every computed date key;
//! 2. each discovered identifier not yet present, in sorted order - lookup
//!    identifiers from the lookup sheet, everything else from the prompter.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::date::date_entries;
use crate::error::{Error, Result};
use crate::lookup::{LabeledTable, LookupSource};
use crate::prompter::Prompter;
use crate::template::{Classification, IdentifierClass, IdentifierSet, placeholder};

/// Mapping from placeholder identifier to its resolved value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context holding every computed date key for `date`.
    #[must_use]
    pub fn with_date(date: NaiveDate) -> Self {
        let mut ctx = Self::new();
        for (key, value) in date_entries(date) {
            ctx.insert(key, value);
        }
        ctx
    }

    /// Insert a value unless the key is already present.
    ///
    /// Returns `true` if the value was stored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.values.contains_key(&key) {
            debug!(key = %key, "context key already set, keeping first value");
            return false;
        }
        self.values.insert(key, value.into());
        true
    }

    /// Value for `key`, if resolved.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` has a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the context has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check that every identifier in `identifiers` has a value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] naming the first uncovered identifier.
    pub fn ensure_covers(&self, identifiers: &IdentifierSet) -> Result<()> {
        match identifiers.iter().find(|id| !self.contains(id)) {
            Some(missing) => Err(Error::MissingValue(missing.clone())),
            None => Ok(()),
        }
    }

    /// Keys whose value is their own re-wrapped placeholder, i.e. lookups
    /// that could not be resolved.
    #[must_use]
    pub fn unresolved(&self) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(k, v)| **v == placeholder(k))
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

/// Builds a [`Context`] for one render.
///
/// The lookup source is only loaded when the identifier set contains at
/// least one lookup identifier, and then exactly once.
pub struct ContextAssembler<'a> {
    prompter: &'a mut dyn Prompter,
    lookup: &'a mut dyn LookupSource,
}

impl std::fmt::Debug for ContextAssembler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextAssembler").finish_non_exhaustive()
    }
}

impl<'a> ContextAssembler<'a> {
    /// Create an assembler over the given collaborators.
    pub fn new(prompter: &'a mut dyn Prompter, lookup: &'a mut dyn LookupSource) -> Self {
        Self { prompter, lookup }
    }

    /// Resolve every identifier in `identifiers` for a document dated `date`.
    ///
    /// # Errors
    ///
    /// Propagates prompter and lookup source failures. Unresolvable lookups
    /// are not errors; they resolve to their own placeholder text.
    pub fn assemble(&mut self, identifiers: &IdentifierSet, date: NaiveDate) -> Result<Context> {
        let mut ctx = Context::with_date(date);
        let classes = Classification::partition(identifiers);
        debug!(
            computed = classes.computed.len(),
            lookup = classes.lookup.len(),
            manual = classes.manual.len(),
            "classified placeholders"
        );

        let table: Option<LabeledTable> = if classes.needs_lookup() {
            info!(count = classes.lookup.len(), "loading lookup sheet");
            Some(self.lookup.load(&mut *self.prompter)?)
        } else {
            None
        };

        for ident in identifiers {
            if ctx.contains(ident) {
                continue;
            }
            let value = match table
                .as_ref()
                .filter(|_| IdentifierClass::of(ident) == IdentifierClass::Lookup)
            {
                Some(table) => table.resolve(ident),
                None => self.prompter.resolve(ident)?,
            };
            ctx.insert(ident.clone(), value);
        }

        Ok(ctx)
    }
}
