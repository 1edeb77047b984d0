//! Identifier classification.
//!
//! Every identifier falls into exactly one class, checked in this order:
//!
//! 1. [`IdentifierClass::Computed`] - one of the fixed [`DateKey`] names.
//! 2. [`IdentifierClass::Lookup`] - contains a double underscore (`__`).
//! 3. [`IdentifierClass::Manual`] - anything else.
//!
//! The `__` rule is a fixed naming contract shared with template authors. It
//! decides whether a value comes from the lookup sheet or from the user, so
//! it is intentionally not configurable.

use serde::Serialize;

use super::scanner::IdentifierSet;
use crate::date::DateKey;

/// Marker that routes an identifier to the lookup sheet.
pub const LOOKUP_MARKER: &str = "__";

/// Resolution strategy for a placeholder identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierClass {
    /// Derived from the document date.
    Computed,
    /// Read from the lookup sheet.
    Lookup,
    /// Entered by the user.
    Manual,
}

impl IdentifierClass {
    /// Classify a single identifier.
    #[must_use]
    pub fn of(identifier: &str) -> Self {
        if DateKey::from_name(identifier).is_some() {
            Self::Computed
        } else if identifier.contains(LOOKUP_MARKER) {
            Self::Lookup
        } else {
            Self::Manual
        }
    }

    /// Lowercase label used in listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Computed => "computed",
            Self::Lookup => "lookup",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for IdentifierClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier set partitioned by [`IdentifierClass`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Date-derived identifiers.
    pub computed: IdentifierSet,
    /// Lookup-sheet identifiers.
    pub lookup: IdentifierSet,
    /// User-entered identifiers.
    pub manual: IdentifierSet,
}

impl Classification {
    /// Partition `identifiers` into the three classes.
    #[must_use]
    pub fn partition(identifiers: &IdentifierSet) -> Self {
        let mut classes = Self::default();
        for ident in identifiers {
            let bucket = match IdentifierClass::of(ident) {
                IdentifierClass::Computed => &mut classes.computed,
                IdentifierClass::Lookup => &mut classes.lookup,
                IdentifierClass::Manual => &mut classes.manual,
            };
            bucket.insert(ident.clone());
        }
        classes
    }

    /// Returns `true` if at least one identifier needs the lookup sheet.
    #[must_use]
    pub fn needs_lookup(&self) -> bool {
        !self.lookup.is_empty()
    }

    /// Total number of classified identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.computed.len() + self.lookup.len() + self.manual.len()
    }

    /// Returns `true` if no identifiers were classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
