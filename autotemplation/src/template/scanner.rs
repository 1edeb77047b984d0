//! Placeholder discovery.
//!
//! Placeholders use a fixed grammar: `{{ IDENT }}` with exactly one space
//! after the opening braces and one before the closing braces, where `IDENT`
//! is `[A-Za-z0-9_]+`. Any other spacing is plain text to the scanner.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Sorted set of distinct placeholder identifiers.
///
/// A `BTreeSet` keeps iteration deterministic, so prompting order is stable
/// between runs.
pub type IdentifierSet = BTreeSet<String>;

pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{ ([A-Za-z0-9_]+) \}\}").expect("valid regex")
});

/// Returns the identifiers of every placeholder in `text`.
///
/// Raw identifier text is preserved; duplicates collapse into one entry.
#[must_use]
pub fn scan(text: &str) -> IdentifierSet {
    let mut found = IdentifierSet::new();
    scan_into(text, &mut found);
    found
}

/// Adds the identifiers found in `text` to an existing set.
pub fn scan_into(text: &str, found: &mut IdentifierSet) {
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        if let Some(ident) = caps.get(1)
            && !found.contains(ident.as_str())
        {
            found.insert(ident.as_str().to_string());
        }
    }
}

/// Wraps an identifier back into its placeholder delimiters.
#[must_use]
pub fn placeholder(identifier: &str) -> String {
    format!("{{{{ {identifier} }}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_empty() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_scan_collapses_duplicates() {
        let ids = scan("{{ CLIENT }} and {{ CLIENT }} and {{ other_1 }}");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("CLIENT"));
        assert!(ids.contains("other_1"));
    }

    #[test]
    fn test_scan_preserves_case() {
        let ids = scan("{{ Status__Acme }}");
        assert!(ids.contains("Status__Acme"));
        assert!(!ids.contains("status__acme"));
    }

    #[test]
    fn test_scan_requires_exact_spacing() {
        assert!(scan("{{CLIENT}}").is_empty());
        assert!(scan("{{  CLIENT }}").is_empty());
        assert!(scan("{{ CLIENT  }}").is_empty());
        assert!(scan("{{ CLIENT-NAME }}").is_empty());
    }

    #[test]
    fn test_scan_is_idempotent() {
        let text = "Dear {{ NAME }}, on {{ DATE_FULL }} ({{ NAME }})";
        assert_eq!(scan(text), scan(text));
    }

    #[test]
    fn test_placeholder_round_trip() {
        let wrapped = placeholder("foo__bar");
        assert_eq!(wrapped, "{{ foo__bar }}");
        assert!(scan(&wrapped).contains("foo__bar"));
    }
}
