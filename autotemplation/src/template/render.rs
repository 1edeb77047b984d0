//! Placeholder substitution.
//!
//! Rendering is a single regex pass: each `{{ IDENT }}` whose identifier is
//! present in the [`Context`] is replaced by its value, and every other token
//! is copied through unchanged. Substituted values are never re-scanned, so a
//! value that itself looks like a placeholder (such as an unresolved lookup
//! sentinel) survives verbatim.

use std::borrow::Cow;

use regex::Captures;

use super::scanner::{IdentifierSet, PLACEHOLDER_RE};
use crate::context::Context;
use crate::error::Result;

/// Substitute every known placeholder in `text`.
#[must_use]
pub fn render<'t>(text: &'t str, context: &Context) -> Cow<'t, str> {
    PLACEHOLDER_RE.replace_all(text, |caps: &Captures<'_>| {
        context
            .get(&caps[1])
            .map_or_else(|| caps[0].to_string(), str::to_string)
    })
}

/// Render a document display name into the output name.
///
/// Uses the already-assembled context only; it never prompts.
#[must_use]
pub fn render_name(template_name: &str, context: &Context) -> String {
    render(template_name, context).into_owned()
}

/// Render `text` after checking that `context` covers `identifiers`.
///
/// # Errors
///
/// Returns [`Error::MissingValue`](crate::Error::MissingValue) for the first
/// identifier without a context entry.
pub fn render_checked(
    text: &str,
    context: &Context,
    identifiers: &IdentifierSet,
) -> Result<String> {
    context.ensure_covers(identifiers)?;
    Ok(render(text, context).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn context(pairs: &[(&str, &str)]) -> Context {
        let mut ctx = Context::new();
        for (k, v) in pairs {
            ctx.insert(*k, *v);
        }
        ctx
    }

    #[test]
    fn test_render_substitutes_known() {
        let ctx = context(&[("CLIENT", "Acme")]);
        assert_eq!(render("Hello {{ CLIENT }}!", &ctx), "Hello Acme!");
    }

    #[test]
    fn test_render_leaves_unknown_untouched() {
        let ctx = context(&[("CLIENT", "Acme")]);
        assert_eq!(
            render("{{ CLIENT }} / {{ ghost }}", &ctx),
            "Acme / {{ ghost }}"
        );
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let ctx = context(&[("a__b", "{{ a__b }}"), ("X", "{{ Y }}"), ("Y", "nope")]);
        assert_eq!(render("{{ a__b }} {{ X }}", &ctx), "{{ a__b }} {{ Y }}");
    }

    #[test]
    fn test_render_borrows_when_unchanged() {
        let ctx = Context::new();
        assert!(matches!(render("plain text", &ctx), Cow::Borrowed(_)));
    }

    #[test]
    fn test_render_name() {
        let ctx = context(&[("CLIENT", "Acme"), ("DATE_FULL_NUM", "20240115")]);
        assert_eq!(
            render_name("Report_{{ CLIENT }}_{{ DATE_FULL_NUM }}", &ctx),
            "Report_Acme_20240115"
        );
    }

    #[test]
    fn test_render_checked_missing() {
        let ctx = context(&[("CLIENT", "Acme")]);
        let ids: IdentifierSet = ["CLIENT".to_string(), "PROJECT".to_string()].into();
        let err = render_checked("{{ CLIENT }}", &ctx, &ids).unwrap_err();
        assert!(matches!(err, Error::MissingValue(ref id) if id == "PROJECT"));
    }
}
