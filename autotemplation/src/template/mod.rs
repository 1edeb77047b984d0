//! Placeholder grammar: scanning, classification and substitution.
//!
//! # Architecture
//!
//! - [`scan`] / [`scan_into`] - find `{{ IDENT }}` identifiers in text
//! - [`Classification`] - partition identifiers into computed, lookup and manual
//! - [`render`] / [`render_name`] - substitute values from a [`Context`](crate::Context)
//!
//! # Example
//!
//! ```rust,ignore
//! use autotemplation::template::{render, scan};
//!
//! let ids = scan("Report for {{ CLIENT }}");
//! let mut ctx = Context::new();
//! ctx.insert("CLIENT", "Acme");
//! assert_eq!(render("Report for {{ CLIENT }}", &ctx), "Report for Acme");
//! ```

mod classify;
mod render;
mod scanner;

pub use classify::{Classification, IdentifierClass, LOOKUP_MARKER};
pub use render::{render, render_checked, render_name};
pub use scanner::{IdentifierSet, placeholder, scan, scan_into};
