//! Autotemplation - fill `.docx` templates from prompts, dates and a lookup sheet
//!
//! Templates carry `{{ IDENT }}` placeholders in their name, paragraphs and
//! table cells. Each identifier is resolved once per run: date keys from the
//! document date, `column__row` identifiers from a lookup sheet, and
//! everything else by asking the user. The rendered document is saved
//! locally and then published to a store or exported as CSV.

pub mod context;
pub mod date;
pub mod document;
pub mod error;
pub mod export;
pub mod lookup;
pub mod pipeline;
pub mod prelude;
pub mod prompter;
pub mod store;
pub mod template;

pub use context::{Context, ContextAssembler};
pub use error::{Error, Result};
