//! Word translation for non-source-language speech output.
//!
//! Translation failure is never fatal; callers fall back to the original
//! text.

mod client;

pub use client::{HttpTranslator, Translator};

/// Language spelled words are produced in before any translation.
pub const SOURCE_LANGUAGE: &str = "en";
