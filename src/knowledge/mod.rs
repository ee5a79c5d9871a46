//! Static language knowledge for the DSL
//!
//! A single keyword table drives the tokenizer's keyword rule, the
//! completion list and hover documentation.

mod base;
pub mod keywords;

pub use base::{CompletionItem, KnowledgeBase};
