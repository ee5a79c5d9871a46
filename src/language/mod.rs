//! Language services wiring between the editor and the DSL tooling

mod contract;
pub mod dsl;

pub use contract::{Hover, LanguageRegistry, Position, TextModel, WordAtPosition};
