//! Syntax highlighting for the DSL
//!
//! A regex rule engine tokenizes one line at a time; the highlighter turns
//! tokens into spans for the renderer.

mod highlighter;
mod lexer;

pub use highlighter::HighlightedLine;
pub use lexer::{Lexer, Token, TokenClass};
