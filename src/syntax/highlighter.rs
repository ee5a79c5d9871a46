//! Per-line highlight spans built from lexer tokens

use super::lexer::{Token, TokenClass};

/// A highlight span within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub start: usize, // Byte offset within line
    pub end: usize,   // Byte offset within line (exclusive)
    pub class: TokenClass,
}

/// A line with its syntax highlights
#[derive(Debug, Clone, Default)]
pub struct HighlightedLine {
    pub highlights: Vec<Highlight>,
}

impl HighlightedLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: &[Token]) -> Self {
        Self {
            highlights: tokens
                .iter()
                .map(|t| Highlight {
                    start: t.start,
                    end: t.end(),
                    class: t.class,
                })
                .collect(),
        }
    }

    /// Get the token class covering a byte offset, if any
    pub fn class_at(&self, byte: usize) -> Option<TokenClass> {
        self.highlights
            .iter()
            .find(|h| byte >= h.start && byte < h.end)
            .map(|h| h.class)
    }
}
