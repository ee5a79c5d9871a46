//! Editor extension contract
//!
//! Languages register a tokenizer plus optional completion and hover
//! providers under an id. Providers receive the text model by reference for
//! the duration of one call and cannot keep it.

use std::path::Path;

use thiserror::Error;

use crate::knowledge::CompletionItem;
use crate::syntax::Token;

/// Zero-based cursor position; `column` counts characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A word found around a position; columns are character indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAtPosition {
    pub word: String,
    pub start_column: usize,
    pub end_column: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Read access to the editor's text
pub trait TextModel {
    /// Line content without its line terminator
    fn line_content(&self, line: usize) -> Option<String>;

    /// The word containing or ending at `position`
    fn word_at_position(&self, position: Position) -> Option<WordAtPosition> {
        let line: Vec<char> = self.line_content(position.line)?.chars().collect();
        let col = position.column.min(line.len());

        let mut start = col;
        while start > 0 && is_word_char(line[start - 1]) {
            start -= 1;
        }
        let mut end = col;
        while end < line.len() && is_word_char(line[end]) {
            end += 1;
        }

        (start < end).then(|| WordAtPosition {
            word: line[start..end].iter().collect(),
            start_column: start,
            end_column: end,
        })
    }

    /// The part of the word before `position`, used as a completion prefix
    fn word_until_position(&self, position: Position) -> Option<WordAtPosition> {
        let word = self.word_at_position(position)?;
        let end = position.column.min(word.end_column);
        (word.start_column < end).then(|| WordAtPosition {
            word: word.word.chars().take(end - word.start_column).collect(),
            start_column: word.start_column,
            end_column: end,
        })
    }
}

impl TextModel for String {
    fn line_content(&self, line: usize) -> Option<String> {
        self.split('\n')
            .nth(line)
            .map(|l| l.trim_end_matches('\r').to_string())
    }
}

/// Hover content for a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
    pub markdown: String,
    pub range: WordAtPosition,
}

pub trait TokensProvider {
    fn tokenize(&self, line: &str) -> Vec<Token>;
}

pub trait CompletionProvider {
    fn provide_completion_items(&self, model: &dyn TextModel, position: Position)
    -> Vec<CompletionItem>;
}

pub trait HoverProvider {
    fn provide_hover(&self, model: &dyn TextModel, position: Position) -> Option<Hover>;
}

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("language '{0}' is not registered")]
    UnknownLanguage(String),

    #[error("invalid tokenizer rule: {0}")]
    Rules(#[from] regex::Error),
}

struct LanguageEntry {
    id: String,
    extensions: Vec<String>,
    tokens: Option<Box<dyn TokensProvider>>,
    completion: Option<Box<dyn CompletionProvider>>,
    hover: Option<Box<dyn HoverProvider>>,
}

/// Registry of languages known to the editor
#[derive(Default)]
pub struct LanguageRegistry {
    languages: Vec<LanguageEntry>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language id and the file extensions that select it
    pub fn register(&mut self, id: &str, extensions: &[&str]) {
        self.languages.retain(|l| l.id != id);
        self.languages.push(LanguageEntry {
            id: id.to_string(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            tokens: None,
            completion: None,
            hover: None,
        });
    }

    fn entry(&self, id: &str) -> Option<&LanguageEntry> {
        self.languages.iter().find(|l| l.id == id)
    }

    fn entry_mut(&mut self, id: &str) -> Result<&mut LanguageEntry, LanguageError> {
        self.languages
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| LanguageError::UnknownLanguage(id.to_string()))
    }

    pub fn set_tokens_provider(
        &mut self,
        id: &str,
        provider: Box<dyn TokensProvider>,
    ) -> Result<(), LanguageError> {
        self.entry_mut(id)?.tokens = Some(provider);
        Ok(())
    }

    pub fn register_completion_provider(
        &mut self,
        id: &str,
        provider: Box<dyn CompletionProvider>,
    ) -> Result<(), LanguageError> {
        self.entry_mut(id)?.completion = Some(provider);
        Ok(())
    }

    pub fn register_hover_provider(
        &mut self,
        id: &str,
        provider: Box<dyn HoverProvider>,
    ) -> Result<(), LanguageError> {
        self.entry_mut(id)?.hover = Some(provider);
        Ok(())
    }

    /// Detect the language id from a file path's extension
    pub fn language_for_path(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.languages
            .iter()
            .find(|l| l.extensions.iter().any(|e| *e == ext))
            .map(|l| l.id.as_str())
    }

    /// Tokens for one line, or `None` when the language has no tokenizer
    pub fn tokenize(&self, id: &str, line: &str) -> Option<Vec<Token>> {
        self.entry(id)?.tokens.as_ref().map(|p| p.tokenize(line))
    }

    pub fn completions(
        &self,
        id: &str,
        model: &dyn TextModel,
        position: Position,
    ) -> Vec<CompletionItem> {
        self.entry(id)
            .and_then(|l| l.completion.as_ref())
            .map(|p| p.provide_completion_items(model, position))
            .unwrap_or_default()
    }

    pub fn hover(&self, id: &str, model: &dyn TextModel, position: Position) -> Option<Hover> {
        self.entry(id)?.hover.as_ref()?.provide_hover(model, position)
    }
}
