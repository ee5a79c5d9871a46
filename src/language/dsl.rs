//! Registration of the DSL with the editor

use super::contract::{
    CompletionProvider, Hover, HoverProvider, LanguageError, LanguageRegistry, Position,
    TextModel, TokensProvider,
};
use crate::knowledge::{CompletionItem, KnowledgeBase};
use crate::syntax::{Lexer, Token};

pub const LANGUAGE_ID: &str = "opencode";

/// Extensions recognised as DSL source; the first is canonical
pub const EXTENSIONS: &[&str] = &["oc", "opencode", "dev"];

pub const DEFAULT_EXTENSION: &str = "oc";

struct DslTokens {
    lexer: Lexer,
}

impl TokensProvider for DslTokens {
    fn tokenize(&self, line: &str) -> Vec<Token> {
        self.lexer.tokenize(line)
    }
}

struct DslCompletion {
    knowledge: KnowledgeBase,
}

impl CompletionProvider for DslCompletion {
    fn provide_completion_items(
        &self,
        _model: &dyn TextModel,
        _position: Position,
    ) -> Vec<CompletionItem> {
        // Prefix filtering is left to the editor popup
        self.knowledge.completions().to_vec()
    }
}

struct DslHover {
    knowledge: KnowledgeBase,
}

impl HoverProvider for DslHover {
    fn provide_hover(&self, model: &dyn TextModel, position: Position) -> Option<Hover> {
        let word = model.word_at_position(position)?;
        let entry = self.knowledge.hover(&word.word)?;
        Some(Hover {
            markdown: entry.markdown,
            range: word,
        })
    }
}

/// Register the DSL language, its tokenizer, completion and hover providers
pub fn register(registry: &mut LanguageRegistry) -> Result<(), LanguageError> {
    let knowledge = KnowledgeBase::new();

    registry.register(LANGUAGE_ID, EXTENSIONS);
    registry.set_tokens_provider(LANGUAGE_ID, Box::new(DslTokens { lexer: Lexer::new()? }))?;
    registry.register_completion_provider(
        LANGUAGE_ID,
        Box::new(DslCompletion {
            knowledge: knowledge.clone(),
        }),
    )?;
    registry.register_hover_provider(LANGUAGE_ID, Box::new(DslHover { knowledge }))?;

    tracing::debug!(language = LANGUAGE_ID, "registered language providers");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TokenClass;
    use std::path::Path;

    fn registry() -> LanguageRegistry {
        let mut registry = LanguageRegistry::new();
        register(&mut registry).unwrap();
        registry
    }

    #[test]
    fn dsl_extensions_select_language() {
        let registry = registry();
        for name in ["a.oc", "b.opencode", "c.dev", "D.OC"] {
            assert_eq!(registry.language_for_path(Path::new(name)), Some(LANGUAGE_ID));
        }
        assert_eq!(registry.language_for_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn tokenizer_is_the_dsl_lexer() {
        let registry = registry();
        let tokens = registry.tokenize(LANGUAGE_ID, "repeat hi 3").unwrap();
        assert_eq!(tokens[0].class, TokenClass::Keyword);
        assert_eq!(tokens.last().unwrap().class, TokenClass::Number);
    }

    #[test]
    fn completion_items_cover_keywords() {
        let registry = registry();
        let model = "pr".to_string();
        let items = registry.completions(LANGUAGE_ID, &model, Position::new(0, 2));
        assert_eq!(items.len(), crate::knowledge::keywords::KEYWORDS.len());
        assert!(items.iter().any(|i| i.label == "print" && i.insert_text == "print "));
    }

    #[test]
    fn hover_on_keyword_under_cursor() {
        let registry = registry();
        let model = "# demo\nadd 5 6".to_string();
        let hover = registry
            .hover(LANGUAGE_ID, &model, Position::new(1, 1))
            .unwrap();
        assert!(hover.markdown.contains("add"));
        assert_eq!((hover.range.start_column, hover.range.end_column), (0, 3));
    }

    #[test]
    fn hover_on_plain_word_is_none() {
        let registry = registry();
        let model = "print xyz".to_string();
        assert!(registry.hover(LANGUAGE_ID, &model, Position::new(0, 7)).is_none());
        assert!(registry.hover(LANGUAGE_ID, &model, Position::new(5, 0)).is_none());
    }
}
