use super::keywords::{self, KEYWORDS};

/// A completion suggestion for a built-in keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub insert_text: String,
    pub documentation: String,
}

/// Hover content for a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverEntry {
    pub keyword: String,
    pub markdown: String,
}

/// Static completion and hover knowledge for the DSL
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    completions: Vec<CompletionItem>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        let completions = KEYWORDS
            .iter()
            .map(|kw| CompletionItem {
                label: kw.name.to_string(),
                insert_text: kw.insert_text.to_string(),
                documentation: kw.documentation.to_string(),
            })
            .collect();

        Self { completions }
    }

    /// All completion items, in keyword table order
    pub fn completions(&self) -> &[CompletionItem] {
        &self.completions
    }

    /// Hover entry for an exact word, if it is a keyword
    pub fn hover(&self, word: &str) -> Option<HoverEntry> {
        keywords::find(word).map(|kw| HoverEntry {
            keyword: kw.name.to_string(),
            markdown: kw.hover.to_string(),
        })
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Lexer, TokenClass};

    #[test]
    fn one_completion_per_keyword() {
        let kb = KnowledgeBase::new();
        let labels: Vec<_> = kb.completions().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, keywords::names().collect::<Vec<_>>());
    }

    #[test]
    fn every_completion_label_lexes_as_keyword() {
        let kb = KnowledgeBase::new();
        let lexer = Lexer::new().unwrap();
        for item in kb.completions() {
            let tokens = lexer.tokenize(&item.label);
            assert_eq!(tokens.len(), 1, "{}", item.label);
            assert_eq!(tokens[0].class, TokenClass::Keyword, "{}", item.label);
            assert_eq!(tokens[0].text, item.label);
        }
    }

    #[test]
    fn hover_for_documented_keywords_mentions_name() {
        let kb = KnowledgeBase::new();
        for word in ["print", "add", "repeat", "uppercase"] {
            let entry = kb.hover(word).expect("hover entry");
            assert!(entry.markdown.contains(word));
            assert_eq!(entry.keyword, word);
        }
    }

    #[test]
    fn hover_for_unknown_word_is_none() {
        let kb = KnowledgeBase::new();
        assert!(kb.hover("xyz").is_none());
        assert!(kb.hover("").is_none());
    }

    #[test]
    fn completions_are_order_stable() {
        let a = KnowledgeBase::new();
        let b = KnowledgeBase::new();
        assert_eq!(a.completions(), b.completions());
    }
}
