//! Line tokenizer for the DSL
//!
//! An ordered list of (pattern, class) rules. At each position the first
//! rule that matches wins, so rule order rather than match length resolves
//! ambiguity. Tokenization is line-local and keeps no state between lines:
//! there are no multi-line strings or comments in the DSL.

use regex::Regex;

use crate::knowledge::keywords;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Comment,
    String,
    InvalidString,
    Number,
    Identifier,
}

/// A classified span of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub class: TokenClass,
    /// Byte offset of the token within its line
    pub start: usize,
}

impl Token {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

struct Rule {
    pattern: Regex,
    class: TokenClass,
    /// Only match when the previous character is not a word character
    word_start: bool,
}

impl Rule {
    fn new(pattern: &str, class: TokenClass, word_start: bool) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            class,
            word_start,
        })
    }

    /// Length of the match at the start of `rest`, if any
    fn match_len(&self, rest: &str, prev: Option<char>) -> Option<usize> {
        if self.word_start && prev.is_some_and(is_word_char) {
            return None;
        }
        self.pattern
            .find(rest)
            .filter(|m| m.start() == 0 && !m.is_empty())
            .map(|m| m.end())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Tokenizer built from the DSL rule set
pub struct Lexer {
    rules: Vec<Rule>,
}

impl Lexer {
    /// Build the DSL lexer; the keyword rule comes from the keyword table
    pub fn new() -> Result<Self, regex::Error> {
        Self::with_keywords(keywords::names())
    }

    pub fn with_keywords<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, regex::Error> {
        let alternation = names
            .into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        let rules = vec![
            Rule::new(&format!(r"^(?:{})\b", alternation), TokenClass::Keyword, true)?,
            Rule::new(r"^#.*", TokenClass::Comment, false)?,
            Rule::new(r#"^"(?:[^"\\]|\\.)*$"#, TokenClass::InvalidString, false)?,
            Rule::new(r#"^"(?:[^"\\]|\\.)*""#, TokenClass::String, false)?,
            Rule::new(r"^[0-9]+(?:\.[0-9]+)?\b", TokenClass::Number, true)?,
            Rule::new(r"^[a-zA-Z_][a-zA-Z0-9_-]*", TokenClass::Identifier, false)?,
        ];

        Ok(Self { rules })
    }

    /// Split one line into tokens covering it left to right.
    ///
    /// Where no rule matches, exactly one character is emitted as an
    /// `Identifier` token so the scan always advances.
    pub fn tokenize(&self, line: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < line.len() {
            let rest = &line[pos..];
            let prev = line[..pos].chars().next_back();

            let (len, class) = self
                .rules
                .iter()
                .find_map(|rule| rule.match_len(rest, prev).map(|len| (len, rule.class)))
                .unwrap_or_else(|| {
                    let len = rest.chars().next().map_or(1, char::len_utf8);
                    (len, TokenClass::Identifier)
                });

            tokens.push(Token {
                text: rest[..len].to_string(),
                class,
                start: pos,
            });
            pos += len;
        }

        tokens
    }
}
