use crate::knowledge::CompletionItem;
use crate::language::{Hover, Position, WordAtPosition};

/// Suggestion list anchored at the word being typed
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPopup {
    pub items: Vec<CompletionItem>,
    pub selected: usize,
    /// Typed prefix replaced on accept, if any
    pub prefix: Option<WordAtPosition>,
    pub anchor: Position,
}

impl CompletionPopup {
    /// Keep items whose label starts with the typed prefix. `None` when nothing is left.
    pub fn filtered(
        items: Vec<CompletionItem>,
        prefix: Option<WordAtPosition>,
        anchor: Position,
    ) -> Option<Self> {
        let items: Vec<CompletionItem> = match &prefix {
            Some(p) => {
                let typed = p.word.to_lowercase();
                items
                    .into_iter()
                    .filter(|item| item.label.to_lowercase().starts_with(&typed))
                    .collect()
            }
            None => items,
        };
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            selected: 0,
            prefix,
            anchor,
        })
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.items.len() - 1);
    }

    pub fn current(&self) -> Option<&CompletionItem> {
        self.items.get(self.selected)
    }
}

/// Hover card shown next to a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverPopup {
    pub markdown: String,
    pub anchor: Position,
}

impl HoverPopup {
    pub fn new(hover: Hover, line: usize) -> Self {
        Self {
            anchor: Position::new(line, hover.range.start_column),
            markdown: hover.markdown,
        }
    }
}
