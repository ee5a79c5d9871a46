use std::path::{Path, PathBuf};

use super::popup::{CompletionPopup, HoverPopup};
use super::{Buffer, Cursor, Mode};
use crate::language::{LanguageRegistry, TextModel};

/// The code editing surface: one document, one caret, transient popups
pub struct Editor {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub mode: Mode,
    pub command_buffer: String,
    pub scroll_offset: usize,
    pub completion: Option<CompletionPopup>,
    pub hover: Option<HoverPopup>,
    language: Option<String>,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            buffer: Buffer::new(),
            cursor: Cursor::new(),
            mode: Mode::default(),
            command_buffer: String::new(),
            scroll_offset: 0,
            completion: None,
            hover: None,
            language: None,
        }
    }

    /// Replace the whole document, resetting caret and popups
    pub fn set_document(&mut self, text: &str, path: Option<PathBuf>, language: Option<String>) {
        self.buffer = Buffer::from_text(text, path);
        self.cursor = Cursor::new();
        self.scroll_offset = 0;
        self.language = language;
        self.close_popups();
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn path(&self) -> Option<&Path> {
        self.buffer.filepath()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Record a new save location after a successful write
    pub fn mark_saved(&mut self, path: PathBuf, language: Option<String>) {
        self.buffer.set_filepath(path);
        self.buffer.mark_clean();
        if language.is_some() {
            self.language = language;
        }
    }

    /// `Ln X, Col Y`, one-based
    pub fn cursor_status(&self) -> String {
        format!("Ln {}, Col {}", self.cursor.line + 1, self.cursor.col + 1)
    }

    /// Adjust scroll offset to keep cursor visible within viewport
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if self.cursor.line < self.scroll_offset {
            self.scroll_offset = self.cursor.line;
        }
        if viewport_height > 0 && self.cursor.line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor.line - viewport_height + 1;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor.move_left();
        self.hover = None;
    }

    pub fn move_right(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.move_right(line_len);
        self.hover = None;
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up();
        self.clamp_cursor_col();
        self.hover = None;
    }

    pub fn move_down(&mut self) {
        let line_count = self.buffer.line_count();
        self.cursor.move_down(line_count);
        self.clamp_cursor_col();
        self.hover = None;
    }

    fn clamp_cursor_col(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        if self.cursor.col > line_len {
            self.cursor.col = line_len;
        }
    }

    /// 0
    pub fn move_to_line_start(&mut self) {
        self.cursor.col = 0;
    }

    /// $
    pub fn move_to_line_end(&mut self) {
        self.cursor.col = self.buffer.line_len(self.cursor.line);
    }

    /// gg
    pub fn move_to_first_line(&mut self) {
        self.cursor.line = 0;
        self.clamp_cursor_col();
    }

    /// G
    pub fn move_to_last_line(&mut self) {
        self.cursor.line = self.buffer.line_count().saturating_sub(1);
        self.clamp_cursor_col();
    }

    pub fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
        self.hover = None;
    }

    /// Append at end of line (A)
    pub fn append_end_of_line(&mut self) {
        self.move_to_line_end();
        self.enter_insert_mode();
    }

    /// Open line below (o)
    pub fn open_line_below(&mut self) {
        self.move_to_line_end();
        self.insert_newline();
        self.enter_insert_mode();
    }

    pub fn enter_normal_mode(&mut self) {
        self.mode = Mode::Normal;
        self.command_buffer.clear();
        self.clamp_cursor_col();
        self.close_popups();
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_buffer.clear();
        self.close_popups();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert_char(self.cursor.line, self.cursor.col, ch);
        self.cursor.col += 1;
    }

    pub fn delete_char_backward(&mut self) {
        if self.cursor.col > 0 {
            self.buffer
                .delete_char_backward(self.cursor.line, self.cursor.col);
            self.cursor.col -= 1;
        } else if self.cursor.line > 0 {
            let prev_line_len = self.buffer.line_len(self.cursor.line - 1);
            self.buffer
                .delete_char_backward(self.cursor.line, self.cursor.col);
            self.cursor.line -= 1;
            self.cursor.col = prev_line_len;
        }
    }

    pub fn insert_newline(&mut self) {
        self.buffer.insert_newline(self.cursor.line, self.cursor.col);
        self.cursor.line += 1;
        self.cursor.col = 0;
    }

    /// Append text at the end of the document and park the caret after it
    pub fn append_text(&mut self, text: &str) {
        self.buffer.append(text);
        self.cursor.line = self.buffer.line_count().saturating_sub(1);
        self.cursor.col = self.buffer.line_len(self.cursor.line);
        self.close_popups();
    }

    pub fn close_popups(&mut self) {
        self.completion = None;
        self.hover = None;
    }

    /// Ask the language's completion provider for suggestions at the caret.
    /// Returns whether a popup is now showing.
    pub fn trigger_completion(&mut self, registry: &LanguageRegistry) -> bool {
        self.hover = None;
        let Some(language) = self.language.as_deref() else {
            self.completion = None;
            return false;
        };
        let position = self.cursor.position();
        let items = registry.completions(language, &self.buffer, position);
        let prefix = self.buffer.word_until_position(position);
        self.completion = CompletionPopup::filtered(items, prefix, position);
        self.completion.is_some()
    }

    /// Insert the selected suggestion over the typed prefix
    pub fn accept_completion(&mut self) {
        let Some(popup) = self.completion.take() else {
            return;
        };
        let Some(item) = popup.current() else {
            return;
        };

        let line = self.cursor.line;
        let start = match &popup.prefix {
            Some(prefix) => {
                self.buffer
                    .delete_range(line, prefix.start_column, prefix.end_column);
                prefix.start_column
            }
            None => self.cursor.col,
        };
        self.buffer.insert_str(line, start, &item.insert_text);
        self.cursor.col = start + item.insert_text.chars().count();
    }

    /// Ask the language's hover provider about the word under the caret.
    /// Returns whether a card is now showing.
    pub fn show_hover(&mut self, registry: &LanguageRegistry) -> bool {
        self.completion = None;
        let line = self.cursor.line;
        self.hover = self
            .language
            .as_deref()
            .and_then(|language| registry.hover(language, &self.buffer, self.cursor.position()))
            .map(|hover| HoverPopup::new(hover, line));
        self.hover.is_some()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::dsl;

    fn registry() -> LanguageRegistry {
        let mut registry = LanguageRegistry::new();
        dsl::register(&mut registry).unwrap();
        registry
    }

    fn editor_with_text(s: &str) -> Editor {
        let mut editor = Editor::new();
        editor.set_document(s, None, Some(dsl::LANGUAGE_ID.to_string()));
        editor
    }

    #[test]
    fn new_editor_starts_in_normal_mode() {
        let editor = Editor::new();
        assert_eq!(editor.mode, Mode::Normal);
        assert_eq!(editor.text(), "");
    }

    #[test]
    fn enter_command_mode_clears_command_buffer() {
        let mut editor = Editor::new();
        editor.command_buffer = "leftover".to_string();
        editor.enter_command_mode();
        assert_eq!(editor.mode, Mode::Command);
        assert!(editor.command_buffer.is_empty());
    }

    #[test]
    fn move_down_clamps_col_to_shorter_line() {
        let mut editor = editor_with_text("print hello\nhi");
        editor.cursor.col = 10;
        editor.move_down();
        assert_eq!(editor.cursor.line, 1);
        assert_eq!(editor.cursor.col, 2);
    }

    #[test]
    fn cursor_status_is_one_based() {
        let mut editor = editor_with_text("print hi\nadd 5 6");
        assert_eq!(editor.cursor_status(), "Ln 1, Col 1");
        editor.move_down();
        editor.move_right();
        editor.move_right();
        assert_eq!(editor.cursor_status(), "Ln 2, Col 3");
    }

    #[test]
    fn line_end_stops_before_crlf() {
        let mut editor = editor_with_text("print hi\r\nadd 1 2");
        editor.move_to_line_end();
        assert_eq!(editor.cursor.col, 8);
        assert_eq!(editor.cursor_status(), "Ln 1, Col 9");

        editor.enter_insert_mode();
        editor.insert_char('!');
        assert_eq!(editor.text(), "print hi!\r\nadd 1 2");
    }

    #[test]
    fn set_document_resets_state() {
        let mut editor = editor_with_text("a\nb\nc");
        editor.cursor.line = 2;
        editor.scroll_offset = 1;
        editor.set_document("print hi", Some(PathBuf::from("x.oc")), None);
        assert_eq!(editor.cursor, Cursor::new());
        assert_eq!(editor.scroll_offset, 0);
        assert_eq!(editor.path(), Some(Path::new("x.oc")));
        assert!(!editor.buffer.is_dirty());
    }

    #[test]
    fn completion_replaces_typed_prefix() {
        let registry = registry();
        let mut editor = editor_with_text("");
        editor.enter_insert_mode();
        for ch in "rep".chars() {
            editor.insert_char(ch);
        }

        assert!(editor.trigger_completion(&registry));
        editor.accept_completion();
        assert_eq!(editor.text(), "repeat ");
        assert_eq!(editor.cursor.col, 7);
        assert!(editor.completion.is_none());
    }

    #[test]
    fn completion_without_prefix_offers_every_keyword() {
        let registry = registry();
        let mut editor = editor_with_text("");
        assert!(editor.trigger_completion(&registry));
        assert_eq!(editor.completion.as_ref().map(|p| p.items.len()), Some(6));
    }

    #[test]
    fn no_language_means_no_completion() {
        let registry = registry();
        let mut editor = Editor::new();
        assert!(!editor.trigger_completion(&registry));
    }

    #[test]
    fn hover_over_keyword_shows_documentation() {
        let registry = registry();
        let mut editor = editor_with_text("  uppercase hi");
        editor.cursor.col = 4;
        assert!(editor.show_hover(&registry));
        let hover = editor.hover.as_ref().unwrap();
        assert!(hover.markdown.contains("**uppercase**"));
        assert_eq!(hover.anchor.column, 2);
    }

    #[test]
    fn hover_over_unknown_word_shows_nothing() {
        let registry = registry();
        let mut editor = editor_with_text("printer");
        editor.cursor.col = 2;
        assert!(!editor.show_hover(&registry));
    }

    #[test]
    fn append_text_moves_caret_to_end() {
        let mut editor = editor_with_text("print hi");
        editor.append_text("\nadd ");
        assert_eq!(editor.text(), "print hi\nadd ");
        assert_eq!(editor.cursor_status(), "Ln 2, Col 5");
    }

    #[test]
    fn adjust_scroll_follows_cursor() {
        let mut editor = editor_with_text("1\n2\n3\n4\n5\n6\n7\n8\n9\n10");
        editor.cursor.line = 8;
        editor.adjust_scroll(5);
        assert_eq!(editor.scroll_offset, 4);

        editor.cursor.line = 2;
        editor.adjust_scroll(5);
        assert_eq!(editor.scroll_offset, 2);
    }
}
