use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::language::TextModel;

/// Document text plus where it was last opened from or saved to
pub struct Buffer {
    text: Rope,
    filepath: Option<PathBuf>,
    dirty: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            filepath: None,
            dirty: false,
        }
    }

    pub fn from_text(s: &str, filepath: Option<PathBuf>) -> Self {
        Self {
            text: Rope::from_str(s),
            filepath,
            dirty: false,
        }
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    pub fn set_filepath(&mut self, path: PathBuf) {
        self.filepath = Some(path);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    pub fn line(&self, idx: usize) -> ropey::RopeSlice<'_> {
        self.text.line(idx)
    }

    /// Length excluding the line terminator (`\n` or `\r\n`)
    pub fn line_len(&self, idx: usize) -> usize {
        let line = self.text.line(idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && line.char(len - 1) == '\r' {
            len -= 1;
        }
        len
    }

    /// Convert (line, col) to a char index in the rope
    fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        self.text.line_to_char(line) + col
    }

    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert_char(idx, ch);
        self.dirty = true;
    }

    pub fn insert_str(&mut self, line: usize, col: usize, s: &str) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert(idx, s);
        self.dirty = true;
    }

    /// Remove the characters in `start_col..end_col` of one line
    pub fn delete_range(&mut self, line: usize, start_col: usize, end_col: usize) {
        if start_col >= end_col {
            return;
        }
        let start = self.line_col_to_char(line, start_col);
        let end = self.line_col_to_char(line, end_col).min(self.text.len_chars());
        if start < end {
            self.text.remove(start..end);
            self.dirty = true;
        }
    }

    /// Delete the character before the given position (backspace)
    pub fn delete_char_backward(&mut self, line: usize, col: usize) -> bool {
        let idx = self.line_col_to_char(line, col);
        if idx == 0 {
            return false;
        }
        self.text.remove(idx - 1..idx);
        self.dirty = true;
        true
    }

    pub fn insert_newline(&mut self, line: usize, col: usize) {
        self.insert_char(line, col, '\n');
    }

    /// Append text at the very end of the buffer
    pub fn append(&mut self, s: &str) {
        let end = self.text.len_chars();
        self.text.insert(end, s);
        self.dirty = true;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextModel for Buffer {
    fn line_content(&self, line: usize) -> Option<String> {
        if line >= Buffer::line_count(self) {
            return None;
        }
        let text = self.text.line(line).to_string();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_from_str(s: &str) -> Buffer {
        Buffer::from_text(s, None)
    }

    #[test]
    fn new_buffer_is_empty_and_clean() {
        let buf = Buffer::new();
        assert_eq!(buf.line_count(), 1); // empty rope has 1 line
        assert!(!buf.is_dirty());
        assert!(buf.filepath().is_none());
    }

    #[test]
    fn line_len_excludes_newline() {
        let buf = buffer_from_str("hello\n\nworld");
        assert_eq!(buf.line_len(0), 5);
        assert_eq!(buf.line_len(1), 0);
        assert_eq!(buf.line_len(2), 5);
    }

    #[test]
    fn line_len_excludes_crlf() {
        let buf = buffer_from_str("print hi\r\nadd 1 2\r\n");
        assert_eq!(buf.line_len(0), 8);
        assert_eq!(buf.line_len(1), 7);
        assert_eq!(buf.line_len(2), 0);
    }

    #[test]
    fn edits_mark_dirty() {
        let mut buf = buffer_from_str("print");
        buf.insert_char(0, 5, ' ');
        assert!(buf.is_dirty());
        assert_eq!(buf.text(), "print ");
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn backspace_joins_lines() {
        let mut buf = buffer_from_str("ab\ncd");
        assert!(buf.delete_char_backward(1, 0));
        assert_eq!(buf.text(), "abcd");
        assert!(!buf.delete_char_backward(0, 0));
    }

    #[test]
    fn delete_range_then_insert_replaces_word() {
        let mut buf = buffer_from_str("x pr y");
        buf.delete_range(0, 2, 4);
        buf.insert_str(0, 2, "print ");
        assert_eq!(buf.text(), "x print  y");
    }

    #[test]
    fn append_adds_at_end() {
        let mut buf = buffer_from_str("print hi");
        buf.append("\nadd ");
        assert_eq!(buf.text(), "print hi\nadd ");
    }

    #[test]
    fn text_model_strips_line_endings() {
        let buf = buffer_from_str("one\r\ntwo\n");
        assert_eq!(buf.line_content(0).as_deref(), Some("one"));
        assert_eq!(buf.line_content(1).as_deref(), Some("two"));
        assert_eq!(buf.line_content(2).as_deref(), Some(""));
        assert_eq!(buf.line_content(3), None);
    }
}
