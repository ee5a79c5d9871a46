use crate::language::Position;

/// Zero-based caret location in character columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { line: 0, col: 0 }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    pub fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    pub fn move_right(&mut self, line_len: usize) {
        self.col = (self.col + 1).min(line_len);
    }

    pub fn move_up(&mut self) {
        self.line = self.line.saturating_sub(1);
    }

    pub fn move_down(&mut self, line_count: usize) {
        self.line = (self.line + 1).min(line_count.saturating_sub(1));
    }
}
