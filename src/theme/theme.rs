use super::Color;
use crate::syntax::TokenClass;

/// Style for a UI element (color + optional attributes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub const fn new(fg: Color) -> Self {
        Self {
            fg,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Self {
        Style::new(color)
    }
}

/// Complete theme definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,

    // Editor chrome
    pub background: Color,
    pub foreground: Color,
    pub line_number: Color,
    pub line_number_active: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,

    // Function sidebar
    pub sidebar_bg: Color,
    pub sidebar_fg: Color,
    pub sidebar_selected: Color,

    // Output panel
    pub output_bg: Color,
    pub output_fg: Color,

    // Completion and hover popups
    pub popup_bg: Color,
    pub popup_fg: Color,
    pub popup_selected_bg: Color,

    pub pane_border: Color,
    pub error: Color,

    // Token classes
    pub syntax_keyword: Style,
    pub syntax_comment: Style,
    pub syntax_string: Style,
    pub syntax_invalid_string: Style,
    pub syntax_number: Style,
    pub syntax_identifier: Style,
}

impl Theme {
    /// Dark editor theme
    pub const fn vs_dark() -> Self {
        Self {
            name: "vs-dark",
            background: Color::rgb(0x1e, 0x1e, 0x1e),
            foreground: Color::rgb(0xd4, 0xd4, 0xd4),
            line_number: Color::rgb(0x85, 0x85, 0x85),
            line_number_active: Color::rgb(0xc6, 0xc6, 0xc6),
            status_bar_bg: Color::rgb(0x00, 0x7a, 0xcc),
            status_bar_fg: Color::WHITE,

            sidebar_bg: Color::rgb(0x25, 0x25, 0x26),
            sidebar_fg: Color::rgb(0xcc, 0xcc, 0xcc),
            sidebar_selected: Color::rgb(0x37, 0x37, 0x3d),

            output_bg: Color::rgb(0x18, 0x18, 0x18),
            output_fg: Color::rgb(0xcc, 0xcc, 0xcc),

            popup_bg: Color::rgb(0x25, 0x25, 0x26),
            popup_fg: Color::rgb(0xcc, 0xcc, 0xcc),
            popup_selected_bg: Color::rgb(0x04, 0x39, 0x5e),

            pane_border: Color::rgb(0x44, 0x44, 0x44),
            error: Color::rgb(0xf4, 0x87, 0x71),

            syntax_keyword: Style::new(Color::rgb(0x56, 0x9c, 0xd6)).bold(),
            syntax_comment: Style::new(Color::rgb(0x6a, 0x99, 0x55)).italic(),
            syntax_string: Style::new(Color::rgb(0xce, 0x91, 0x78)),
            syntax_invalid_string: Style::new(Color::rgb(0xf4, 0x47, 0x47)).underline(),
            syntax_number: Style::new(Color::rgb(0xb5, 0xce, 0xa8)),
            syntax_identifier: Style::new(Color::rgb(0xd4, 0xd4, 0xd4)),
        }
    }

    /// Light editor theme
    pub const fn vs() -> Self {
        Self {
            name: "vs",
            background: Color::WHITE,
            foreground: Color::BLACK,
            line_number: Color::rgb(0x23, 0x78, 0x93),
            line_number_active: Color::rgb(0x0b, 0x21, 0x6f),
            status_bar_bg: Color::rgb(0x00, 0x7a, 0xcc),
            status_bar_fg: Color::WHITE,

            sidebar_bg: Color::rgb(0xf3, 0xf3, 0xf3),
            sidebar_fg: Color::rgb(0x61, 0x61, 0x61),
            sidebar_selected: Color::rgb(0xe4, 0xe6, 0xf1),

            output_bg: Color::rgb(0xf8, 0xf8, 0xf8),
            output_fg: Color::rgb(0x33, 0x33, 0x33),

            popup_bg: Color::rgb(0xf3, 0xf3, 0xf3),
            popup_fg: Color::BLACK,
            popup_selected_bg: Color::rgb(0xd6, 0xeb, 0xff),

            pane_border: Color::rgb(0xc8, 0xc8, 0xc8),
            error: Color::rgb(0xe5, 0x14, 0x00),

            syntax_keyword: Style::new(Color::rgb(0x00, 0x00, 0xff)).bold(),
            syntax_comment: Style::new(Color::rgb(0x00, 0x80, 0x00)).italic(),
            syntax_string: Style::new(Color::rgb(0xa3, 0x15, 0x15)),
            syntax_invalid_string: Style::new(Color::rgb(0xcd, 0x31, 0x31)).underline(),
            syntax_number: Style::new(Color::rgb(0x09, 0x86, 0x58)),
            syntax_identifier: Style::new(Color::BLACK),
        }
    }

    pub fn style_for(&self, class: TokenClass) -> Style {
        match class {
            TokenClass::Keyword => self.syntax_keyword,
            TokenClass::Comment => self.syntax_comment,
            TokenClass::String => self.syntax_string,
            TokenClass::InvalidString => self.syntax_invalid_string,
            TokenClass::Number => self.syntax_number,
            TokenClass::Identifier => self.syntax_identifier,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::vs_dark()
    }
}
