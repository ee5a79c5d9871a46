/// A rectangular screen region in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

pub const SIDEBAR_WIDTH: u16 = 24;
pub const OUTPUT_HEIGHT: u16 = 7;

/// Where each panel goes for a given terminal size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub sidebar: Option<Rect>,
    pub editor: Rect,
    pub output: Rect,
    pub status_row: u16,
}

impl ScreenLayout {
    pub fn compute(width: u16, height: u16, show_sidebar: bool) -> Self {
        let status_row = height.saturating_sub(1);
        let body_height = status_row;

        // Sidebar plus its one-column separator, only if the editor keeps room
        let sidebar = (show_sidebar && width > SIDEBAR_WIDTH * 2)
            .then(|| Rect::new(0, 0, SIDEBAR_WIDTH, body_height));
        let main_x = sidebar.map(|s| s.right() + 1).unwrap_or(0);
        let main_width = width.saturating_sub(main_x);

        // Output panel keeps a title row plus content; editor gets the rest
        let output_height = OUTPUT_HEIGHT.min(body_height / 2);
        let editor_height = body_height.saturating_sub(output_height);

        Self {
            sidebar,
            editor: Rect::new(main_x, 0, main_width, editor_height),
            output: Rect::new(main_x, editor_height, main_width, output_height),
            status_row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panels_tile_the_screen() {
        let layout = ScreenLayout::compute(100, 40, true);
        let sidebar = layout.sidebar.unwrap();
        assert_eq!(sidebar.height, 39);
        assert_eq!(layout.editor.x, SIDEBAR_WIDTH + 1);
        assert_eq!(layout.editor.right(), 100);
        assert_eq!(layout.editor.bottom(), layout.output.y);
        assert_eq!(layout.output.bottom(), layout.status_row);
        assert_eq!(layout.status_row, 39);
    }

    #[test]
    fn sidebar_hidden_when_disabled_or_narrow() {
        assert!(ScreenLayout::compute(100, 40, false).sidebar.is_none());
        assert!(ScreenLayout::compute(40, 40, true).sidebar.is_none());
        assert_eq!(ScreenLayout::compute(40, 40, true).editor.width, 40);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let layout = ScreenLayout::compute(1, 1, true);
        assert_eq!(layout.status_row, 0);
        assert_eq!(layout.editor.height, 0);
        assert_eq!(layout.output.height, 0);
    }
}
