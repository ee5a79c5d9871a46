use std::io::{self, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    execute, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use super::layout::{Rect, ScreenLayout};
use super::text::{display_col, fit, plain_markdown};
use crate::config::Settings;
use crate::editor::{Editor, Mode};
use crate::language::LanguageRegistry;
use crate::shell::{FunctionPanel, LOAD_FAILED_NOTICE, Shell};
use crate::syntax::HighlightedLine;
use crate::theme::{self, Color, Style, Theme};

const GUTTER_WIDTH: u16 = 5;
const POPUP_MAX_WIDTH: usize = 60;
const POPUP_MAX_ROWS: usize = 8;

/// Display options taken from settings
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub show_line_numbers: bool,
    pub show_functions: bool,
    pub tab_width: usize,
}

impl From<&Settings> for ViewOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            show_line_numbers: settings.show_line_numbers,
            show_functions: settings.show_functions,
            tab_width: settings.tab_width,
        }
    }
}

pub struct Renderer {
    pub width: u16,
    pub height: u16,
    options: ViewOptions,
}

impl Renderer {
    pub fn new(options: ViewOptions) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            width,
            height,
            options,
        })
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn setup() -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn teardown() -> io::Result<()> {
        execute!(
            stdout(),
            SetCursorStyle::DefaultUserShape,
            Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Hand the terminal to a child process such as a file picker
    pub fn suspend() -> io::Result<()> {
        Self::teardown()
    }

    pub fn resume() -> io::Result<()> {
        Self::setup()
    }

    fn layout(&self) -> ScreenLayout {
        ScreenLayout::compute(self.width, self.height, self.options.show_functions)
    }

    fn gutter_width(&self) -> u16 {
        if self.options.show_line_numbers {
            GUTTER_WIDTH
        } else {
            0
        }
    }

    /// Visible text rows in the editor pane, for scroll adjustment
    pub fn editor_height(&self) -> usize {
        self.layout().editor.height as usize
    }

    pub fn render(&self, shell: &Shell) -> io::Result<()> {
        let mut stdout = stdout();
        let theme = theme::get_builtin_theme(shell.theme()).unwrap_or_else(theme::default_theme);
        let layout = self.layout();

        // Hide cursor during redraw to prevent flicker
        queue!(stdout, Hide)?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        if let Some(rect) = layout.sidebar {
            let focused = shell.editor.mode == Mode::Functions;
            self.render_sidebar(&mut stdout, &shell.functions, rect, focused, &theme)?;
            self.render_separator(&mut stdout, rect.right(), rect.height, &theme)?;
        }

        self.render_editor_pane(&mut stdout, &shell.editor, &shell.registry, layout.editor, &theme)?;
        self.render_output(&mut stdout, shell, layout.output, &theme)?;
        self.render_status_line(&mut stdout, shell, layout.status_row, &theme)?;

        self.render_completion(&mut stdout, &shell.editor, layout.editor, &theme)?;
        self.render_hover(&mut stdout, &shell.editor, layout.editor, &theme)?;

        self.position_cursor(&mut stdout, &shell.editor, &layout)?;

        stdout.flush()?;
        Ok(())
    }

    fn render_sidebar(
        &self,
        stdout: &mut impl Write,
        panel: &FunctionPanel,
        rect: Rect,
        focused: bool,
        theme: &Theme,
    ) -> io::Result<()> {
        let width = rect.width as usize;
        queue!(stdout, SetBackgroundColor(theme.sidebar_bg.to_crossterm()))?;

        // Title row
        queue!(stdout, MoveTo(rect.x, rect.y))?;
        queue!(stdout, SetForegroundColor(theme.sidebar_fg.to_crossterm()))?;
        queue!(stdout, SetAttribute(Attribute::Bold))?;
        queue!(stdout, Print(fit(" Functions", width)))?;
        queue!(stdout, SetAttribute(Attribute::Reset))?;

        for row in 1..rect.height {
            let idx = row as usize - 1;
            queue!(stdout, MoveTo(rect.x, rect.y + row))?;
            queue!(stdout, SetBackgroundColor(theme.sidebar_bg.to_crossterm()))?;
            queue!(stdout, SetForegroundColor(theme.sidebar_fg.to_crossterm()))?;

            let line = match panel {
                FunctionPanel::Loading if idx == 0 => " Loading...".to_string(),
                FunctionPanel::Failed if idx == 0 => {
                    queue!(stdout, SetForegroundColor(theme.error.to_crossterm()))?;
                    format!(" {}", LOAD_FAILED_NOTICE)
                }
                FunctionPanel::Loaded { names, selected } => match names.get(idx) {
                    Some(name) => {
                        if focused && idx == *selected {
                            queue!(
                                stdout,
                                SetBackgroundColor(theme.sidebar_selected.to_crossterm())
                            )?;
                        }
                        format!("  {}", name)
                    }
                    None => String::new(),
                },
                _ => String::new(),
            };
            queue!(stdout, Print(fit(&line, width)))?;
        }

        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        Ok(())
    }

    fn render_separator(
        &self,
        stdout: &mut impl Write,
        x: u16,
        height: u16,
        theme: &Theme,
    ) -> io::Result<()> {
        queue!(stdout, SetForegroundColor(theme.pane_border.to_crossterm()))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        for y in 0..height {
            queue!(stdout, MoveTo(x, y))?;
            queue!(stdout, Print("│"))?;
        }
        Ok(())
    }

    fn render_editor_pane(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        registry: &LanguageRegistry,
        rect: Rect,
        theme: &Theme,
    ) -> io::Result<()> {
        let line_count = editor.buffer.line_count();
        let gutter = self.gutter_width();
        let text_width = rect.width.saturating_sub(gutter) as usize;

        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        for row in 0..rect.height {
            let line_idx = row as usize + editor.scroll_offset;
            queue!(stdout, MoveTo(rect.x, rect.y + row))?;

            if line_idx >= line_count {
                queue!(stdout, SetForegroundColor(theme.line_number.to_crossterm()))?;
                if gutter > 0 {
                    queue!(stdout, Print(fit("   ~", gutter as usize)))?;
                }
                queue!(stdout, Print(" ".repeat(text_width)))?;
                continue;
            }

            if gutter > 0 {
                let color = if line_idx == editor.cursor.line {
                    theme.line_number_active
                } else {
                    theme.line_number
                };
                queue!(stdout, SetForegroundColor(color.to_crossterm()))?;
                queue!(stdout, Print(format!("{:>4} ", line_idx + 1)))?;
            }

            let line = editor.buffer.line(line_idx).to_string();
            let line = line.trim_end_matches(['\n', '\r']);
            self.render_code_line(stdout, line, editor.language(), registry, text_width, theme)?;
        }

        Ok(())
    }

    /// Print one line, styled by its tokens, padded to `width` cells
    fn render_code_line(
        &self,
        stdout: &mut impl Write,
        line: &str,
        language: Option<&str>,
        registry: &LanguageRegistry,
        width: usize,
        theme: &Theme,
    ) -> io::Result<()> {
        let highlights = language
            .and_then(|id| registry.tokenize(id, line))
            .map(|tokens| HighlightedLine::from_tokens(&tokens))
            .unwrap_or_default();

        let plain = Style::new(theme.foreground);
        let mut current: Option<Style> = None;
        let mut x = 0usize;

        for (byte, ch) in line.char_indices() {
            if x >= width {
                break;
            }
            let style = highlights
                .class_at(byte)
                .map(|class| theme.style_for(class))
                .unwrap_or(plain);
            if current != Some(style) {
                apply_style(stdout, style, theme.background)?;
                current = Some(style);
            }

            if ch == '\t' {
                let tab_width = self.options.tab_width.max(1);
                let spaces = (tab_width - (x % tab_width)).min(width - x);
                queue!(stdout, Print(" ".repeat(spaces)))?;
                x += spaces;
            } else {
                queue!(stdout, Print(ch))?;
                x += 1;
            }
        }

        queue!(stdout, SetAttribute(Attribute::Reset))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        if x < width {
            queue!(stdout, Print(" ".repeat(width - x)))?;
        }
        Ok(())
    }

    fn render_output(
        &self,
        stdout: &mut impl Write,
        shell: &Shell,
        rect: Rect,
        theme: &Theme,
    ) -> io::Result<()> {
        if rect.height == 0 {
            return Ok(());
        }
        let width = rect.width as usize;

        queue!(stdout, MoveTo(rect.x, rect.y))?;
        queue!(stdout, SetBackgroundColor(theme.output_bg.to_crossterm()))?;
        queue!(stdout, SetForegroundColor(theme.pane_border.to_crossterm()))?;
        queue!(stdout, Print(fit(&format!("─ Output {}", "─".repeat(width)), width)))?;

        let fg = if shell.output.is_error() {
            theme.error
        } else {
            theme.output_fg
        };
        queue!(stdout, SetForegroundColor(fg.to_crossterm()))?;

        let text = shell.output.text();
        let mut lines = text.lines();
        for row in 1..rect.height {
            queue!(stdout, MoveTo(rect.x, rect.y + row))?;
            let line = lines.next().unwrap_or("").replace('\t', " ");
            queue!(stdout, Print(fit(&format!(" {}", line), width)))?;
        }

        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        Ok(())
    }

    fn render_status_line(
        &self,
        stdout: &mut impl Write,
        shell: &Shell,
        row: u16,
        theme: &Theme,
    ) -> io::Result<()> {
        queue!(stdout, MoveTo(0, row))?;
        let editor = &shell.editor;

        // Command mode - just show the command
        if editor.mode == Mode::Command {
            queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
            queue!(stdout, SetForegroundColor(theme.foreground.to_crossterm()))?;
            queue!(stdout, Clear(ClearType::CurrentLine))?;
            queue!(stdout, Print(format!(":{}", editor.command_buffer)))?;
            return Ok(());
        }

        queue!(stdout, SetBackgroundColor(theme.status_bar_bg.to_crossterm()))?;
        queue!(stdout, SetForegroundColor(theme.status_bar_fg.to_crossterm()))?;

        let dirty = if editor.buffer.is_dirty() { " [+]" } else { "" };
        let left = format!(
            " {} | {}{} ",
            editor.mode.display(),
            shell.document_name(),
            dirty
        );
        let right = format!(" {} | {} ", shell.cursor_status(), shell.theme());

        let width = self.width as usize;
        let used = left.chars().count() + right.chars().count();
        let status = format!("{}{}{}", left, " ".repeat(width.saturating_sub(used)), right);
        queue!(stdout, Print(fit(&status, width)))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        Ok(())
    }

    /// Screen cell of the caret, if it is inside the editor pane
    fn caret_cell(&self, editor: &Editor, rect: Rect) -> Option<(u16, u16)> {
        let row = editor.cursor.line.checked_sub(editor.scroll_offset)?;
        if row >= rect.height as usize {
            return None;
        }
        let line = editor.buffer.line(editor.cursor.line).to_string();
        let col = display_col(&line, editor.cursor.col, self.options.tab_width);
        let x = rect.x as usize + self.gutter_width() as usize + col;
        Some((x.min(rect.right().saturating_sub(1) as usize) as u16, rect.y + row as u16))
    }

    fn render_completion(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        rect: Rect,
        theme: &Theme,
    ) -> io::Result<()> {
        let Some(popup) = &editor.completion else {
            return Ok(());
        };
        let Some((x, y)) = self.caret_cell(editor, rect) else {
            return Ok(());
        };

        // Keep the selection inside the visible window
        let first = popup.selected.saturating_sub(POPUP_MAX_ROWS - 1);
        let rows: Vec<String> = popup
            .items
            .iter()
            .skip(first)
            .map(|item| format!(" {:<10} {} ", item.label, item.documentation))
            .collect();
        let selected = popup.selected - first;
        self.render_box(stdout, &rows, Some(selected), x, y.saturating_add(1), rect, theme)
    }

    fn render_hover(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        rect: Rect,
        theme: &Theme,
    ) -> io::Result<()> {
        let Some(hover) = &editor.hover else {
            return Ok(());
        };
        let Some((_, y)) = self.caret_cell(editor, rect) else {
            return Ok(());
        };

        let rows: Vec<String> = plain_markdown(&hover.markdown)
            .lines()
            .map(|l| format!(" {} ", l))
            .collect();
        let (x, top) = hover_origin(
            rect,
            self.gutter_width(),
            hover.anchor.column,
            y,
            rows.len(),
        );
        self.render_box(stdout, &rows, None, x, top, rect, theme)
    }

    /// Draw rows as an overlay clipped to `area`
    #[allow(clippy::too_many_arguments)]
    fn render_box(
        &self,
        stdout: &mut impl Write,
        rows: &[String],
        selected: Option<usize>,
        x: u16,
        y: u16,
        area: Rect,
        theme: &Theme,
    ) -> io::Result<()> {
        let longest = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let width = longest
            .min(POPUP_MAX_WIDTH)
            .min(area.right().saturating_sub(area.x) as usize);
        if width == 0 {
            return Ok(());
        }
        let x = x.min(area.right().saturating_sub(width as u16));

        queue!(stdout, SetForegroundColor(theme.popup_fg.to_crossterm()))?;
        for (i, row) in rows.iter().take(POPUP_MAX_ROWS).enumerate() {
            let row_y = y.saturating_add(i as u16);
            if row_y >= area.bottom() {
                break;
            }
            let bg = if selected == Some(i) {
                theme.popup_selected_bg
            } else {
                theme.popup_bg
            };
            queue!(stdout, MoveTo(x, row_y))?;
            queue!(stdout, SetBackgroundColor(bg.to_crossterm()))?;
            queue!(stdout, Print(fit(row, width)))?;
        }

        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        Ok(())
    }

    fn position_cursor(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        layout: &ScreenLayout,
    ) -> io::Result<()> {
        match editor.mode {
            Mode::Command => {
                let cmd_col = 1 + editor.command_buffer.chars().count() as u16;
                queue!(stdout, MoveTo(cmd_col, layout.status_row))?;
                queue!(stdout, SetCursorStyle::BlinkingBar)?;
                queue!(stdout, Show)?;
            }
            Mode::Functions => {
                queue!(stdout, Hide)?;
            }
            Mode::Normal | Mode::Insert => {
                let Some((x, y)) = self.caret_cell(editor, layout.editor) else {
                    return Ok(());
                };
                queue!(stdout, MoveTo(x, y))?;
                let cursor_style = match editor.mode {
                    Mode::Insert => SetCursorStyle::BlinkingBar,
                    _ => SetCursorStyle::SteadyBlock,
                };
                queue!(stdout, cursor_style)?;
                queue!(stdout, Show)?;
            }
        }
        Ok(())
    }
}

/// Top-left cell of a hover card of `rows` lines for a word starting at
/// `column`, on screen row `caret_y`. Kept inside `rect`.
fn hover_origin(rect: Rect, gutter: u16, column: usize, caret_y: u16, rows: usize) -> (u16, u16) {
    let column = u16::try_from(column).unwrap_or(u16::MAX);
    let x = rect
        .x
        .saturating_add(gutter)
        .saturating_add(column)
        .min(rect.right().saturating_sub(1));

    // Above the word when there is room, otherwise below it
    let height = u16::try_from(rows).unwrap_or(u16::MAX);
    let y = if caret_y >= rect.y.saturating_add(height) {
        caret_y - height
    } else {
        caret_y.saturating_add(1)
    };
    (x, y)
}

/// Reset attributes, then apply `style` over `bg`
fn apply_style(stdout: &mut impl Write, style: Style, bg: Color) -> io::Result<()> {
    queue!(stdout, SetAttribute(Attribute::Reset))?;
    queue!(stdout, SetBackgroundColor(bg.to_crossterm()))?;
    queue!(stdout, SetForegroundColor(style.fg.to_crossterm()))?;
    if style.bold {
        queue!(stdout, SetAttribute(Attribute::Bold))?;
    }
    if style.italic {
        queue!(stdout, SetAttribute(Attribute::Italic))?;
    }
    if style.underline {
        queue!(stdout, SetAttribute(Attribute::Underlined))?;
    }
    Ok(())
}
