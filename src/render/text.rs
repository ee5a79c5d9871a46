//! Small text shaping helpers for terminal cells

/// Display column of character index `col`, expanding tabs
pub fn display_col(line: &str, col: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    line.chars().take(col).fold(0, |x, c| {
        if c == '\t' {
            x + tab_width - (x % tab_width)
        } else {
            x + 1
        }
    })
}

/// Markdown hover text as plain terminal text: emphasis and code markers dropped
pub fn plain_markdown(markdown: &str) -> String {
    markdown.replace("**", "").replace('`', "")
}

/// Pad or cut `s` to exactly `width` characters
pub fn fit(s: &str, width: usize) -> String {
    let cut: String = s.chars().take(width).collect();
    format!("{:width$}", cut, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_expand_to_next_stop() {
        assert_eq!(display_col("\tprint", 1, 4), 4);
        assert_eq!(display_col("ab\tc", 3, 4), 4);
        assert_eq!(display_col("abc", 2, 4), 2);
    }

    #[test]
    fn hover_markdown_flattens() {
        assert_eq!(
            plain_markdown("**add** - Adds two numbers. Usage: `add 5 6`"),
            "add - Adds two numbers. Usage: add 5 6"
        );
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("hi", 4), "hi  ");
        assert_eq!(fit("hello", 3), "hel");
    }
}
