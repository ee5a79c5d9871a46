mod colors;
mod theme;

pub use colors::Color;
pub use theme::{Style, Theme};

pub const DARK: &str = "vs-dark";
pub const LIGHT: &str = "vs";

pub fn default_theme() -> Theme {
    Theme::vs_dark()
}

pub fn list_builtin_themes() -> Vec<&'static str> {
    vec![DARK, LIGHT]
}

pub fn get_builtin_theme(name: &str) -> Option<Theme> {
    match name {
        DARK => Some(Theme::vs_dark()),
        LIGHT => Some(Theme::vs()),
        _ => None,
    }
}

/// The other built-in theme; unknown names fall back to the dark one
pub fn toggled(name: &str) -> &'static str {
    if name == DARK { LIGHT } else { DARK }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_builtins() {
        assert_eq!(toggled(DARK), LIGHT);
        assert_eq!(toggled(LIGHT), DARK);
        assert_eq!(toggled("nord"), DARK);
    }

    #[test]
    fn every_listed_theme_resolves() {
        for name in list_builtin_themes() {
            assert_eq!(get_builtin_theme(name).map(|t| t.name), Some(name));
        }
        assert!(get_builtin_theme("nord").is_none());
    }
}
