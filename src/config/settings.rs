use std::time::Duration;

use crate::service::DEFAULT_SERVICE_URL;
use crate::theme;

/// Environment variable that overrides the configured service URL
pub const SERVICE_URL_ENV: &str = "OCIDE_SERVICE_URL";

/// Log verbosity settable from `init.rhai`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// Shell settings that can be customized via Rhai config
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    // Display
    pub theme: String,
    pub show_line_numbers: bool,
    pub show_functions: bool,
    pub tab_width: usize,

    // Execution service
    pub service_url: String,
    /// Per-request timeout in seconds; `None` waits indefinitely
    pub run_timeout_secs: Option<u64>,

    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: theme::DARK.to_string(),
            show_line_numbers: true,
            show_functions: true,
            tab_width: 4,

            service_url: DEFAULT_SERVICE_URL.to_string(),
            run_timeout_secs: None,

            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }

    /// Apply an override for the service URL; blank values are ignored
    pub fn with_service_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.service_url = url;
        }
        self
    }

    /// Apply `OCIDE_SERVICE_URL` if set
    pub fn with_env_overrides(self) -> Self {
        self.with_service_url_override(std::env::var(SERVICE_URL_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_service() {
        let settings = Settings::new();
        assert_eq!(settings.service_url, "http://127.0.0.1:5000");
        assert_eq!(settings.theme, "vs-dark");
        assert_eq!(settings.run_timeout(), None);
    }

    #[test]
    fn service_url_override_wins_unless_blank() {
        let settings = Settings::new().with_service_url_override(Some("http://svc:8080".into()));
        assert_eq!(settings.service_url, "http://svc:8080");

        let settings = Settings::new().with_service_url_override(Some("  ".into()));
        assert_eq!(settings.service_url, DEFAULT_SERVICE_URL);
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
    }
}
