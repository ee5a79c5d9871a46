//! The Rhai engine that evaluates `init.rhai`
//!
//! Provides the `ocide` namespace with `ocide::config::*`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use rhai::{Engine, Scope};
use thiserror::Error;

use super::api;
use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Eval(String),
}

/// Sandboxed engine writing into shared settings
pub struct ScriptEngine {
    engine: Engine,
    settings: Arc<RwLock<Settings>>,
}

impl ScriptEngine {
    /// Create a new script engine with fresh settings
    pub fn new() -> Self {
        let settings = Arc::new(RwLock::new(Settings::default()));
        let engine = Self::create_engine(Arc::clone(&settings));

        Self { engine, settings }
    }

    fn create_engine(settings: Arc<RwLock<Settings>>) -> Engine {
        let mut engine = Engine::new();

        // Safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_operations(100_000);

        let mut ocide_module = rhai::Module::new();
        let config_module = api::config::create_module(Arc::clone(&settings));
        ocide_module.set_sub_module("config", config_module);
        engine.register_static_module("ocide", ocide_module.into());

        engine.on_print(|msg| tracing::info!(target: "ocide::config", "{}", msg));
        engine.on_debug(|msg, _, pos| tracing::debug!(target: "ocide::config", %pos, "{}", msg));

        engine
    }

    /// Load and execute a config file
    pub fn load_file(&mut self, path: &Path) -> Result<(), ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.eval(&content)
    }

    /// Evaluate a Rhai script string
    pub fn eval(&mut self, script: &str) -> Result<(), ScriptError> {
        let ast = self
            .engine
            .compile(script)
            .map_err(|e| ScriptError::Parse(e.to_string()))?;

        let mut scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| ScriptError::Eval(e.to_string()))
    }

    /// Get the current settings (cloned)
    pub fn settings(&self) -> Settings {
        self.settings.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Uses ~/.config/ocide/ on all platforms for consistency
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("ocide"))
    }

    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("init.rhai"))
    }

    /// Load the default config file if it exists
    pub fn load_default(&mut self) -> Result<(), ScriptError> {
        if let Some(config_file) = Self::config_file() {
            if config_file.exists() {
                tracing::info!(path = %config_file.display(), "loading config");
                return self.load_file(&config_file);
            }
        }
        Ok(()) // No config file is fine
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use std::time::Duration;

    #[test]
    fn set_theme_accepts_builtins() {
        let mut engine = ScriptEngine::new();
        engine.eval(r#"ocide::config::set_theme("vs");"#).unwrap();
        assert_eq!(engine.settings().theme, "vs");
    }

    #[test]
    fn set_theme_rejects_unknown_names() {
        let mut engine = ScriptEngine::new();
        let err = engine
            .eval(r#"ocide::config::set_theme("nord");"#)
            .unwrap_err();
        assert!(matches!(err, ScriptError::Eval(_)));
        assert_eq!(engine.settings().theme, "vs-dark");
    }

    #[test]
    fn service_settings() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                ocide::config::set_service_url("http://runner:9000/");
                ocide::config::set_run_timeout(15);
            "#,
            )
            .unwrap();

        let settings = engine.settings();
        assert_eq!(settings.service_url, "http://runner:9000");
        assert_eq!(settings.run_timeout(), Some(Duration::from_secs(15)));

        engine.eval("ocide::config::set_run_timeout(0);").unwrap();
        assert_eq!(engine.settings().run_timeout(), None);
    }

    #[test]
    fn getters_round_trip_through_script() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                ocide::config::set_theme("vs");
                if ocide::config::get_theme() != "vs" { throw "theme"; }
                if ocide::config::get_service_url() != "http://127.0.0.1:5000" { throw "url"; }
            "#,
            )
            .unwrap();
    }

    #[test]
    fn display_and_logging_settings() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                ocide::config::set_tab_width(100);
                ocide::config::set_show_line_numbers(false);
                ocide::config::set_show_functions(false);
                ocide::config::set_log_level("debug");
            "#,
            )
            .unwrap();

        let settings = engine.settings();
        assert_eq!(settings.tab_width, 16); // Clamped to max
        assert!(!settings.show_line_numbers);
        assert!(!settings.show_functions);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn list_themes_returns_builtins() {
        let mut engine = ScriptEngine::new();
        engine
            .eval(
                r#"
                let themes = ocide::config::list_themes();
                if themes.len() != 2 {
                    throw "expected two themes";
                }
            "#,
            )
            .unwrap();
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        let mut engine = ScriptEngine::new();
        assert!(matches!(
            engine.eval("ocide::config::set_theme("),
            Err(ScriptError::Parse(_))
        ));
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.rhai");
        std::fs::write(&path, r#"ocide::config::set_show_functions(false);"#).unwrap();

        let mut engine = ScriptEngine::new();
        engine.load_file(&path).unwrap();
        assert!(!engine.settings().show_functions);

        assert!(matches!(
            engine.load_file(&dir.path().join("missing.rhai")),
            Err(ScriptError::Read { .. })
        ));
    }
}
