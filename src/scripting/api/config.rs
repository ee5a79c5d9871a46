//! ocide::config - theme, execution service and display settings
//!
//! Usage in Rhai:
//! ```rhai
//! ocide::config::set_theme("vs");
//! ocide::config::set_service_url("http://127.0.0.1:5000");
//! ocide::config::set_run_timeout(30);
//! ocide::config::set_log_level("debug");
//! ```

use rhai::plugin::*;
use std::sync::{Arc, RwLock};

use crate::config::{LogLevel, Settings};

/// Create the config module with access to settings
pub fn create_module(settings: Arc<RwLock<Settings>>) -> rhai::Module {
    let mut module = rhai::Module::new();

    // set_theme(name: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_theme",
            move |name: &str| -> Result<(), Box<EvalAltResult>> {
                if crate::theme::get_builtin_theme(name).is_none() {
                    return Err(format!("unknown theme '{}'", name).into());
                }
                if let Ok(mut settings) = s.write() {
                    settings.theme = name.to_string();
                }
                Ok(())
            },
        );
    }

    // get_theme() -> String
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "get_theme",
            move || -> Result<String, Box<EvalAltResult>> {
                Ok(s.read().map(|s| s.theme.clone()).unwrap_or_default())
            },
        );
    }

    // list_themes() -> Array
    module.set_native_fn(
        "list_themes",
        || -> Result<rhai::Array, Box<EvalAltResult>> {
            Ok(crate::theme::list_builtin_themes()
                .into_iter()
                .map(|s| rhai::Dynamic::from(s.to_string()))
                .collect())
        },
    );

    // set_service_url(url: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_service_url",
            move |url: &str| -> Result<(), Box<EvalAltResult>> {
                let url = url.trim().trim_end_matches('/');
                if url.is_empty() {
                    return Err("service url must not be empty".into());
                }
                if let Ok(mut settings) = s.write() {
                    settings.service_url = url.to_string();
                }
                Ok(())
            },
        );
    }

    // get_service_url() -> String
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "get_service_url",
            move || -> Result<String, Box<EvalAltResult>> {
                Ok(s.read().map(|s| s.service_url.clone()).unwrap_or_default())
            },
        );
    }

    // set_run_timeout(seconds: i64), 0 disables
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_run_timeout",
            move |seconds: i64| -> Result<(), Box<EvalAltResult>> {
                if let Ok(mut settings) = s.write() {
                    settings.run_timeout_secs = (seconds > 0).then_some(seconds as u64);
                }
                Ok(())
            },
        );
    }

    // set_tab_width(width: i64)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_tab_width",
            move |width: i64| -> Result<(), Box<EvalAltResult>> {
                if let Ok(mut settings) = s.write() {
                    settings.tab_width = width.clamp(1, 16) as usize;
                }
                Ok(())
            },
        );
    }

    // set_show_line_numbers(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_show_line_numbers",
            move |enabled: bool| -> Result<(), Box<EvalAltResult>> {
                if let Ok(mut settings) = s.write() {
                    settings.show_line_numbers = enabled;
                }
                Ok(())
            },
        );
    }

    // set_show_functions(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_show_functions",
            move |enabled: bool| -> Result<(), Box<EvalAltResult>> {
                if let Ok(mut settings) = s.write() {
                    settings.show_functions = enabled;
                }
                Ok(())
            },
        );
    }

    // set_log_level(level: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "set_log_level",
            move |level: &str| -> Result<(), Box<EvalAltResult>> {
                let Some(level) = LogLevel::parse(level) else {
                    return Err(format!("unknown log level '{}'", level).into());
                };
                if let Ok(mut settings) = s.write() {
                    settings.log_level = level;
                }
                Ok(())
            },
        );
    }

    module
}
