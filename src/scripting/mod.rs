//! Scripting module - Rhai runtime for configuration
//!
//! Settings are exposed under the `ocide` namespace:
//! - `ocide::config::*` - theme, service, editor display, logging

mod api;
mod engine;

pub use engine::{ScriptEngine, ScriptError};
