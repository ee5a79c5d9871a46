mod settings;

pub use settings::{LogLevel, Settings, SERVICE_URL_ENV};
