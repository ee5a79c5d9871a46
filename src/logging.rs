//! Log setup. The terminal belongs to the UI, so events go to a file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

pub const LOG_FILE_NAME: &str = "ocide.log";

/// `RUST_LOG` wins over the configured level
fn filter(level: LogLevel) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.as_directive().into())
}

fn open_log(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
}

/// Install the global subscriber writing to `<dir>/ocide.log`.
/// Returns the log path.
pub fn init(dir: &Path, level: LogLevel) -> io::Result<PathBuf> {
    let file = open_log(dir)?;

    tracing_subscriber::registry()
        .with(filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(dir.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_created_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        open_log(&nested).unwrap();
        assert!(nested.join(LOG_FILE_NAME).exists());
    }
}
