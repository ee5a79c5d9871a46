//! The privileged side of the bridge
//!
//! Runs as its own task and is the only code that touches the filesystem
//! or presents pickers. Failures are caught here and returned as values.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use super::client::BridgeClient;
use super::dialogs::{Dialogs, FileFilter};
use super::protocol::{
    Envelope, FileOpenResult, HostCall, HostRequest, HostResponse, PROTOCOL_VERSION, SaveTarget,
    WriteOutcome,
};
use crate::language::dsl;

/// Filters offered when opening a file
pub const OPEN_FILTERS: &[FileFilter] = &[
    FileFilter {
        name: "OpenCode Files",
        extensions: dsl::EXTENSIONS,
    },
    FileFilter {
        name: "All Files",
        extensions: &["*"],
    },
];

/// Filters offered when choosing a save target
pub const SAVE_FILTERS: &[FileFilter] = &[
    FileFilter {
        name: "OpenCode Files",
        extensions: &[dsl::DEFAULT_EXTENSION],
    },
    FileFilter {
        name: "All Files",
        extensions: &["*"],
    },
];

const CHANNEL_CAPACITY: usize = 16;

pub struct Host<D> {
    dialogs: D,
}

impl<D: Dialogs> Host<D> {
    pub fn new(dialogs: D) -> Self {
        Self { dialogs }
    }

    /// Answer calls until every client handle is dropped
    pub async fn serve(self, mut calls: mpsc::Receiver<HostCall>) {
        while let Some(call) = calls.recv().await {
            let response = self.handle(call.envelope).await;
            if call.reply.send(response).is_err() {
                tracing::debug!("bridge caller went away before the reply");
            }
        }
        tracing::debug!("bridge host stopped");
    }

    pub async fn handle(&self, envelope: Envelope) -> HostResponse {
        if envelope.version != PROTOCOL_VERSION {
            tracing::warn!(
                version = envelope.version,
                expected = PROTOCOL_VERSION,
                "rejected bridge request"
            );
            return HostResponse::Rejected {
                error: format!(
                    "unsupported protocol version {} (host speaks {})",
                    envelope.version, PROTOCOL_VERSION
                ),
            };
        }

        tracing::debug!(channel = envelope.request.channel(), "bridge request");
        match envelope.request {
            HostRequest::OpenFile => HostResponse::Open(self.open_file().await),
            HostRequest::SaveFileAs { default_name } => {
                HostResponse::SaveTarget(self.save_file_as(&default_name).await)
            }
            HostRequest::WriteFile { path, content } => {
                HostResponse::Write(write_file(path, &content).await)
            }
        }
    }

    async fn open_file(&self) -> FileOpenResult {
        let path = match self.dialogs.pick_open(OPEN_FILTERS).await {
            Ok(Some(path)) => path,
            Ok(None) => return FileOpenResult::Canceled,
            Err(e) => {
                return FileOpenResult::Failed {
                    error: e.to_string(),
                };
            }
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                tracing::info!(path = %path.display(), bytes = content.len(), "opened file");
                FileOpenResult::Opened { path, content }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "open failed");
                FileOpenResult::Failed {
                    error: format!("{}: {}", path.display(), e),
                }
            }
        }
    }

    async fn save_file_as(&self, default_name: &str) -> SaveTarget {
        let default_name = if default_name.is_empty() {
            untitled_name()
        } else {
            default_name.to_string()
        };

        match self.dialogs.pick_save(&default_name, SAVE_FILTERS).await {
            Ok(Some(path)) => SaveTarget::Chosen {
                file_path: with_default_extension(path),
            },
            Ok(None) => SaveTarget::Canceled,
            Err(e) => SaveTarget::Failed {
                error: e.to_string(),
            },
        }
    }
}

async fn write_file(path: PathBuf, content: &str) -> WriteOutcome {
    match tokio::fs::write(&path, content).await {
        Ok(()) => {
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote file");
            WriteOutcome::Written { path }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "write failed");
            WriteOutcome::Failed {
                error: format!("{}: {}", path.display(), e),
            }
        }
    }
}

/// Default name offered for a document that was never saved
pub fn untitled_name() -> String {
    format!("untitled.{}", dsl::DEFAULT_EXTENSION)
}

/// Append the canonical extension when the chosen name has none
pub fn with_default_extension(path: PathBuf) -> PathBuf {
    if has_extension(&path) {
        path
    } else {
        path.with_extension(dsl::DEFAULT_EXTENSION)
    }
}

fn has_extension(path: &Path) -> bool {
    path.extension().is_some_and(|e| !e.is_empty())
}

/// Start a host task and return the UI-side handle to it
pub fn spawn<D: Dialogs + 'static>(dialogs: D) -> BridgeClient {
    let (client, calls) = BridgeClient::channel(CHANNEL_CAPACITY);
    tokio::spawn(Host::new(dialogs).serve(calls));
    client
}
