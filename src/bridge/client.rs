//! UI-side handle to the privileged host

use std::path::Path;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::protocol::{
    Envelope, FileOpenResult, HostCall, HostRequest, HostResponse, SaveTarget, WriteOutcome,
};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("file host is not running")]
    Disconnected,

    #[error("file host rejected the request: {0}")]
    Rejected(String),

    #[error("file host answered {channel} with a {got} response")]
    UnexpectedResponse {
        channel: &'static str,
        got: &'static str,
    },
}

/// Cloneable sender of host requests. Each method is one round trip.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    calls: mpsc::Sender<HostCall>,
}

impl BridgeClient {
    pub fn new(calls: mpsc::Sender<HostCall>) -> Self {
        Self { calls }
    }

    /// A client plus the receiving end a host serves from
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<HostCall>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    async fn invoke(&self, request: HostRequest) -> Result<HostResponse, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.calls
            .send(HostCall {
                envelope: Envelope::new(request),
                reply,
            })
            .await
            .map_err(|_| BridgeError::Disconnected)?;

        match response.await.map_err(|_| BridgeError::Disconnected)? {
            HostResponse::Rejected { error } => Err(BridgeError::Rejected(error)),
            other => Ok(other),
        }
    }

    pub async fn open_file(&self) -> Result<FileOpenResult, BridgeError> {
        match self.invoke(HostRequest::OpenFile).await? {
            HostResponse::Open(result) => Ok(result),
            other => Err(unexpected("dialog:openFile", &other)),
        }
    }

    pub async fn choose_save_target(&self, default_name: &str) -> Result<SaveTarget, BridgeError> {
        let request = HostRequest::SaveFileAs {
            default_name: default_name.to_string(),
        };
        match self.invoke(request).await? {
            HostResponse::SaveTarget(target) => Ok(target),
            other => Err(unexpected("dialog:saveFileAs", &other)),
        }
    }

    pub async fn write_file(&self, path: &Path, content: &str) -> Result<WriteOutcome, BridgeError> {
        let request = HostRequest::WriteFile {
            path: path.to_path_buf(),
            content: content.to_string(),
        };
        match self.invoke(request).await? {
            HostResponse::Write(outcome) => Ok(outcome),
            other => Err(unexpected("file:write", &other)),
        }
    }
}

fn unexpected(channel: &'static str, response: &HostResponse) -> BridgeError {
    BridgeError::UnexpectedResponse {
        channel,
        got: response.kind(),
    }
}
