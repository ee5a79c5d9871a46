//! Request/response contract between the UI and the privileged host
//!
//! Every request travels in a versioned envelope. Outcomes are plain values:
//! a canceled dialog or a failed write is a normal response, never a fault
//! on the caller's side.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Protocol version spoken by this build
pub const PROTOCOL_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "channel", content = "args")]
pub enum HostRequest {
    #[serde(rename = "dialog:openFile")]
    OpenFile,
    #[serde(rename = "dialog:saveFileAs", rename_all = "camelCase")]
    SaveFileAs { default_name: String },
    #[serde(rename = "file:write")]
    WriteFile { path: PathBuf, content: String },
}

impl HostRequest {
    pub fn channel(&self) -> &'static str {
        match self {
            HostRequest::OpenFile => "dialog:openFile",
            HostRequest::SaveFileAs { .. } => "dialog:saveFileAs",
            HostRequest::WriteFile { .. } => "file:write",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    pub version: u16,
    pub request: HostRequest,
}

impl Envelope {
    pub fn new(request: HostRequest) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            request,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOpenResult {
    Canceled,
    Opened { path: PathBuf, content: String },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveTarget {
    Canceled,
    #[serde(rename_all = "camelCase")]
    Chosen { file_path: PathBuf },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome {
    Written { path: PathBuf },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostResponse {
    Open(FileOpenResult),
    SaveTarget(SaveTarget),
    Write(WriteOutcome),
    /// The host refused the envelope itself
    Rejected { error: String },
}

impl HostResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            HostResponse::Open(_) => "open",
            HostResponse::SaveTarget(_) => "save_target",
            HostResponse::Write(_) => "write",
            HostResponse::Rejected { .. } => "rejected",
        }
    }
}

/// One in-flight request on the host channel
#[derive(Debug)]
pub struct HostCall {
    pub envelope: Envelope,
    pub reply: oneshot::Sender<HostResponse>,
}
