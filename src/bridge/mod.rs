//! Privileged I/O bridge
//!
//! The UI never touches the filesystem. It sends typed requests to a host
//! task over a channel and awaits one typed response per request:
//!
//! - `dialog:openFile` - pick a file and return its text
//! - `dialog:saveFileAs` - pick a save target without writing
//! - `file:write` - write text to a path

mod client;
mod dialogs;
pub mod host;
mod protocol;

pub use client::BridgeClient;
pub use dialogs::FzfDialogs;
pub use protocol::{FileOpenResult, SaveTarget, WriteOutcome};
