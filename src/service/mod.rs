//! Clients for the external execution service
//!
//! The service runs DSL source (`POST /run`) and lists the functions it
//! knows (`GET /functions`). Its interpreter is opaque to the shell; only the
//! wire contract lives here.

mod client;
mod directory;
mod dispatch;
mod error;

pub use client::{DEFAULT_SERVICE_URL, ServiceClient};
pub use directory::FunctionDirectory;
pub use dispatch::{Executor, RunResult};
pub use error::ServiceError;
