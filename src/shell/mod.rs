//! Shell controller: wires key-level actions to the language tooling, the
//! execution service and the file bridge, and owns everything they change.

mod controller;
mod functions;
mod output;

pub use controller::{Services, Shell, ShellAction};
pub use functions::{FunctionPanel, LOAD_FAILED_NOTICE};
pub use output::OutputPanel;
