//! API modules for the `ocide` namespace
//!
//! Each submodule provides functions under `ocide::<module>::*`

pub mod config;
