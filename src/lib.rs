//! tempreport library.
//!
//! Exposes the reporting core, the line protocol and the host adapters for
//! integration testing and embedding.  The binary in `main.rs` only wires
//! command-line configuration to these pieces.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod link;
pub mod sensors;
pub mod shutdown;

pub use error::{Error, Result};
