//! Application core: session rules with no direct I/O.
//!
//! This module holds the business rules of a reporting session: command
//! parsing, the pause / interval / unit state, the transcript, and the
//! event loop that ties them together.  All interaction with the sensor,
//! the clock, the log file and the peer happens through **port traits**
//! defined in [`ports`] and [`crate::link::transport`], keeping this layer
//! fully testable without real devices or sockets.

pub mod commands;
pub mod ports;
pub mod service;
pub mod state;
pub mod transcript;
