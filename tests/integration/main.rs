//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that drives the reporter against
//! scripted adapters.  Everything runs on the host with virtual time; no
//! sensor, terminal or socket is required.

mod command_tests;
mod mock_io;
