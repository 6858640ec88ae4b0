//! Transport-agnostic command link.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Link Stack                          │
//! │                                                          │
//! │  ┌───────────┐   ┌───────────┐   ┌────────────────────┐  │
//! │  │ Transport │──▶│  Framer   │──▶│ Command dispatch   │  │
//! │  │ (trait)   │   │ (lines)   │   │ → Reporter         │  │
//! │  └───────────┘   └───────────┘   └────────────────────┘  │
//! │       ▲                                    │             │
//! │       └──────── emissions, SHUTDOWN ◀──────┘             │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod framer;
pub mod transport;
