//! Fuzz target: `Command::from_str`
//!
//! Parsing must be total, and the transcript text of any parsed command
//! must parse back to the same command.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use tempreport::app::commands::Command;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(cmd) = line.parse::<Command>() {
        if let Some(text) = cmd.record_text() {
            assert_eq!(text.parse::<Command>(), Ok(cmd));
        }
    }
});
