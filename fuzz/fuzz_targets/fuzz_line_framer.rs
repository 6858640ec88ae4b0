//! Fuzz target: `LineFramer::feed`
//!
//! Splits arbitrary input at a fuzzer-chosen point and feeds both halves.
//! The framer must never panic, never yield a line longer than the cap,
//! and must accept bytes cleanly again after a reset.
//!
//! cargo fuzz run fuzz_line_framer

#![no_main]

use libfuzzer_sys::fuzz_target;
use tempreport::link::framer::{LineFramer, MAX_LINE_LEN};

fuzz_target!(|data: &[u8]| {
    let Some((&cut, rest)) = data.split_first() else {
        return;
    };
    let cut = usize::from(cut).min(rest.len());
    let (head, tail) = rest.split_at(cut);

    let mut framer = LineFramer::new();
    let check = |line: tempreport::link::framer::CommandLine| {
        assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
        assert!(!line.contains('\n'), "terminator leaked into a line");
    };

    if framer.feed(head, check).is_ok() {
        let _ = framer.feed(tail, check);
    }
    assert!(framer.pending_len() <= MAX_LINE_LEN + 1, "content plus one CR");

    framer.reset();
    assert_eq!(framer.pending_len(), 0);
    let _ = framer.feed(b"START\n", check);
});
