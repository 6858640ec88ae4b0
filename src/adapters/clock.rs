//! Host wall clock.

use std::time::{Duration, Instant};

use chrono::{Local, NaiveTime};

use crate::app::ports::Clock;
use crate::shutdown::ShutdownTrigger;

/// Longest stretch the interval sleep goes without checking the trigger.
pub const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Local time of day for stamps, sliced `thread::sleep` for the interval.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }

    fn sleep(&mut self, duration: Duration, cancel: &ShutdownTrigger) {
        let deadline = Instant::now() + duration;
        while !cancel.is_requested() {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            std::thread::sleep(left.min(SLEEP_SLICE));
        }
    }
}
