//! Source of "now" for snapshot names

use chrono::{DateTime, Local};

/// Supplies the current local time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
