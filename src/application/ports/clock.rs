//! Wall clock port

use chrono::{Local, NaiveDateTime};

/// Source of session start timestamps
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> NaiveDateTime;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
