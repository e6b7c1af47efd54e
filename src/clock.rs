//! Time source for participant timestamps and message times.
//!
//! Handlers and the reaper never read the system time directly; they go
//! through a [`Clock`] so tests can pin "now" and move it forward.

use std::{
    fmt::Debug,
    sync::atomic::{AtomicI64, Ordering},
};

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

const TIME_OF_DAY: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

pub trait Clock: Send + Sync + Debug {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Wall-clock time formatted as `HH:MM:SS`.
    fn now_time_of_day(&self) -> String;
}

/// Real time. Uses the local offset when the platform can report it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
    }

    fn now_time_of_day(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        format_time_of_day(now)
    }
}

/// Manually driven clock for tests. Time only moves through [`FixedClock::set`]
/// and [`FixedClock::advance`]; the time of day is rendered in UTC.
#[derive(Debug)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn now_time_of_day(&self) -> String {
        let nanos = self.now_millis() as i128 * 1_000_000;
        let at = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
            .to_offset(UtcOffset::UTC);
        format_time_of_day(at)
    }
}

fn format_time_of_day(at: OffsetDateTime) -> String {
    // the description only has hour/minute/second, which every OffsetDateTime carries
    at.format(TIME_OF_DAY).unwrap_or_else(|_| {
        format!("{:02}:{:02}:{:02}", at.hour(), at.minute(), at.second())
    })
}
