//! Time seam: blocking sleep plus local wall-clock time.

use std::time::Duration;

use chrono::{DateTime, Local};

/// Format used for the completion timestamp line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait Clock {
    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);

    fn now(&self) -> DateTime<Local>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }

    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }

    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }
}

/// Real clock backed by the OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Render a timestamp the way the completion line shows it.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_uses_date_and_seconds() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(&at), "2024-03-09 07:05:01");
    }
}
