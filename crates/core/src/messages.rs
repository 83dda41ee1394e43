//! Console line formats.
//!
//! Lines starting with `\r` overwrite the current terminal line; callers
//! decide whether a trailing newline follows.

use crate::progress::{cooldown_fraction, render_bar};

/// Printed once when a hot cycle starts.
pub fn cooling_started(highest: f64, target: i32) -> String {
    format!(
        "***** GPU temperature ({highest:.1}°C) exceeds target ({target}°C). Initiating cool down..."
    )
}

/// In-place progress line for the current poll.
pub fn cooling_progress(current: f64, target: f64, peak: f64, bar_width: usize) -> String {
    let bar = render_bar(cooldown_fraction(current, target, peak), bar_width);
    format!(
        "\r***** Cooling GPUs: Peak: {peak:.1}°C |{bar}| {current:.1}°C / {target:.1}°C      "
    )
}

pub fn cooling_complete() -> &'static str {
    "\n***** GPU cool down complete. Temperature is at or below target."
}

/// Warning written to stderr when the sensor query fails.
pub fn sensor_failure(error: &dyn std::fmt::Display) -> String {
    format!("\nError accessing GPU information: {error}. Skipping cool down.")
}

pub fn countdown(remaining: u32, total: u32) -> String {
    format!("\r***** Waiting: {remaining} / {total} seconds    ")
}

pub fn countdown_done(total: u32) -> String {
    format!("\r***** Waited: {total} seconds         ")
}

pub fn timestamp(formatted: &str) -> String {
    format!("\r***** {formatted}")
}
