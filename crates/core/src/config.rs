//! Per-invocation gate configuration.
//!
//! [`GateConfig`] carries the three user-facing fields of the node.
//! [`GateTiming`] carries the cadences, which are fixed in the node UI
//! but injectable so tests and the CLI can shorten them.

use std::time::Duration;

use validator::Validate;

use crate::error::CoreError;

/// Lowest target temperature the node accepts, in degrees Celsius.
pub const TARGET_TEMPERATURE_MIN: i32 = 45;
/// Highest target temperature the node accepts, in degrees Celsius.
pub const TARGET_TEMPERATURE_MAX: i32 = 90;
/// Default target temperature, in degrees Celsius.
pub const TARGET_TEMPERATURE_DEFAULT: i32 = 50;

/// Upper bound on the fixed delay, in seconds.
pub const WAIT_SECONDS_MAX: u32 = 120;

/// Environment variable toggling the temperature wait.
pub const ENV_WAIT_FOR_TEMPERATURE: &str = "HOLDUP_WAIT_FOR_TEMPERATURE";
/// Environment variable holding the target temperature.
pub const ENV_TARGET_TEMPERATURE: &str = "HOLDUP_TARGET_TEMPERATURE";
/// Environment variable holding the fixed delay.
pub const ENV_WAIT_SECONDS: &str = "HOLDUP_WAIT_SECONDS";

/// User-facing configuration for one gate invocation.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct GateConfig {
    /// Block until every GPU is at or below `target_temperature`.
    pub wait_for_temperature: bool,
    #[validate(range(min = TARGET_TEMPERATURE_MIN, max = TARGET_TEMPERATURE_MAX))]
    pub target_temperature: i32,
    /// Extra fixed delay after the temperature wait. Zero disables it.
    #[validate(range(max = WAIT_SECONDS_MAX))]
    pub wait_seconds: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            wait_for_temperature: true,
            target_temperature: TARGET_TEMPERATURE_DEFAULT,
            wait_seconds: 0,
        }
    }
}

impl GateConfig {
    /// Check the declared field bounds.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `HOLDUP_WAIT_FOR_TEMPERATURE`  | `true`  |
    /// | `HOLDUP_TARGET_TEMPERATURE`    | `50`    |
    /// | `HOLDUP_WAIT_SECONDS`          | `0`     |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, then validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let wait_for_temperature = match lookup(ENV_WAIT_FOR_TEMPERATURE) {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                CoreError::Validation(format!(
                    "{ENV_WAIT_FOR_TEMPERATURE} must be a boolean, got {raw:?}"
                ))
            })?,
            None => defaults.wait_for_temperature,
        };

        let target_temperature = match lookup(ENV_TARGET_TEMPERATURE) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                CoreError::Validation(format!(
                    "{ENV_TARGET_TEMPERATURE} must be an integer, got {raw:?}"
                ))
            })?,
            None => defaults.target_temperature,
        };

        let wait_seconds = match lookup(ENV_WAIT_SECONDS) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                CoreError::Validation(format!(
                    "{ENV_WAIT_SECONDS} must be a non-negative integer, got {raw:?}"
                ))
            })?,
            None => defaults.wait_seconds,
        };

        let config = Self {
            wait_for_temperature,
            target_temperature,
            wait_seconds,
        };
        config.check()?;
        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Cadences and rendering width used by the gate loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTiming {
    /// Sleep between sensor polls while any GPU is too hot.
    pub poll_interval: Duration,
    /// Sleep between countdown redraws.
    pub countdown_tick: Duration,
    /// Number of cells in the progress bar.
    pub bar_width: usize,
}

impl Default for GateTiming {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            countdown_tick: Duration::from_secs(1),
            bar_width: 50,
        }
    }
}
