//! The cooldown gate: temperature wait, fixed delay, timestamp, passthrough.
//!
//! [`CooldownGate`] blocks the calling thread. It has no cancellation hook
//! and no maximum wait; a GPU that never cools keeps it polling forever.

use chrono::{DateTime, Local};

use holdup_core::clock::{format_timestamp, Clock};
use holdup_core::config::{GateConfig, GateTiming};
use holdup_core::cooldown::{CooldownCycle, PollOutcome};
use holdup_core::messages;
use holdup_core::sensor::{SensorError, ThermalSensor};

use crate::console::Console;

/// How the temperature phase ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureWait {
    /// `wait_for_temperature` was off.
    Skipped,
    /// The sensor reported no devices.
    NoDevices,
    /// Every device reached the target. `peak` is `None` when nothing was
    /// ever above it.
    Cooled { peak: Option<f64>, hot_polls: u32 },
    /// The sensor query failed; the rest of the gate was skipped.
    SensorFailed(SensorError),
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq)]
pub struct GateReport {
    pub temperature: TemperatureWait,
    pub waited_seconds: u32,
    /// Time printed on the completion line; `None` after a sensor failure.
    pub completed_at: Option<DateTime<Local>>,
}

pub struct CooldownGate<S, C> {
    sensor: S,
    clock: C,
    console: Console,
    timing: GateTiming,
}

impl<S: ThermalSensor, C: Clock> CooldownGate<S, C> {
    pub fn new(sensor: S, clock: C, console: Console) -> Self {
        Self {
            sensor,
            clock,
            console,
            timing: GateTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: GateTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Run the gate and hand `input` back untouched.
    pub fn execute<T>(&mut self, input: T, config: &GateConfig) -> T {
        self.run(config);
        input
    }

    /// Run every enabled phase and report the outcome.
    pub fn run(&mut self, config: &GateConfig) -> GateReport {
        let temperature = if config.wait_for_temperature {
            self.wait_for_temperature(config.target_temperature)
        } else {
            TemperatureWait::Skipped
        };

        // A sensor fault returns straight away, without the fixed delay.
        if matches!(temperature, TemperatureWait::SensorFailed(_)) {
            return GateReport {
                temperature,
                waited_seconds: 0,
                completed_at: None,
            };
        }

        if config.wait_seconds > 0 {
            self.countdown(config.wait_seconds);
        }

        let now = self.clock.now();
        self.console.line(&messages::timestamp(&format_timestamp(&now)));
        tracing::info!(completed_at = %now, "Gate released");

        GateReport {
            temperature,
            waited_seconds: config.wait_seconds,
            completed_at: Some(now),
        }
    }

    fn wait_for_temperature(&mut self, target: i32) -> TemperatureWait {
        let target_f = f64::from(target);
        let mut cycle = CooldownCycle::new(target);
        let mut hot_polls = 0u32;

        loop {
            let readings = match self.sensor.read() {
                Ok(readings) => readings,
                Err(e) => {
                    tracing::warn!(error = %e, "GPU sensor query failed -- skipping cool down");
                    self.console.warn(&messages::sensor_failure(&e));
                    return TemperatureWait::SensorFailed(e);
                }
            };

            match cycle.observe(&readings) {
                PollOutcome::Hot {
                    highest,
                    peak,
                    announce,
                } => {
                    hot_polls += 1;
                    if announce {
                        tracing::info!(highest, target, "GPU above target, cooling down");
                        self.console.line(&messages::cooling_started(highest, target));
                    }
                    tracing::debug!(highest, peak, hot_polls, "GPU still above target");
                    self.console.redraw(&messages::cooling_progress(
                        highest,
                        target_f,
                        peak,
                        self.timing.bar_width,
                    ));
                    self.clock.sleep(self.timing.poll_interval);
                }
                PollOutcome::Cooled { finished_peak } => {
                    if let Some(peak) = finished_peak {
                        self.console.redraw(&messages::cooling_progress(
                            target_f,
                            target_f,
                            peak,
                            self.timing.bar_width,
                        ));
                        self.console.line(messages::cooling_complete());
                        tracing::info!(peak, hot_polls, "GPU cool down complete");
                    }
                    return TemperatureWait::Cooled {
                        peak: finished_peak,
                        hot_polls,
                    };
                }
                PollOutcome::NoDevices => {
                    tracing::debug!("No GPUs reported, nothing to cool");
                    return TemperatureWait::NoDevices;
                }
            }
        }
    }

    fn countdown(&mut self, total: u32) {
        tracing::debug!(seconds = total, "Starting fixed delay");
        for remaining in (1..=total).rev() {
            self.console.redraw(&messages::countdown(remaining, total));
            self.clock.sleep(self.timing.countdown_tick);
        }
        self.console.line(&messages::countdown_done(total));
    }
}
