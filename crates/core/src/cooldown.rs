//! Cooldown cycle state machine.
//!
//! One [`CooldownCycle`] lives for one gate invocation. Each sensor poll is
//! fed to [`CooldownCycle::observe`], which advances the state and tells the
//! caller what to render and whether to keep polling.
//!
//! ```text
//! Idle ──hot──▶ Cooling{peak, announced} ──cool──▶ Cooled
//!   │                 ▲        │
//!   │                 └──hot───┘   (peak only ever rises)
//!   └──cool / no devices──────────▶ Cooled
//! ```

use crate::sensor::DeviceReading;

/// Where the current invocation is in its cooldown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CooldownState {
    /// No poll observed yet.
    Idle,
    /// At least one device is above target.
    Cooling {
        /// Highest reading seen since this hot cycle began.
        peak: f64,
        /// Whether the start-of-cooling notice has been emitted.
        announced: bool,
    },
    /// Every device is at or below target (or there are none).
    Cooled,
}

/// What a single poll means for the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// Keep waiting. `announce` is set on the first hot poll of a cycle.
    Hot {
        highest: f64,
        peak: f64,
        announce: bool,
    },
    /// Stop waiting. `finished_peak` is set when a hot cycle just ended.
    Cooled { finished_peak: Option<f64> },
    /// The sensor reported no devices; stop waiting.
    NoDevices,
}

#[derive(Debug, Clone)]
pub struct CooldownCycle {
    target: i32,
    state: CooldownState,
}

impl CooldownCycle {
    pub fn new(target: i32) -> Self {
        Self {
            target,
            state: CooldownState::Idle,
        }
    }

    pub fn state(&self) -> CooldownState {
        self.state
    }

    /// Peak of the hot cycle in progress, if any.
    pub fn peak(&self) -> Option<f64> {
        match self.state {
            CooldownState::Cooling { peak, .. } => Some(peak),
            _ => None,
        }
    }

    /// Advance the cycle with one fresh set of readings.
    pub fn observe(&mut self, readings: &[DeviceReading]) -> PollOutcome {
        if readings.is_empty() {
            self.state = CooldownState::Cooled;
            return PollOutcome::NoDevices;
        }

        let target = f64::from(self.target);
        let highest = readings
            .iter()
            .map(|r| r.temperature_celsius)
            .fold(f64::NEG_INFINITY, f64::max);
        let any_too_hot = readings.iter().any(|r| r.temperature_celsius > target);

        if !any_too_hot {
            let finished_peak = self.peak();
            self.state = CooldownState::Cooled;
            return PollOutcome::Cooled { finished_peak };
        }

        let (peak, announce) = match self.state {
            CooldownState::Cooling { peak, announced } => (peak.max(highest), !announced),
            CooldownState::Idle | CooldownState::Cooled => (highest, true),
        };
        self.state = CooldownState::Cooling {
            peak,
            announced: true,
        };

        PollOutcome::Hot {
            highest,
            peak,
            announce,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn readings(temps: &[f64]) -> Vec<DeviceReading> {
        temps
            .iter()
            .enumerate()
            .map(|(i, t)| DeviceReading::new(i as u32, *t))
            .collect()
    }

    #[test]
    fn starts_idle() {
        let cycle = CooldownCycle::new(50);
        assert_eq!(cycle.state(), CooldownState::Idle);
        assert_eq!(cycle.peak(), None);
    }

    #[test]
    fn peak_tracks_worst_reading_in_cycle() {
        let mut cycle = CooldownCycle::new(50);
        let peaks: Vec<f64> = [55.0, 60.0, 58.0, 62.0]
            .iter()
            .map(|t| match cycle.observe(&readings(&[*t])) {
                PollOutcome::Hot { peak, .. } => peak,
                other => panic!("Expected Hot, got {other:?}"),
            })
            .collect();
        assert_eq!(peaks, vec![55.0, 60.0, 60.0, 62.0]);
    }

    #[test]
    fn announces_only_on_first_hot_poll() {
        let mut cycle = CooldownCycle::new(50);
        assert_matches!(
            cycle.observe(&readings(&[70.0])),
            PollOutcome::Hot { announce: true, .. }
        );
        assert_matches!(
            cycle.observe(&readings(&[68.0])),
            PollOutcome::Hot { announce: false, .. }
        );
        assert_eq!(
            cycle.state(),
            CooldownState::Cooling {
                peak: 70.0,
                announced: true
            }
        );
    }

    #[test]
    fn any_device_above_target_is_hot() {
        let mut cycle = CooldownCycle::new(50);
        let outcome = cycle.observe(&readings(&[40.0, 51.0, 45.0]));
        assert_matches!(outcome, PollOutcome::Hot { highest, .. } if highest == 51.0);
    }

    #[test]
    fn reading_equal_to_target_is_cool() {
        let mut cycle = CooldownCycle::new(50);
        assert_eq!(
            cycle.observe(&readings(&[50.0, 49.0])),
            PollOutcome::Cooled {
                finished_peak: None
            }
        );
        assert_eq!(cycle.state(), CooldownState::Cooled);
    }

    #[test]
    fn cooling_reports_finished_peak_and_resets() {
        let mut cycle = CooldownCycle::new(50);
        cycle.observe(&readings(&[70.0]));
        cycle.observe(&readings(&[70.0]));
        let outcome = cycle.observe(&readings(&[40.0]));
        assert_eq!(
            outcome,
            PollOutcome::Cooled {
                finished_peak: Some(70.0)
            }
        );
        assert_eq!(cycle.peak(), None);
    }

    #[test]
    fn empty_reading_means_no_devices() {
        let mut cycle = CooldownCycle::new(50);
        let outcome = cycle.observe(&[]);
        assert_eq!(outcome, PollOutcome::NoDevices);
        assert_eq!(cycle.state(), CooldownState::Cooled);
    }

    #[test]
    fn new_hot_cycle_after_cooled_announces_again() {
        let mut cycle = CooldownCycle::new(50);
        cycle.observe(&readings(&[80.0]));
        cycle.observe(&readings(&[45.0]));
        assert_matches!(
            cycle.observe(&readings(&[60.0])),
            PollOutcome::Hot {
                peak,
                announce: true,
                ..
            } if peak == 60.0
        );
    }
}
