//! Deterministic fakes for gate tests.
//!
//! A [`Journal`] records console writes and clock sleeps in one ordered
//! log so tests can assert the exact interleaving.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

use holdup_agent::console::Console;
use holdup_core::clock::Clock;
use holdup_core::sensor::{DeviceReading, SensorError, ThermalSensor};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Out(String),
    Err(String),
    Sleep(Duration),
}

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sleep(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn stdout(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Out(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn stderr(&self) -> String {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Err(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn console(&self) -> Console {
        Console::new(
            Box::new(JournalWriter {
                journal: self.clone(),
                to_stderr: false,
            }),
            Box::new(JournalWriter {
                journal: self.clone(),
                to_stderr: true,
            }),
        )
    }

    pub fn clock(&self) -> FakeClock {
        FakeClock {
            journal: self.clone(),
            now: fixed_now(),
        }
    }

    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }
}

struct JournalWriter {
    journal: Journal,
    to_stderr: bool,
}

impl Write for JournalWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let text = String::from_utf8_lossy(buf).into_owned();
        self.journal.push(if self.to_stderr {
            Event::Err(text)
        } else {
            Event::Out(text)
        });
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// The instant every fake clock reports.
pub fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap()
}

pub const FIXED_TIMESTAMP_LINE: &str = "\r***** 2024-05-01 12:30:45\n";

/// Records sleeps instead of blocking.
pub struct FakeClock {
    journal: Journal,
    now: DateTime<Local>,
}

impl Clock for FakeClock {
    fn sleep(&self, duration: Duration) {
        self.journal.push(Event::Sleep(duration));
    }

    fn now(&self) -> DateTime<Local> {
        self.now
    }
}

/// Replays a fixed list of poll results. Polling past the end panics.
pub struct ScriptedSensor {
    script: Mutex<VecDeque<Result<Vec<DeviceReading>, SensorError>>>,
    polls: AtomicU32,
}

impl ScriptedSensor {
    pub fn new(script: Vec<Result<Vec<DeviceReading>, SensorError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            polls: AtomicU32::new(0),
        }
    }

    /// One single-GPU reading per poll.
    pub fn single_gpu(temps: &[f64]) -> Self {
        Self::new(temps.iter().map(|t| Ok(vec![DeviceReading::new(0, *t)])).collect())
    }

    /// Several GPUs per poll.
    pub fn multi_gpu(polls: &[&[f64]]) -> Self {
        Self::new(
            polls
                .iter()
                .map(|temps| {
                    Ok(temps
                        .iter()
                        .enumerate()
                        .map(|(i, t)| DeviceReading::new(i as u32, *t))
                        .collect())
                })
                .collect(),
        )
    }

    pub fn failing(message: &str) -> Self {
        Self::new(vec![Err(SensorError::Unavailable(message.to_string()))])
    }

    /// A sensor that must never be polled.
    pub fn unused() -> Self {
        Self::new(Vec::new())
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

impl ThermalSensor for ScriptedSensor {
    fn read(&self) -> Result<Vec<DeviceReading>, SensorError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("sensor polled more often than scripted")
    }
}
