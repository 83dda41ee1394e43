//! Domain logic for the HoldUp cooldown gate.
//!
//! Everything in this crate is pure: no NVML, no terminal, no sleeping.
//! Side effects are reached through the [`sensor::ThermalSensor`] and
//! [`clock::Clock`] seams, which the `holdup-agent` crate implements.

pub mod clock;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod host;
pub mod messages;
pub mod progress;
pub mod sensor;
