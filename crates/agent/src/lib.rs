//! `holdup-agent` library crate.
//!
//! Side-effecting half of HoldUp: NVML sensor, terminal console, the
//! blocking gate loop, and host registration. The CLI entrypoint lives in
//! `main.rs`.

pub mod console;
pub mod gate;
pub mod node;
pub mod sensor;
