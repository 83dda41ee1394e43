//! `holdup` -- wait for the GPUs to cool down, then exit.
//!
//! Runs one cooldown gate invocation outside a workflow host, e.g. between
//! two GPU jobs in a shell script.
//!
//! # Environment variables
//!
//! | Variable                      | Required | Default | Description                          |
//! |-------------------------------|----------|---------|--------------------------------------|
//! | `HOLDUP_WAIT_FOR_TEMPERATURE` | no       | `true`  | Block until every GPU is cool enough |
//! | `HOLDUP_TARGET_TEMPERATURE`   | no       | `50`    | Target in °C, 45..=90                |
//! | `HOLDUP_WAIT_SECONDS`         | no       | `0`     | Extra fixed delay, 0..=120           |
//! | `RUST_LOG`                    | no       | `holdup=info` | Log filter (logs go to stderr) |

use holdup_agent::console::Console;
use holdup_agent::gate::{CooldownGate, TemperatureWait};
use holdup_agent::sensor::NvmlSensor;
use holdup_core::clock::SystemClock;
use holdup_core::config::GateConfig;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit code used when interrupted by Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holdup=info,holdup_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = GateConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        wait_for_temperature = config.wait_for_temperature,
        target_temperature = config.target_temperature,
        wait_seconds = config.wait_seconds,
        "Starting holdup",
    );

    let sensor = NvmlSensor::new();
    tracing::info!(gpu_count = sensor.gpu_count(), "GPU detection complete");

    // The gate blocks its thread, so it runs off the async workers and
    // races Ctrl-C from here.
    let gate_task = tokio::task::spawn_blocking(move || {
        let mut gate = CooldownGate::new(sensor, SystemClock, Console::stdio());
        gate.run(&config)
    });

    tokio::select! {
        joined = gate_task => match joined {
            Ok(report) => {
                if let TemperatureWait::SensorFailed(e) = &report.temperature {
                    tracing::warn!(error = %e, "Finished without a temperature wait");
                }
                tracing::debug!(?report, "Gate finished");
            }
            Err(e) => {
                tracing::error!(error = %e, "Gate task panicked");
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, exiting before the gate released");
            std::process::exit(EXIT_INTERRUPTED);
        }
    }
}
