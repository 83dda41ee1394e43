//! Host registration for the HoldUp nodes.
//!
//! Two nodes share one gate implementation: `HoldUp` takes any payload,
//! `HoldUpImage` is typed to image batches so hosts can wire it between
//! image-producing nodes without an adapter.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use holdup_core::clock::{Clock, SystemClock};
use holdup_core::config::{
    GateConfig, TARGET_TEMPERATURE_DEFAULT, TARGET_TEMPERATURE_MAX, TARGET_TEMPERATURE_MIN,
    WAIT_SECONDS_MAX,
};
use holdup_core::error::CoreError;
use holdup_core::host::{
    CachePolicy, HostNode, InputField, NodeArgs, NodeDescriptor, NodeRegistry, SlotType,
};
use holdup_core::sensor::ThermalSensor;

use crate::console::Console;
use crate::gate::CooldownGate;

pub const NODE_NAME: &str = "HoldUp";
pub const IMAGE_NODE_NAME: &str = "HoldUpImage";
pub const CATEGORY: &str = "utils";

pub const INPUT_PAYLOAD: &str = "input";
pub const INPUT_WAIT_FOR_TEMPERATURE: &str = "wait_for_temperature";
pub const INPUT_TARGET_TEMPERATURE: &str = "target_temperature";
pub const INPUT_WAIT_SECONDS: &str = "wait_seconds";

/// Declaration of a HoldUp node whose payload slot has type `slot`.
pub fn descriptor(name: &str, slot: SlotType) -> NodeDescriptor {
    let defaults = GateConfig::default();
    let display_name = match slot {
        SlotType::Image => "Hold Up (Image)",
        _ => "Hold Up",
    };
    NodeDescriptor {
        name: name.to_string(),
        display_name: display_name.to_string(),
        category: CATEGORY.to_string(),
        function: "execute_cool_down".to_string(),
        inputs: vec![
            InputField::payload(INPUT_PAYLOAD, slot),
            InputField::boolean(INPUT_WAIT_FOR_TEMPERATURE, defaults.wait_for_temperature),
            InputField::int(
                INPUT_TARGET_TEMPERATURE,
                i64::from(TARGET_TEMPERATURE_DEFAULT),
                i64::from(TARGET_TEMPERATURE_MIN),
                i64::from(TARGET_TEMPERATURE_MAX),
            ),
            InputField::int(
                INPUT_WAIT_SECONDS,
                i64::from(defaults.wait_seconds),
                0,
                i64::from(WAIT_SECONDS_MAX),
            ),
        ],
        outputs: vec![slot],
        output_node: false,
        cache_policy: CachePolicy::AlwaysRun,
    }
}

/// Read the gate configuration out of host arguments.
pub fn config_from_args(args: &NodeArgs) -> Result<GateConfig, CoreError> {
    let wait_for_temperature = args
        .get(INPUT_WAIT_FOR_TEMPERATURE)
        .and_then(Value::as_bool)
        .ok_or_else(|| missing(INPUT_WAIT_FOR_TEMPERATURE))?;

    let target_temperature = args
        .get(INPUT_TARGET_TEMPERATURE)
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| missing(INPUT_TARGET_TEMPERATURE))?;

    let wait_seconds = args
        .get(INPUT_WAIT_SECONDS)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| missing(INPUT_WAIT_SECONDS))?;

    Ok(GateConfig {
        wait_for_temperature,
        target_temperature,
        wait_seconds,
    })
}

fn missing(field: &str) -> CoreError {
    CoreError::Validation(format!("{field} is missing or has the wrong type"))
}

/// A [`CooldownGate`] exposed through the host contract.
pub struct GateNode<S, C> {
    descriptor: NodeDescriptor,
    gate: Mutex<CooldownGate<S, C>>,
}

impl<S, C> GateNode<S, C>
where
    S: ThermalSensor + Send,
    C: Clock + Send,
{
    pub fn new(descriptor: NodeDescriptor, gate: CooldownGate<S, C>) -> Self {
        Self {
            descriptor,
            gate: Mutex::new(gate),
        }
    }
}

impl<S, C> HostNode for GateNode<S, C>
where
    S: ThermalSensor + Send,
    C: Clock + Send,
{
    fn descriptor(&self) -> &NodeDescriptor {
        &self.descriptor
    }

    fn execute(&self, mut args: NodeArgs) -> Result<Vec<Value>, CoreError> {
        let config = config_from_args(&args)?;
        let payload = args
            .remove(INPUT_PAYLOAD)
            .ok_or_else(|| missing(INPUT_PAYLOAD))?;

        let mut gate = self.gate.lock().map_err(|_| {
            CoreError::Internal(format!("{} gate lock poisoned", self.descriptor.name))
        })?;

        tracing::debug!(
            node = %self.descriptor.name,
            wait_for_temperature = config.wait_for_temperature,
            target_temperature = config.target_temperature,
            wait_seconds = config.wait_seconds,
            "Executing gate",
        );
        Ok(vec![gate.execute(payload, &config)])
    }
}

/// Register `HoldUp` and `HoldUpImage`, both reading from `sensor` and
/// writing to the process console.
pub fn register_nodes<S>(registry: &mut dyn NodeRegistry, sensor: Arc<S>) -> Result<(), CoreError>
where
    S: ThermalSensor + Send + Sync + 'static,
{
    for (name, slot) in [(NODE_NAME, SlotType::Any), (IMAGE_NODE_NAME, SlotType::Image)] {
        let gate = CooldownGate::new(Arc::clone(&sensor), SystemClock, Console::stdio());
        registry.register(Box::new(GateNode::new(descriptor(name, slot), gate)))?;
    }
    Ok(())
}
