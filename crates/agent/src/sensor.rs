//! NVML-backed thermal sensor.
//!
//! [`NvmlSensor`] initialises the NVIDIA Management Library once and reads
//! the core temperature of every visible GPU on each poll.
//!
//! Initialisation failure is **not** fatal here: the sensor is still
//! constructed, and every [`ThermalSensor::read`] reports
//! [`SensorError::Unavailable`] so the gate can skip its cooldown.

use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::Nvml;

use holdup_core::sensor::{DeviceReading, SensorError, ThermalSensor};

pub struct NvmlSensor {
    /// `Err` holds the init failure message (no drivers / no GPU).
    nvml: Result<Nvml, String>,
}

impl Default for NvmlSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl NvmlSensor {
    /// Attempt to initialise NVML.
    pub fn new() -> Self {
        let nvml = match Nvml::init() {
            Ok(nvml) => {
                tracing::info!("NVML initialised successfully");
                Ok(nvml)
            }
            Err(e) => {
                tracing::warn!(error = %e, "NVML unavailable -- GPU temperature cannot be read");
                Err(e.to_string())
            }
        };
        Self { nvml }
    }

    pub fn is_available(&self) -> bool {
        self.nvml.is_ok()
    }

    /// Number of GPUs visible to NVML, or 0 if NVML is unavailable.
    pub fn gpu_count(&self) -> u32 {
        self.nvml
            .as_ref()
            .ok()
            .and_then(|nvml| nvml.device_count().ok())
            .unwrap_or(0)
    }

    fn read_device(nvml: &Nvml, idx: u32) -> Result<DeviceReading, nvml_wrapper::error::NvmlError> {
        let device = nvml.device_by_index(idx)?;
        let temperature = device.temperature(TemperatureSensor::Gpu)?;

        Ok(DeviceReading {
            device_index: idx,
            name: device.name().ok(),
            temperature_celsius: f64::from(temperature),
        })
    }
}

impl ThermalSensor for NvmlSensor {
    /// A failure on any single device fails the whole read: a partial
    /// reading cannot prove that every GPU is cool.
    fn read(&self) -> Result<Vec<DeviceReading>, SensorError> {
        let nvml = self
            .nvml
            .as_ref()
            .map_err(|msg| SensorError::Unavailable(msg.clone()))?;

        let device_count = nvml
            .device_count()
            .map_err(|e| SensorError::Query(format!("device count: {e}")))?;

        (0..device_count)
            .map(|idx| {
                Self::read_device(nvml, idx)
                    .map_err(|e| SensorError::Query(format!("GPU {idx}: {e}")))
            })
            .collect()
    }
}
