//! Thermal sensor seam.
//!
//! The gate polls a [`ThermalSensor`] once per iteration. Implementations
//! must return a fresh reading every call; nothing is cached between polls.

/// One device temperature sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceReading {
    pub device_index: u32,
    /// Marketing name when the driver reports one.
    pub name: Option<String>,
    pub temperature_celsius: f64,
}

impl DeviceReading {
    pub fn new(device_index: u32, temperature_celsius: f64) -> Self {
        Self {
            device_index,
            name: None,
            temperature_celsius,
        }
    }
}

/// Why a sensor query could not produce a reading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SensorError {
    /// The monitoring library could not be loaded (missing drivers, no permission).
    #[error("sensor backend unavailable: {0}")]
    Unavailable(String),

    /// The backend loaded but a query against it failed.
    #[error("sensor query failed: {0}")]
    Query(String),
}

/// Source of GPU temperature readings.
pub trait ThermalSensor {
    /// Read every present device. An empty vec means no devices.
    fn read(&self) -> Result<Vec<DeviceReading>, SensorError>;
}

impl<S: ThermalSensor + ?Sized> ThermalSensor for &S {
    fn read(&self) -> Result<Vec<DeviceReading>, SensorError> {
        (**self).read()
    }
}

impl<S: ThermalSensor + ?Sized> ThermalSensor for Box<S> {
    fn read(&self) -> Result<Vec<DeviceReading>, SensorError> {
        (**self).read()
    }
}

impl<S: ThermalSensor + ?Sized> ThermalSensor for std::sync::Arc<S> {
    fn read(&self) -> Result<Vec<DeviceReading>, SensorError> {
        (**self).read()
    }
}
