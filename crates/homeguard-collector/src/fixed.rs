use crate::error::{Result, SensorError};
use crate::SensorSource;
use async_trait::async_trait;
use chrono::Utc;
use homeguard_common::types::{SensorReading, SensorUnit};
use std::collections::BTreeMap;
use std::sync::Mutex;

struct FixedState {
    values: BTreeMap<String, (f64, SensorUnit)>,
    unavailable: bool,
}

/// Sensor source returning operator-set values.
///
/// Used for demos, bench setups with manually driven inputs, and tests.
/// Values persist until changed; [`FixedSensors::set_unavailable`] simulates
/// a disconnected bank.
pub struct FixedSensors {
    state: Mutex<FixedState>,
}

impl FixedSensors {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FixedState {
                values: BTreeMap::new(),
                unavailable: false,
            }),
        }
    }

    pub fn with(self, sensor: &str, value: f64, unit: SensorUnit) -> Self {
        self.set(sensor, value, unit);
        self
    }

    pub fn set(&self, sensor: &str, value: f64, unit: SensorUnit) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.values.insert(sensor.to_string(), (value, unit));
    }

    /// Removes a sensor. Returns true if it was present.
    pub fn remove(&self, sensor: &str) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.values.remove(sensor).is_some()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.unavailable = unavailable;
    }
}

impl Default for FixedSensors {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SensorSource for FixedSensors {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn read_all(&self) -> Result<SensorReading> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.unavailable {
            return Err(SensorError::Unavailable {
                source_name: self.name().to_string(),
                reason: "marked unavailable".to_string(),
            });
        }

        let mut reading = SensorReading::new(Utc::now());
        for (sensor, (value, unit)) in &state.values {
            reading.insert(sensor, *value, *unit);
        }
        Ok(reading)
    }
}
