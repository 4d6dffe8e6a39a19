use crate::error::{Result, SensorError};
use crate::SensorSource;
use async_trait::async_trait;
use chrono::Utc;
use homeguard_common::types::{SensorReading, SensorUnit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Sensors produced by [`SimulatedSensors`] with their value ranges.
pub const SIMULATED_SENSORS: &[(&str, f64, f64, SensorUnit)] = &[
    ("pir", 0.0, 1.0, SensorUnit::Ratio),
    ("magnetic", 0.0, 1.0, SensorUnit::Ratio),
    ("vibration", 0.0, 100.0, SensorUnit::Percent),
    ("smoke", 0.0, 400.0, SensorUnit::Ppm),
    ("sound", 30.0, 110.0, SensorUnit::Decibel),
];

/// Random household sensor bank standing in for real hardware.
///
/// Values are drawn uniformly from [`SIMULATED_SENSORS`]. A seed makes the
/// sequence reproducible; `failure_rate` is the probability that a read
/// reports the bank as unavailable.
pub struct SimulatedSensors {
    rng: Mutex<StdRng>,
    failure_rate: f64,
}

impl SimulatedSensors {
    pub fn new(seed: Option<u64>, failure_rate: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl SensorSource for SimulatedSensors {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn read_all(&self) -> Result<SensorReading> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        if self.failure_rate > 0.0 && rng.gen_bool(self.failure_rate) {
            return Err(SensorError::Unavailable {
                source_name: self.name().to_string(),
                reason: "simulated bus timeout".to_string(),
            });
        }

        let mut reading = SensorReading::new(Utc::now());
        for &(sensor, min, max, unit) in SIMULATED_SENSORS {
            reading.insert(sensor, rng.gen_range(min..=max), unit);
        }

        tracing::trace!(sensors = reading.len(), "Simulated sensors read");
        Ok(reading)
    }
}
