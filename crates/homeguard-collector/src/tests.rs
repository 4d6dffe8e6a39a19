use crate::error::SensorError;
use crate::fixed::FixedSensors;
use crate::simulated::{SimulatedSensors, SIMULATED_SENSORS};
use crate::{read_with_timeout, SensorSource};
use async_trait::async_trait;
use chrono::Utc;
use homeguard_common::types::{SensorReading, SensorUnit};
use std::time::Duration;

struct SlowSource {
    delay: Duration,
}

#[async_trait]
impl SensorSource for SlowSource {
    fn name(&self) -> &str {
        "slow"
    }

    async fn read_all(&self) -> crate::error::Result<SensorReading> {
        tokio::time::sleep(self.delay).await;
        Ok(SensorReading::new(Utc::now()).with("pir", 0.1, SensorUnit::Ratio))
    }
}

#[tokio::test]
async fn simulated_readings_stay_in_range() {
    let sensors = SimulatedSensors::new(Some(42), 0.0);
    for _ in 0..50 {
        let reading = sensors.read_all().await.unwrap();
        assert_eq!(reading.len(), SIMULATED_SENSORS.len());
        for &(name, min, max, unit) in SIMULATED_SENSORS {
            let value = reading.get(name).unwrap();
            assert!(
                value.value >= min && value.value <= max,
                "{name} out of range: {}",
                value.value
            );
            assert_eq!(value.unit, unit);
        }
    }
}

#[tokio::test]
async fn simulated_seed_is_reproducible() {
    let a = SimulatedSensors::new(Some(7), 0.0);
    let b = SimulatedSensors::new(Some(7), 0.0);
    for _ in 0..5 {
        let ra = a.read_all().await.unwrap();
        let rb = b.read_all().await.unwrap();
        assert_eq!(ra.value("pir"), rb.value("pir"));
        assert_eq!(ra.value("vibration"), rb.value("vibration"));
    }
}

#[tokio::test]
async fn simulated_full_failure_rate_is_unavailable() {
    let sensors = SimulatedSensors::new(Some(1), 1.0);
    let err = sensors.read_all().await.unwrap_err();
    assert!(matches!(err, SensorError::Unavailable { .. }));
}

#[tokio::test]
async fn fixed_sensors_report_set_values() {
    let sensors = FixedSensors::new()
        .with("pir", 0.82, SensorUnit::Ratio)
        .with("vibration", 40.0, SensorUnit::Percent);

    let reading = sensors.read_all().await.unwrap();
    assert_eq!(reading.value("pir"), Some(0.82));

    sensors.set("pir", 0.1, SensorUnit::Ratio);
    assert!(sensors.remove("vibration"));
    let reading = sensors.read_all().await.unwrap();
    assert_eq!(reading.value("pir"), Some(0.1));
    assert_eq!(reading.value("vibration"), None);
}

#[tokio::test]
async fn fixed_sensors_can_be_unavailable() {
    let sensors = FixedSensors::new().with("pir", 0.5, SensorUnit::Ratio);
    sensors.set_unavailable(true);
    assert!(sensors.read_all().await.is_err());
    sensors.set_unavailable(false);
    assert!(sensors.read_all().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn read_with_timeout_reports_slow_source() {
    let source = SlowSource {
        delay: Duration::from_secs(10),
    };
    let err = read_with_timeout(&source, Duration::from_secs(3))
        .await
        .unwrap_err();
    match err {
        SensorError::Timeout {
            source_name,
            timeout_ms,
        } => {
            assert_eq!(source_name, "slow");
            assert_eq!(timeout_ms, 3000);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn read_with_timeout_passes_fast_source() {
    let source = SlowSource {
        delay: Duration::from_millis(100),
    };
    let reading = read_with_timeout(&source, Duration::from_secs(3))
        .await
        .unwrap();
    assert_eq!(reading.value("pir"), Some(0.1));
}
