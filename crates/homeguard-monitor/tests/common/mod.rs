#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use homeguard_collector::error::{Result, SensorError};
use homeguard_collector::SensorSource;
use homeguard_common::types::{SensorReading, SensorUnit};
use homeguard_monitor::config::MonitorConfig;
use homeguard_monitor::monitor::{Monitor, MonitorSettings};
use homeguard_monitor::rule_builder;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// What the next sensor read does.
#[derive(Debug, Clone)]
pub enum Step {
    /// Every sensor within limits.
    Quiet,
    /// PIR above its limit.
    Motion,
    Fail,
    Panic,
    /// Waits, then reports motion.
    Slow(Duration),
}

/// Sensor source that plays back a fixed script, then stays quiet.
pub struct ScriptedSensors {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedSensors {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn reading(pir: f64) -> SensorReading {
    SensorReading::new(Utc::now())
        .with("pir", pir, SensorUnit::Ratio)
        .with("magnetic", 0.0, SensorUnit::Ratio)
        .with("vibration", 5.0, SensorUnit::Percent)
}

#[async_trait]
impl SensorSource for ScriptedSensors {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn read_all(&self) -> Result<SensorReading> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(Step::Quiet);

        match step {
            Step::Quiet => Ok(reading(0.1)),
            Step::Motion => Ok(reading(0.9)),
            Step::Fail => Err(SensorError::Unavailable {
                source_name: "scripted".to_string(),
                reason: "bus down".to_string(),
            }),
            Step::Panic => panic!("sensor driver crashed"),
            Step::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(reading(0.9))
            }
        }
    }
}

/// Monitor with the default rules and siren, reading from `source`.
pub fn build_monitor(source: Arc<ScriptedSensors>, settings: MonitorSettings) -> Arc<Monitor> {
    let config = MonitorConfig::default();
    let rules = rule_builder::build_rules(&config.rules).expect("default rules should build");
    let gate = rule_builder::build_gate(&config).expect("default gate should build");
    Arc::new(Monitor::new(source, rules, gate, settings))
}

pub const INTERVAL: Duration = Duration::from_secs(10);

/// Sleeps until just past the `n`th tick of a scheduler started at `start`.
pub async fn after_tick(start: Instant, n: u32) {
    tokio::time::sleep_until(start + INTERVAL * n + Duration::from_millis(500)).await;
}
