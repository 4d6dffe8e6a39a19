use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::rule_builder;
use crate::status::{self, StatusSummary};
use chrono::{DateTime, Utc};
use homeguard_actuator::error::ActuatorError;
use homeguard_actuator::gate::{ActuatorGate, ActuatorGateState, TriggerResult};
use homeguard_alert::error::AlertError;
use homeguard_alert::evaluator::Evaluator;
use homeguard_alert::event_log::EventLog;
use homeguard_alert::rules::threshold::ThresholdRule;
use homeguard_collector::{read_with_timeout, SensorSource};
use homeguard_common::types::AlertEvent;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Tunables for a [`Monitor`], usually taken from [`MonitorConfig`].
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub locale: String,
    pub log_capacity: usize,
    pub sensor_timeout: Duration,
    pub status_window: Duration,
    pub degraded_after: u32,
}

impl From<&MonitorConfig> for MonitorSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            locale: config.locale.clone(),
            log_capacity: config.log_capacity,
            sensor_timeout: config.sensor_timeout(),
            status_window: Duration::from_secs(config.status_window_secs),
            degraded_after: config.degraded_after,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from(&MonitorConfig::default())
    }
}

/// What one tick did.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub evaluated_at: DateTime<Utc>,
    pub sensors_read: usize,
    pub events: Vec<AlertEvent>,
    pub missing_sensors: Vec<String>,
    pub triggers: Vec<TriggerResult>,
    pub actuator_errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActuatorSnapshot {
    pub id: String,
    pub state: ActuatorGateState,
}

/// Read-only view for export and presentation collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub generated_at: DateTime<Utc>,
    pub status: StatusSummary,
    pub events: Vec<AlertEvent>,
    pub rules: Vec<ThresholdRule>,
    pub actuators: Vec<ActuatorSnapshot>,
}

#[derive(Default)]
struct PipelineState {
    consecutive_failures: u32,
}

/// The poll-evaluate-dispatch pipeline.
///
/// Scheduled ticks and operator-triggered checks both go through
/// [`Monitor::tick_at`], which holds the pipeline lock for the whole tick;
/// two ticks therefore never interleave their log appends or gate updates.
pub struct Monitor {
    source: Arc<dyn SensorSource>,
    evaluator: Evaluator,
    rules: RwLock<Vec<ThresholdRule>>,
    log: EventLog,
    gate: ActuatorGate,
    pipeline: tokio::sync::Mutex<PipelineState>,
    degraded: AtomicBool,
    settings: MonitorSettings,
}

impl Monitor {
    pub fn new(
        source: Arc<dyn SensorSource>,
        rules: Vec<ThresholdRule>,
        gate: ActuatorGate,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            source,
            evaluator: Evaluator::new(&settings.locale),
            rules: RwLock::new(rules),
            log: EventLog::new(settings.log_capacity),
            gate,
            pipeline: tokio::sync::Mutex::new(PipelineState::default()),
            degraded: AtomicBool::new(false),
            settings,
        }
    }

    /// Builds a monitor with simulated sirens from a validated config.
    pub fn from_config(config: &MonitorConfig, source: Arc<dyn SensorSource>) -> Result<Self> {
        config.validate()?;
        let rules = rule_builder::build_rules(&config.rules)?;
        let gate = rule_builder::build_gate(config)?;
        Ok(Self::new(source, rules, gate, MonitorSettings::from(config)))
    }

    pub async fn tick(&self) -> Result<TickReport> {
        self.tick_at(Utc::now()).await
    }

    /// Runs one tick, evaluating rules as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Sensor`] when the source fails or times out;
    /// the event log and gate are untouched in that case.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Result<TickReport> {
        let mut pipeline = self.pipeline.lock().await;

        let reading =
            match read_with_timeout(self.source.as_ref(), self.settings.sensor_timeout).await {
                Ok(reading) => {
                    if self.degraded.swap(false, Ordering::SeqCst) {
                        tracing::info!(
                            source = self.source.name(),
                            failures = pipeline.consecutive_failures,
                            "Sensor source recovered"
                        );
                    }
                    pipeline.consecutive_failures = 0;
                    reading
                }
                Err(e) => {
                    pipeline.consecutive_failures += 1;
                    let failures = pipeline.consecutive_failures;
                    tracing::warn!(
                        source = self.source.name(),
                        failures,
                        error = %e,
                        "Sensor read failed, skipping tick"
                    );
                    if self.settings.degraded_after > 0
                        && failures >= self.settings.degraded_after
                        && !self.degraded.swap(true, Ordering::SeqCst)
                    {
                        tracing::error!(
                            source = self.source.name(),
                            error = %MonitorError::Degraded { failures },
                            "Sensor source degraded"
                        );
                    }
                    return Err(e.into());
                }
            };

        if reading.is_empty() {
            tracing::warn!(source = self.source.name(), "Sensor source returned no readings");
        }

        let evaluation = {
            let rules = self.rules.read().unwrap_or_else(|e| e.into_inner());
            self.evaluator.evaluate(&reading, &rules, now)
        };

        let missing_sensors = evaluation
            .missing
            .iter()
            .map(|e| {
                tracing::warn!(error = %e, "Rule skipped");
                match e {
                    AlertError::MissingSensor { sensor, .. } => sensor.clone(),
                }
            })
            .collect();

        let mut report = TickReport {
            evaluated_at: now,
            sensors_read: reading.len(),
            events: Vec::with_capacity(evaluation.events.len()),
            missing_sensors,
            triggers: Vec::new(),
            actuator_errors: Vec::new(),
        };

        for event in evaluation.events {
            tracing::info!(
                rule_id = %event.rule_id,
                sensor = %event.sensor,
                value = event.value,
                severity = %event.severity,
                "{}",
                event.message
            );
            self.log.append(event.clone());

            if let Some(actuator) = &event.actuator {
                match self.gate.maybe_trigger(actuator, event.severity, now).await {
                    Ok(result) => report.triggers.push(result),
                    Err(e) => {
                        tracing::warn!(
                            rule_id = %event.rule_id,
                            error = %e,
                            "Actuator trigger failed, will retry on next eligible tick"
                        );
                        report.actuator_errors.push(e.to_string());
                    }
                }
            }
            report.events.push(event);
        }

        Ok(report)
    }

    /// Operator-triggered evaluation, identical to a scheduled tick.
    pub async fn check_now(&self) -> Result<TickReport> {
        tracing::info!("Manual check requested");
        self.tick().await
    }

    pub fn status(&self) -> StatusSummary {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> StatusSummary {
        let window = chrono::Duration::from_std(self.settings.status_window)
            .unwrap_or_else(|_| chrono::Duration::days(36_500));
        status::summarize(
            self.log.latest(),
            self.is_degraded(),
            now,
            window,
            self.evaluator.locale(),
        )
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// The `n` most recent alerts, newest first.
    pub fn recent(&self, n: usize) -> Vec<AlertEvent> {
        self.log.recent(n)
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn log_capacity(&self) -> usize {
        self.log.capacity()
    }

    pub fn clear_log(&self) {
        self.log.clear();
        tracing::info!("Event log cleared");
    }

    pub fn rules(&self) -> Vec<ThresholdRule> {
        self.rules
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace all rules with a new set.
    pub fn replace_rules(&self, rules: Vec<ThresholdRule>) -> Result<()> {
        rule_builder::check_rule_set(&rules, |id| self.gate.contains(id))?;
        let count = rules.len();
        *self.rules.write().unwrap_or_else(|e| e.into_inner()) = rules;
        tracing::info!(count, "Threshold rules replaced");
        Ok(())
    }

    /// Add a new rule at runtime. It is evaluated after the existing rules.
    pub fn add_rule(&self, rule: ThresholdRule) -> Result<()> {
        let mut rules = self.rules.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = rules.clone();
        candidate.push(rule);
        rule_builder::check_rule_set(&candidate, |id| self.gate.contains(id))?;
        *rules = candidate;
        Ok(())
    }

    /// Remove a rule by ID. Returns true if found and removed.
    pub fn remove_rule(&self, id: &str) -> bool {
        let mut rules = self.rules.write().unwrap_or_else(|e| e.into_inner());
        let len_before = rules.len();
        rules.retain(|r| r.id != id);
        rules.len() < len_before
    }

    pub fn actuator_state(&self, actuator_id: &str) -> Option<ActuatorGateState> {
        self.gate.state(actuator_id)
    }

    /// Operator disarm of one actuator.
    pub async fn reset_actuator(&self, actuator_id: &str) -> std::result::Result<(), ActuatorError> {
        self.gate.reset(actuator_id).await
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let now = Utc::now();
        MonitorSnapshot {
            generated_at: now,
            status: self.status_at(now),
            events: self.log.snapshot(),
            rules: self.rules(),
            actuators: self
                .gate
                .states()
                .into_iter()
                .map(|(id, state)| ActuatorSnapshot { id, state })
                .collect(),
        }
    }

    /// Disarms every actuator. Called on graceful shutdown.
    pub async fn shutdown(&self) -> Vec<ActuatorError> {
        let errors = self.gate.reset_all().await;
        tracing::info!(failures = errors.len(), "All actuators reset");
        errors
    }
}
