use crate::error::{MonitorError, Result};
use crate::rule_builder;
use homeguard_actuator::gate::MAX_COOLDOWN;
use homeguard_common::i18n::is_supported_locale;
use homeguard_common::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Upper bound for the poll interval, the call timeouts and the status
/// window.
pub const MAX_DURATION_SECS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between poll ticks. Must exceed the sensor and actuator
    /// timeouts combined so ticks never overlap.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default = "default_call_timeout")]
    pub sensor_timeout_secs: u64,
    #[serde(default = "default_call_timeout")]
    pub actuator_timeout_secs: u64,
    /// How long the latest alert keeps the status at ALERT.
    #[serde(default = "default_status_window")]
    pub status_window_secs: u64,
    /// Consecutive failed sensor reads before the monitor reports itself
    /// degraded. 0 disables the check.
    #[serde(default = "default_degraded_after")]
    pub degraded_after: u32,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Minimum severity that bypasses actuator cooldowns.
    #[serde(default = "default_escalation_severity")]
    pub escalation_severity: String,
    #[serde(default)]
    pub sensors: SensorsConfig,
    #[serde(default = "default_actuators")]
    pub actuators: Vec<ActuatorConfig>,
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorsConfig {
    /// Seed for the simulated sensor bank; random when omitted.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Probability (0.0..=1.0) that a simulated read fails.
    #[serde(default)]
    pub failure_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorConfig {
    pub id: String,
    #[serde(default = "default_actuator_kind")]
    pub kind: String,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub id: String,
    pub name: String,
    pub sensor: String,
    pub operator: String,
    pub limit: f64,
    #[serde(default = "default_rule_severity")]
    pub severity: String,
    #[serde(default)]
    pub actuator: Option<String>,
}

fn default_poll_interval() -> u64 {
    10
}

fn default_log_capacity() -> usize {
    100
}

fn default_call_timeout() -> u64 {
    3
}

fn default_status_window() -> u64 {
    30
}

fn default_degraded_after() -> u32 {
    5
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_escalation_severity() -> String {
    "critical".to_string()
}

fn default_actuator_kind() -> String {
    "siren".to_string()
}

fn default_cooldown_secs() -> u64 {
    15
}

fn default_rule_severity() -> String {
    "medium".to_string()
}

fn default_actuators() -> Vec<ActuatorConfig> {
    vec![ActuatorConfig {
        id: "siren".to_string(),
        kind: default_actuator_kind(),
        cooldown_secs: default_cooldown_secs(),
    }]
}

fn default_rules() -> Vec<RuleConfig> {
    let rule = |id: &str, name: &str, sensor: &str, limit: f64| RuleConfig {
        id: id.to_string(),
        name: name.to_string(),
        sensor: sensor.to_string(),
        operator: ">".to_string(),
        limit,
        severity: "high".to_string(),
        actuator: Some("siren".to_string()),
    };
    vec![
        rule("pir-motion", "Motion detected", "pir", 0.7),
        rule("door-window-open", "Door/window opened", "magnetic", 0.8),
        rule("vibration-strong", "Strong vibration detected", "vibration", 80.0),
    ]
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            log_capacity: default_log_capacity(),
            sensor_timeout_secs: default_call_timeout(),
            actuator_timeout_secs: default_call_timeout(),
            status_window_secs: default_status_window(),
            degraded_after: default_degraded_after(),
            locale: default_locale(),
            escalation_severity: default_escalation_severity(),
            sensors: SensorsConfig::default(),
            actuators: default_actuators(),
            rules: default_rules(),
        }
    }
}

impl MonitorConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;
        let config = Self::parse(&content)?;
        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn sensor_timeout(&self) -> Duration {
        Duration::from_secs(self.sensor_timeout_secs)
    }

    pub fn actuator_timeout(&self) -> Duration {
        Duration::from_secs(self.actuator_timeout_secs)
    }

    pub fn escalation(&self) -> Result<Severity> {
        self.escalation_severity
            .parse()
            .map_err(MonitorError::Config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(MonitorError::Config(msg));

        if self.sensor_timeout_secs == 0 || self.actuator_timeout_secs == 0 {
            return invalid("sensor and actuator timeouts must be at least 1 second".into());
        }
        for (name, value) in [
            ("poll_interval_secs", self.poll_interval_secs),
            ("sensor_timeout_secs", self.sensor_timeout_secs),
            ("actuator_timeout_secs", self.actuator_timeout_secs),
            ("status_window_secs", self.status_window_secs),
        ] {
            if value > MAX_DURATION_SECS {
                return invalid(format!("{name} ({value}) must not exceed {MAX_DURATION_SECS}"));
            }
        }
        let worst_case = self.sensor_timeout_secs + self.actuator_timeout_secs;
        if self.poll_interval_secs <= worst_case {
            return invalid(format!(
                "poll_interval_secs ({}) must exceed sensor_timeout_secs + actuator_timeout_secs ({worst_case})",
                self.poll_interval_secs
            ));
        }
        if self.log_capacity == 0 {
            return invalid("log_capacity must be at least 1".into());
        }
        if !is_supported_locale(&self.locale) {
            return invalid(format!("unsupported locale: {}", self.locale));
        }
        self.escalation()?;
        if !(0.0..=1.0).contains(&self.sensors.failure_rate) {
            return invalid(format!(
                "sensors.failure_rate must be within 0.0..=1.0, got {}",
                self.sensors.failure_rate
            ));
        }

        let mut actuator_ids = HashSet::new();
        for actuator in &self.actuators {
            if actuator.id.trim().is_empty() {
                return invalid("actuator id must not be empty".into());
            }
            if actuator.kind != "siren" {
                return invalid(format!(
                    "actuator '{}' has unsupported kind '{}'",
                    actuator.id, actuator.kind
                ));
            }
            if actuator.cooldown_secs > MAX_COOLDOWN.as_secs() {
                return invalid(format!(
                    "actuator '{}' cooldown_secs ({}) must not exceed {}",
                    actuator.id,
                    actuator.cooldown_secs,
                    MAX_COOLDOWN.as_secs()
                ));
            }
            if !actuator_ids.insert(actuator.id.as_str()) {
                return invalid(format!("duplicate actuator id: {}", actuator.id));
            }
        }

        let rules = rule_builder::build_rules(&self.rules)?;
        rule_builder::check_rule_set(&rules, |id| actuator_ids.contains(id))?;
        Ok(())
    }
}
