use crate::config::{ActuatorConfig, MonitorConfig, RuleConfig};
use crate::error::{MonitorError, Result};
use homeguard_actuator::gate::ActuatorGate;
use homeguard_actuator::siren::SimulatedSiren;
use homeguard_alert::rules::threshold::{CompareOp, ThresholdRule};
use homeguard_common::types::Severity;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Convert a single `RuleConfig` into a `ThresholdRule`.
pub fn build_rule(cfg: &RuleConfig) -> Result<ThresholdRule> {
    if cfg.id.trim().is_empty() {
        return Err(MonitorError::Config("rule id must not be empty".into()));
    }
    if cfg.sensor.trim().is_empty() {
        return Err(MonitorError::Config(format!(
            "rule '{}' has an empty sensor name",
            cfg.id
        )));
    }
    if !cfg.limit.is_finite() {
        return Err(MonitorError::Config(format!(
            "rule '{}' has a non-finite limit",
            cfg.id
        )));
    }
    let operator: CompareOp = cfg
        .operator
        .parse()
        .map_err(|e: String| MonitorError::Config(format!("rule '{}': {e}", cfg.id)))?;
    let severity: Severity = cfg
        .severity
        .parse()
        .map_err(|e: String| MonitorError::Config(format!("rule '{}': {e}", cfg.id)))?;

    Ok(ThresholdRule {
        id: cfg.id.clone(),
        name: cfg.name.clone(),
        sensor: cfg.sensor.clone(),
        operator,
        limit: cfg.limit,
        severity,
        actuator: cfg.actuator.clone(),
    })
}

/// Build every rule, keeping declaration order.
pub fn build_rules(cfgs: &[RuleConfig]) -> Result<Vec<ThresholdRule>> {
    cfgs.iter().map(build_rule).collect()
}

/// Rejects duplicate rule ids and rules pointing at unknown actuators.
pub fn check_rule_set(
    rules: &[ThresholdRule],
    actuator_exists: impl Fn(&str) -> bool,
) -> Result<()> {
    let mut ids = HashSet::new();
    for rule in rules {
        if !ids.insert(rule.id.as_str()) {
            return Err(MonitorError::Config(format!(
                "duplicate rule id: {}",
                rule.id
            )));
        }
        if let Some(actuator) = &rule.actuator {
            if !actuator_exists(actuator) {
                return Err(MonitorError::Config(format!(
                    "rule '{}' references unknown actuator '{}'",
                    rule.id, actuator
                )));
            }
        }
    }
    Ok(())
}

/// Build the actuator gate with one simulated siren per configured actuator.
pub fn build_gate(config: &MonitorConfig) -> Result<ActuatorGate> {
    let mut gate = ActuatorGate::new(config.escalation()?, config.actuator_timeout());
    for ActuatorConfig {
        id, cooldown_secs, ..
    } in &config.actuators
    {
        gate.register(
            Arc::new(SimulatedSiren::new(id)),
            Duration::from_secs(*cooldown_secs),
        );
    }
    Ok(gate)
}
