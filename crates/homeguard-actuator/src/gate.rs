use crate::error::{ActuatorError, Result};
use crate::Actuator;
use chrono::{DateTime, Utc};
use homeguard_common::types::Severity;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Longest cooldown the gate accepts; longer values are clamped.
pub const MAX_COOLDOWN: Duration = Duration::from_secs(86_400);

/// Cooldown bookkeeping for one actuator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActuatorGateState {
    pub cooldown_ms: u64,
    pub last_triggered_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub trigger_count: u64,
}

impl ActuatorGateState {
    fn new(cooldown: Duration) -> Self {
        Self {
            cooldown_ms: cooldown.min(MAX_COOLDOWN).as_millis() as u64,
            last_triggered_at: None,
            is_active: false,
            trigger_count: 0,
        }
    }

    fn cooldown_remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let last = self.last_triggered_at?;
        let cooldown = chrono::Duration::milliseconds(self.cooldown_ms as i64);
        let elapsed = now - last;
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerReason {
    /// The actuator was idle (never fired, or disarmed since).
    Armed,
    /// The cooldown since the previous trigger has elapsed.
    CooldownElapsed,
    /// Severity reached the escalation level and bypassed the cooldown.
    Escalated,
    /// Suppressed: the actuator fired too recently. The remaining time is
    /// rounded up to whole seconds.
    CoolingDown { remaining_secs: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerResult {
    pub actuator: String,
    pub fired: bool,
    pub reason: TriggerReason,
}

fn ceil_secs(d: chrono::Duration) -> i64 {
    (d.num_milliseconds() + 999).div_euclid(1000)
}

/// Deduplicates actuator triggers with a per-actuator cooldown.
///
/// An actuator fires when it is idle, when its cooldown has elapsed, or when
/// the alert severity is at or above the escalation level. A failed
/// actuator call leaves the state untouched, so the next eligible attempt
/// retries it.
pub struct ActuatorGate {
    actuators: BTreeMap<String, Arc<dyn Actuator>>,
    states: Mutex<BTreeMap<String, ActuatorGateState>>,
    // Serializes trigger/reset attempts so a decision and its state update
    // are not interleaved with another attempt.
    attempt: tokio::sync::Mutex<()>,
    escalation_severity: Severity,
    call_timeout: Duration,
}

impl ActuatorGate {
    pub fn new(escalation_severity: Severity, call_timeout: Duration) -> Self {
        Self {
            actuators: BTreeMap::new(),
            states: Mutex::new(BTreeMap::new()),
            attempt: tokio::sync::Mutex::new(()),
            escalation_severity,
            call_timeout,
        }
    }

    /// Registers an actuator. Re-registering an id replaces it and resets
    /// its state. Cooldowns have millisecond granularity and are clamped to
    /// [`MAX_COOLDOWN`].
    pub fn register(&mut self, actuator: Arc<dyn Actuator>, cooldown: Duration) {
        let id = actuator.id().to_string();
        self.lock_states()
            .insert(id.clone(), ActuatorGateState::new(cooldown));
        self.actuators.insert(id, actuator);
    }

    fn lock_states(&self) -> MutexGuard<'_, BTreeMap<String, ActuatorGateState>> {
        self.states.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contains(&self, actuator_id: &str) -> bool {
        self.actuators.contains_key(actuator_id)
    }

    pub fn actuator_ids(&self) -> Vec<String> {
        self.actuators.keys().cloned().collect()
    }

    pub fn state(&self, actuator_id: &str) -> Option<ActuatorGateState> {
        self.lock_states().get(actuator_id).cloned()
    }

    /// All gate states ordered by actuator id.
    pub fn states(&self) -> Vec<(String, ActuatorGateState)> {
        self.lock_states()
            .iter()
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    fn actuator(&self, actuator_id: &str) -> Result<&Arc<dyn Actuator>> {
        self.actuators
            .get(actuator_id)
            .ok_or_else(|| ActuatorError::UnknownActuator(actuator_id.to_string()))
    }

    fn timeout_error(&self, actuator_id: &str) -> ActuatorError {
        ActuatorError::Timeout {
            actuator: actuator_id.to_string(),
            timeout_ms: self.call_timeout.as_millis() as u64,
        }
    }

    /// Fires `actuator_id` unless it is still cooling down.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::UnknownActuator`] for an unregistered id, and
    /// [`ActuatorError::TriggerFailed`] or [`ActuatorError::Timeout`] if the
    /// actuator call fails. The gate state is unchanged in every error case.
    pub async fn maybe_trigger(
        &self,
        actuator_id: &str,
        severity: Severity,
        now: DateTime<Utc>,
    ) -> Result<TriggerResult> {
        let actuator = self.actuator(actuator_id)?;
        let _attempt = self.attempt.lock().await;

        let reason = {
            let states = self.lock_states();
            let state = states
                .get(actuator_id)
                .ok_or_else(|| ActuatorError::UnknownActuator(actuator_id.to_string()))?;

            if !state.is_active {
                TriggerReason::Armed
            } else {
                match state.cooldown_remaining(now) {
                    None => TriggerReason::CooldownElapsed,
                    Some(_) if severity >= self.escalation_severity => TriggerReason::Escalated,
                    Some(remaining) => {
                        let remaining_secs = ceil_secs(remaining);
                        tracing::debug!(
                            actuator = actuator_id,
                            severity = %severity,
                            remaining_secs,
                            "Actuator trigger suppressed (cooldown)"
                        );
                        return Ok(TriggerResult {
                            actuator: actuator_id.to_string(),
                            fired: false,
                            reason: TriggerReason::CoolingDown { remaining_secs },
                        });
                    }
                }
            }
        };

        match tokio::time::timeout(self.call_timeout, actuator.trigger()).await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => {
                return Err(ActuatorError::TriggerFailed {
                    actuator: actuator_id.to_string(),
                    reason: "actuator reported failure".to_string(),
                })
            }
            Ok(Err(e)) => {
                return Err(ActuatorError::TriggerFailed {
                    actuator: actuator_id.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => return Err(self.timeout_error(actuator_id)),
        }

        if let Some(state) = self.lock_states().get_mut(actuator_id) {
            state.last_triggered_at = Some(now);
            state.is_active = true;
            state.trigger_count += 1;
        }

        tracing::info!(
            actuator = actuator_id,
            severity = %severity,
            reason = ?reason,
            "Actuator fired"
        );

        Ok(TriggerResult {
            actuator: actuator_id.to_string(),
            fired: true,
            reason,
        })
    }

    /// Disarms `actuator_id` and clears its cooldown.
    ///
    /// # Errors
    ///
    /// Returns [`ActuatorError::ResetFailed`] or [`ActuatorError::Timeout`]
    /// if the actuator could not be disarmed; the state then stays active.
    pub async fn reset(&self, actuator_id: &str) -> Result<()> {
        let actuator = self.actuator(actuator_id)?;
        let _attempt = self.attempt.lock().await;

        match tokio::time::timeout(self.call_timeout, actuator.reset()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(ActuatorError::ResetFailed {
                    actuator: actuator_id.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => return Err(self.timeout_error(actuator_id)),
        }

        if let Some(state) = self.lock_states().get_mut(actuator_id) {
            state.is_active = false;
            state.last_triggered_at = None;
        }
        tracing::info!(actuator = actuator_id, "Actuator reset");
        Ok(())
    }

    /// Disarms every registered actuator, returning the failures.
    pub async fn reset_all(&self) -> Vec<ActuatorError> {
        let mut errors = Vec::new();
        for id in self.actuators.keys() {
            if let Err(e) = self.reset(id).await {
                tracing::warn!(actuator = %id, error = %e, "Failed to reset actuator");
                errors.push(e);
            }
        }
        errors
    }
}
