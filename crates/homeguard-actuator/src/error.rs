/// Errors that can occur when driving an actuator through the gate.
///
/// None of these are fatal: the gate state is left untouched so the same
/// trigger is attempted again on the next eligible tick.
///
/// # Examples
///
/// ```rust
/// use homeguard_actuator::error::ActuatorError;
///
/// let err = ActuatorError::UnknownActuator("strobe".to_string());
/// assert!(err.to_string().contains("strobe"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    /// No actuator with this id is registered in the gate.
    #[error("Actuator: unknown actuator '{0}'")]
    UnknownActuator(String),

    /// The actuator call returned an error or reported failure.
    #[error("Actuator: trigger of '{actuator}' failed: {reason}")]
    TriggerFailed { actuator: String, reason: String },

    /// Disarming the actuator failed.
    #[error("Actuator: reset of '{actuator}' failed: {reason}")]
    ResetFailed { actuator: String, reason: String },

    /// The actuator call did not complete within the configured timeout.
    #[error("Actuator: '{actuator}' did not answer within {timeout_ms}ms")]
    Timeout { actuator: String, timeout_ms: u64 },
}

/// Convenience `Result` alias for actuator gate operations.
pub type Result<T> = std::result::Result<T, ActuatorError>;
