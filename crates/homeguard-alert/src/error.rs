/// Errors raised while evaluating threshold rules.
///
/// # Examples
///
/// ```rust
/// use homeguard_alert::error::AlertError;
///
/// let err = AlertError::MissingSensor {
///     rule_id: "pir-motion".to_string(),
///     sensor: "pir".to_string(),
/// };
/// assert!(err.to_string().contains("pir-motion"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlertError {
    /// A rule references a sensor absent from the reading. The rule is
    /// skipped for this tick; other rules are still evaluated.
    #[error("Alert: rule '{rule_id}' references missing sensor '{sensor}'")]
    MissingSensor { rule_id: String, sensor: String },
}

/// Convenience `Result` alias for rule evaluation.
pub type Result<T> = std::result::Result<T, AlertError>;
