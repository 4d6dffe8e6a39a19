/// Errors produced while reading from a sensor source.
///
/// Both variants are recoverable: the poll tick that hit them is skipped and
/// the read is retried on the next interval.
///
/// # Examples
///
/// ```rust
/// use homeguard_collector::error::SensorError;
///
/// let err = SensorError::Unavailable {
///     source_name: "simulated".to_string(),
///     reason: "bus reset".to_string(),
/// };
/// assert!(err.to_string().contains("bus reset"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// The source could not produce a reading this tick.
    #[error("Sensor: source '{source_name}' unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },

    /// The source did not answer within the configured read timeout.
    #[error("Sensor: source '{source_name}' did not answer within {timeout_ms}ms")]
    Timeout { source_name: String, timeout_ms: u64 },
}

/// Convenience `Result` alias for sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;
