use homeguard_collector::error::SensorError;

/// Errors surfaced by the monitor pipeline and its scheduler.
///
/// # Examples
///
/// ```rust
/// use homeguard_monitor::error::MonitorError;
///
/// let err = MonitorError::Degraded { failures: 5 };
/// assert!(err.to_string().contains("5 consecutive"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The sensor source failed; the tick is skipped and retried next interval.
    #[error("Monitor: sensor read failed: {0}")]
    Sensor(#[from] SensorError),

    /// Catch-all for a tick that failed or panicked. The scheduler logs it
    /// and keeps running.
    #[error("Monitor: tick failed: {0}")]
    Tick(String),

    /// The sensor source has failed on too many consecutive ticks.
    #[error("Monitor: sensor source degraded after {failures} consecutive failures")]
    Degraded { failures: u32 },

    #[error("Monitor: poll scheduler is already running")]
    AlreadyRunning,

    /// Configuration or rule set rejected during validation.
    #[error("Monitor: invalid configuration: {0}")]
    Config(String),
}

/// Convenience `Result` alias for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
