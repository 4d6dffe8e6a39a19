//! Sensor acquisition for the homeguard monitor.
//!
//! Each [`SensorSource`] produces a complete [`SensorReading`] on demand. The
//! monitor calls [`read_with_timeout`] once per poll tick; a failed or slow
//! read skips that tick instead of stalling the scheduler.

pub mod error;
pub mod fixed;
pub mod simulated;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use error::{Result, SensorError};
use homeguard_common::types::SensorReading;
use std::time::Duration;

/// A provider of household sensor readings.
///
/// Implementations are shared between the poll scheduler and manual checks,
/// so reads take `&self` and must be `Send + Sync`.
#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Returns the source name (e.g., `"simulated"`), used for logging.
    fn name(&self) -> &str;

    /// Reads every sensor the source knows about.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::Unavailable`] if the readings cannot be taken.
    async fn read_all(&self) -> Result<SensorReading>;
}

/// Reads `source`, failing with [`SensorError::Timeout`] if it takes longer
/// than `timeout`.
pub async fn read_with_timeout(
    source: &dyn SensorSource,
    timeout: Duration,
) -> Result<SensorReading> {
    match tokio::time::timeout(timeout, source.read_all()).await {
        Ok(result) => result,
        Err(_) => Err(SensorError::Timeout {
            source_name: source.name().to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
