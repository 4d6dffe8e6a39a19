//! Alarm actuators and the cooldown gate in front of them.
//!
//! An [`Actuator`] is the physical output (siren, strobe, door lock). The
//! [`gate::ActuatorGate`] decides whether a triggered rule may actually fire
//! it, so a sustained breach does not re-fire the alarm on every poll tick.

pub mod error;
pub mod gate;
pub mod siren;


use anyhow::Result;
use async_trait::async_trait;

/// An alarm output that can be triggered and disarmed.
///
/// Implementations are registered in the [`gate::ActuatorGate`] together
/// with their cooldown.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Returns the actuator id (e.g., `"siren"`), referenced by rules.
    fn id(&self) -> &str;

    /// Activates the actuator. Returns `Ok(false)` if the device refused.
    ///
    /// # Errors
    ///
    /// Returns an error if the device could not be reached.
    async fn trigger(&self) -> Result<bool>;

    /// Deactivates the actuator.
    ///
    /// # Errors
    ///
    /// Returns an error if the device could not be reached.
    async fn reset(&self) -> Result<()>;
}
