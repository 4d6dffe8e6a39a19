use crate::Actuator;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// In-process siren standing in for the alarm hardware.
///
/// Tracks whether it is sounding and how often it was triggered. Failure
/// injection makes the next calls return an error, as a disconnected relay
/// would.
pub struct SimulatedSiren {
    id: String,
    sounding: AtomicBool,
    triggers: AtomicU64,
    failing: AtomicBool,
}

impl SimulatedSiren {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            sounding: AtomicBool::new(false),
            triggers: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding.load(Ordering::SeqCst)
    }

    pub fn trigger_count(&self) -> u64 {
        self.triggers.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Actuator for SimulatedSiren {
    fn id(&self) -> &str {
        &self.id
    }

    async fn trigger(&self) -> Result<bool> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("relay for '{}' not responding", self.id);
        }
        self.sounding.store(true, Ordering::SeqCst);
        let count = self.triggers.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::warn!(actuator = %self.id, count, "Siren sounding");
        Ok(true)
    }

    async fn reset(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("relay for '{}' not responding", self.id);
        }
        self.sounding.store(false, Ordering::SeqCst);
        tracing::info!(actuator = %self.id, "Siren silenced");
        Ok(())
    }
}
