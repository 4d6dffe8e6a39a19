use crate::error::{MonitorError, Result};
use crate::monitor::Monitor;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Tick counters since the scheduler was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub completed: u64,
    /// Ticks skipped because the sensor source failed.
    pub skipped: u64,
    /// Ticks that errored or panicked.
    pub failed: u64,
}

#[derive(Default)]
struct Counters {
    completed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

struct RunningTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives [`Monitor::tick`] on a fixed interval.
///
/// The first tick happens one interval after [`start`](Self::start).
/// [`stop`](Self::stop) lets an in-flight tick finish before returning.
pub struct PollScheduler {
    monitor: Arc<Monitor>,
    running: Mutex<Option<RunningTask>>,
    counters: Arc<Counters>,
}

impl PollScheduler {
    pub fn new(monitor: Arc<Monitor>) -> Self {
        Self {
            monitor,
            running: Mutex::new(None),
            counters: Arc::new(Counters::default()),
        }
    }

    fn lock_running(&self) -> MutexGuard<'_, Option<RunningTask>> {
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// `Running` while the poll loop is alive.
    pub fn state(&self) -> SchedulerState {
        let running = self.lock_running();
        if running.as_ref().is_some_and(|task| !task.handle.is_finished()) {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            completed: self.counters.completed.load(Ordering::SeqCst),
            skipped: self.counters.skipped.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        }
    }

    /// Transitions Stopped → Running. Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlreadyRunning`] if the scheduler is running,
    /// or [`MonitorError::Config`] for a zero or unrepresentable interval.
    pub fn start(&self, period: Duration) -> Result<()> {
        if period.is_zero() {
            return Err(MonitorError::Config(
                "poll interval must be greater than zero".into(),
            ));
        }
        let first_tick = Instant::now().checked_add(period).ok_or_else(|| {
            MonitorError::Config(format!("poll interval {period:?} is out of range"))
        })?;

        let mut running = self.lock_running();
        if running
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
        {
            return Err(MonitorError::AlreadyRunning);
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            self.monitor.clone(),
            first_tick,
            period,
            cancel.clone(),
            self.counters.clone(),
        ));
        *running = Some(RunningTask { cancel, handle });

        tracing::info!(interval_ms = period.as_millis() as u64, "Poll scheduler started");
        Ok(())
    }

    /// Transitions Running → Stopped, waiting for an in-flight tick to
    /// complete. No-op when already stopped.
    pub async fn stop(&self) {
        let task = self.lock_running().take();
        let Some(task) = task else {
            return;
        };

        task.cancel.cancel();
        if let Err(e) = task.handle.await {
            tracing::error!(error = %e, "Poll scheduler task ended abnormally");
        }
        tracing::info!("Poll scheduler stopped");
    }
}

async fn run_loop(
    monitor: Arc<Monitor>,
    first_tick: Instant,
    period: Duration,
    cancel: CancellationToken,
    counters: Arc<Counters>,
) {
    let mut tick = interval_at(first_tick, period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Poll loop stopping");
                break;
            }
            _ = tick.tick() => {
                run_tick(&monitor, &counters).await;
            }
        }
    }
}

/// Runs one tick in its own task so a panic is contained and reported
/// instead of ending the loop.
async fn run_tick(monitor: &Arc<Monitor>, counters: &Counters) {
    let monitor = monitor.clone();
    let outcome = tokio::spawn(async move { monitor.tick().await }).await;

    match outcome {
        Ok(Ok(report)) => {
            counters.completed.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(
                events = report.events.len(),
                triggers = report.triggers.len(),
                "Tick completed"
            );
        }
        Ok(Err(MonitorError::Sensor(_))) => {
            // Already logged by the monitor; retried next interval.
            counters.skipped.fetch_add(1, Ordering::SeqCst);
        }
        Ok(Err(e)) => {
            counters.failed.fetch_add(1, Ordering::SeqCst);
            tracing::error!(error = %MonitorError::Tick(e.to_string()), "Monitor tick failed");
        }
        Err(e) => {
            counters.failed.fetch_add(1, Ordering::SeqCst);
            tracing::error!(error = %MonitorError::Tick(e.to_string()), "Monitor tick panicked");
        }
    }
}
