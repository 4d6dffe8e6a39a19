mod common;

use anyhow::Result;
use common::{after_tick, build_monitor, ScriptedSensors, Step, INTERVAL};
use homeguard_monitor::error::MonitorError;
use homeguard_monitor::monitor::MonitorSettings;
use homeguard_monitor::scheduler::{PollScheduler, SchedulerState, SchedulerStats};
use homeguard_monitor::status::StatusLevel;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn first_tick_waits_one_interval() -> Result<()> {
    let source = ScriptedSensors::new([Step::Motion]);
    let monitor = build_monitor(source.clone(), MonitorSettings::default());
    let scheduler = PollScheduler::new(monitor.clone());

    let start = Instant::now();
    scheduler.start(INTERVAL)?;
    assert_eq!(scheduler.state(), SchedulerState::Running);

    tokio::time::sleep_until(start + INTERVAL - Duration::from_millis(500)).await;
    assert_eq!(source.calls(), 0);

    after_tick(start, 1).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(monitor.log_len(), 1);

    scheduler.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_read_skips_tick_and_keeps_running() -> Result<()> {
    let source = ScriptedSensors::new([Step::Motion, Step::Fail, Step::Motion]);
    let monitor = build_monitor(source.clone(), MonitorSettings::default());
    let scheduler = PollScheduler::new(monitor.clone());

    let start = Instant::now();
    scheduler.start(INTERVAL)?;

    after_tick(start, 1).await;
    assert_eq!(monitor.log_len(), 1);

    after_tick(start, 2).await;
    assert_eq!(monitor.log_len(), 1);
    assert_eq!(scheduler.state(), SchedulerState::Running);

    after_tick(start, 3).await;
    assert_eq!(monitor.log_len(), 2);
    assert_eq!(
        scheduler.stats(),
        SchedulerStats {
            completed: 2,
            skipped: 1,
            failed: 0
        }
    );

    scheduler.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn slow_sensor_times_out_and_tick_is_skipped() -> Result<()> {
    // Default sensor timeout is 3s.
    let source = ScriptedSensors::new([Step::Slow(Duration::from_secs(5))]);
    let monitor = build_monitor(source.clone(), MonitorSettings::default());
    let scheduler = PollScheduler::new(monitor.clone());

    let start = Instant::now();
    scheduler.start(INTERVAL)?;

    tokio::time::sleep_until(start + INTERVAL + Duration::from_secs(4)).await;
    assert_eq!(scheduler.stats().skipped, 1);
    assert_eq!(monitor.log_len(), 0);

    after_tick(start, 2).await;
    assert_eq!(scheduler.stats().completed, 1);

    scheduler.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn panicking_source_does_not_stop_scheduler() -> Result<()> {
    let source = ScriptedSensors::new([Step::Panic, Step::Motion]);
    let monitor = build_monitor(source.clone(), MonitorSettings::default());
    let scheduler = PollScheduler::new(monitor.clone());

    let start = Instant::now();
    scheduler.start(INTERVAL)?;

    after_tick(start, 1).await;
    assert_eq!(scheduler.stats().failed, 1);
    assert_eq!(scheduler.state(), SchedulerState::Running);

    after_tick(start, 2).await;
    assert_eq!(scheduler.stats().completed, 1);
    assert_eq!(monitor.log_len(), 1);

    scheduler.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stop_waits_for_in_flight_tick() -> Result<()> {
    let source = ScriptedSensors::new([Step::Slow(Duration::from_secs(2))]);
    let monitor = build_monitor(source.clone(), MonitorSettings::default());
    let scheduler = PollScheduler::new(monitor.clone());

    let start = Instant::now();
    scheduler.start(INTERVAL)?;

    // The tick started at 10s and is still reading.
    tokio::time::sleep_until(start + INTERVAL + Duration::from_millis(500)).await;
    assert_eq!(source.calls(), 1);
    assert_eq!(monitor.log_len(), 0);

    scheduler.stop().await;
    assert!(start.elapsed() >= INTERVAL + Duration::from_secs(2));
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
    assert_eq!(monitor.log_len(), 1);

    // No further ticks once stopped.
    after_tick(start, 3).await;
    assert_eq!(source.calls(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn start_while_running_is_rejected() -> Result<()> {
    let source = ScriptedSensors::new([Step::Quiet]);
    let scheduler = PollScheduler::new(build_monitor(source, MonitorSettings::default()));

    scheduler.start(INTERVAL)?;
    assert!(matches!(
        scheduler.start(INTERVAL),
        Err(MonitorError::AlreadyRunning)
    ));

    scheduler.stop().await;
    scheduler.stop().await;
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    scheduler.start(INTERVAL)?;
    assert_eq!(scheduler.state(), SchedulerState::Running);
    scheduler.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn zero_interval_is_rejected() {
    let scheduler = PollScheduler::new(build_monitor(
        ScriptedSensors::new([Step::Quiet]),
        MonitorSettings::default(),
    ));
    assert!(matches!(
        scheduler.start(Duration::ZERO),
        Err(MonitorError::Config(_))
    ));
    assert_eq!(scheduler.state(), SchedulerState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn out_of_range_interval_is_rejected() {
    let scheduler = PollScheduler::new(build_monitor(
        ScriptedSensors::new([Step::Quiet]),
        MonitorSettings::default(),
    ));
    assert!(matches!(
        scheduler.start(Duration::from_secs(u64::MAX)),
        Err(MonitorError::Config(_))
    ));
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    scheduler.start(INTERVAL).expect("valid interval should start");
    assert_eq!(scheduler.state(), SchedulerState::Running);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn degraded_after_consecutive_failures() -> Result<()> {
    let source = ScriptedSensors::new([Step::Fail, Step::Fail]);
    let settings = MonitorSettings {
        degraded_after: 2,
        ..MonitorSettings::default()
    };
    let monitor = build_monitor(source, settings);
    let scheduler = PollScheduler::new(monitor.clone());

    let start = Instant::now();
    scheduler.start(INTERVAL)?;

    after_tick(start, 1).await;
    assert!(!monitor.is_degraded());

    after_tick(start, 2).await;
    assert!(monitor.is_degraded());
    assert_eq!(monitor.status().level, StatusLevel::Degraded);

    after_tick(start, 3).await;
    assert!(!monitor.is_degraded());
    assert_eq!(monitor.status().level, StatusLevel::Normal);

    scheduler.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn manual_check_waits_for_scheduled_tick() -> Result<()> {
    let source = ScriptedSensors::new([Step::Slow(Duration::from_secs(2)), Step::Motion]);
    let monitor = build_monitor(source.clone(), MonitorSettings::default());
    let scheduler = PollScheduler::new(monitor.clone());

    let start = Instant::now();
    scheduler.start(INTERVAL)?;
    tokio::time::sleep_until(start + INTERVAL + Duration::from_millis(500)).await;

    let report = monitor.check_now().await?;
    assert!(start.elapsed() >= INTERVAL + Duration::from_secs(2));
    assert_eq!(report.events.len(), 1);
    assert_eq!(monitor.log_len(), 2);

    scheduler.stop().await;
    Ok(())
}
