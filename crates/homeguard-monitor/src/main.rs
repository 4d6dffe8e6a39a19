use anyhow::Result;
use homeguard_collector::simulated::SimulatedSensors;
use homeguard_monitor::config::MonitorConfig;
use homeguard_monitor::monitor::Monitor;
use homeguard_monitor::scheduler::PollScheduler;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  homeguard [config.toml]            Run the monitor (default: {DEFAULT_CONFIG_PATH})");
    eprintln!("  homeguard check [config.toml]      Run one check and print a JSON snapshot");
    eprintln!("  homeguard validate [config.toml]   Validate the configuration and exit");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("homeguard=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_arg = |idx: usize| {
        args.get(idx)
            .map(String::as_str)
            .unwrap_or(DEFAULT_CONFIG_PATH)
    };

    match args.get(1).map(|s| s.as_str()) {
        Some("-h") | Some("--help") => {
            print_usage();
            Ok(())
        }
        Some("validate") => run_validate(config_arg(2)),
        Some("check") => run_check(config_arg(2)).await,
        _ => run(config_arg(1)).await,
    }
}

fn build_monitor(config: &MonitorConfig) -> Result<Arc<Monitor>> {
    let source = Arc::new(SimulatedSensors::new(
        config.sensors.seed,
        config.sensors.failure_rate,
    ));
    Ok(Arc::new(Monitor::from_config(config, source)?))
}

fn run_validate(config_path: &str) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    println!(
        "{config_path}: ok ({} rules, {} actuators)",
        config.rules.len(),
        config.actuators.len()
    );
    Ok(())
}

async fn run_check(config_path: &str) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    let monitor = build_monitor(&config)?;

    if let Err(e) = monitor.check_now().await {
        tracing::warn!(error = %e, "Check skipped");
    }
    println!("{}", serde_json::to_string_pretty(&monitor.snapshot())?);

    for e in monitor.shutdown().await {
        tracing::warn!(error = %e, "Actuator reset failed");
    }
    Ok(())
}

async fn run(config_path: &str) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    tracing::info!(
        config = config_path,
        rules = config.rules.len(),
        actuators = config.actuators.len(),
        locale = %config.locale,
        "homeguard starting"
    );

    let monitor = build_monitor(&config)?;
    let scheduler = PollScheduler::new(monitor.clone());
    scheduler.start(config.poll_interval())?;

    signal::ctrl_c().await?;
    tracing::info!("Shutting down gracefully");

    scheduler.stop().await;
    for e in monitor.shutdown().await {
        tracing::warn!(error = %e, "Actuator reset failed");
    }

    let status = monitor.status();
    let stats = scheduler.stats();
    tracing::info!(
        status = %status.label,
        events = monitor.log_len(),
        ticks = stats.completed,
        skipped = stats.skipped,
        failed = stats.failed,
        "homeguard stopped"
    );
    Ok(())
}
