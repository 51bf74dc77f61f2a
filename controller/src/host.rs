use std::{fs::OpenOptions, path::Path, sync::Mutex, time::Duration};

use anyhow::Context;
use thermd_common::{ControllerConfig, Schedule};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::Args,
    clock::SystemClock,
    control_loop::{ControlLoop, LoopSettings},
    remote::HttpRemote,
    sensor::FileSensor,
    shutdown,
    status_store::StatusStore,
};

pub async fn run(args: Args) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file {}", args.config.display()))?;
    let mut config = ControllerConfig::from_kv_str(&raw)
        .with_context(|| format!("invalid config file {}", args.config.display()))?;
    if let Ok(endpoint) = std::env::var("THERMD_ENDPOINT") {
        config.set_endpoint(&endpoint);
    }

    init_tracing(config.logfile.as_deref())?;
    info!(
        endpoint = %config.endpoint,
        setpoints = config.setpoints,
        timezone = config.timezone.as_deref().unwrap_or("local"),
        "started thermd"
    );

    let (handle, shutdown) = shutdown::channel();
    shutdown::spawn_signal_listener(handle).context("failed to install signal handlers")?;

    let remote = HttpRemote::new(
        config.endpoint.clone(),
        config.setpoints,
        Duration::from_millis(config.request_timeout_ms),
    )
    .context("failed to build HTTP client")?;
    let control = ControlLoop::new(
        remote,
        FileSensor::new(config.sensor_file.clone()),
        SystemClock::new(config.tz()),
        StatusStore::new(config.status_file.clone()),
        Schedule::new(config.wrap_policy, config.setpoint_parsing),
        LoopSettings::from_config(&config),
        shutdown,
    );

    let state = control.run().await;
    info!(
        heater = state.heater_status.as_str(),
        last_temperature = state.last_temperature,
        "exiting"
    );
    Ok(())
}

fn init_tracing(logfile: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}
