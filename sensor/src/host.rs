use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use thermd_common::{atomic_file::write_atomic, reading::format_reading};
use tracing::info;

/// Stand-in for the thermocouple service: keeps the sensor file fresh with a
/// simulated reading so the controller can run without hardware.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::var("SENSOR_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp/temp"));
    let period_ms = interval_ms(std::env::var("SENSOR_INTERVAL_MS").ok().as_deref());
    let base = std::env::var("SENSOR_BASE_TEMP")
        .ok()
        .and_then(|value| value.parse::<f32>().ok())
        .unwrap_or(68.0);

    info!(path = %path.display(), period_ms, "sensor simulator started");

    let mut tick: u64 = 0;
    let mut interval = tokio::time::interval(Duration::from_millis(period_ms));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => {
                info!("sensor simulator stopped");
                return Ok(());
            }
        }
        tick = tick.saturating_add(1);

        let temperature = simulated_reading(base, tick);
        write_atomic(&path, format_reading(temperature).as_bytes())
            .with_context(|| format!("failed to write sensor file {}", path.display()))?;
    }
}

/// Write period from `SENSOR_INTERVAL_MS`. Zero or unparsable values fall
/// back to one second since `tokio::time::interval` rejects a zero period.
fn interval_ms(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(1_000)
}

/// Slow sawtooth around `base`, 0.2 degrees per step over eight steps.
fn simulated_reading(base: f32, tick: u64) -> f32 {
    base + (tick % 8) as f32 * 0.2
}
