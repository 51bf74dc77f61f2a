use std::time::Duration;

use thermd_common::{
    ControlState, ControllerConfig, HeaterStatus, Schedule, ScheduleError, StatusReport,
    TimeOfDay,
};
use tracing::{debug, error, info, warn};

use crate::{
    clock::Clock,
    remote::{RemoteAuthority, SyncError},
    sensor::TemperatureSensor,
    shutdown::Shutdown,
    status_store::{StatusRecord, StatusStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub tick_interval: Duration,
    pub retry_delay: Duration,
    /// Extra sensor reads after the first failure, per tick.
    pub sensor_retries: u32,
    pub sensor_retry_delay: Duration,
}

impl LoopSettings {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            sensor_retries: config.sensor_retries,
            sensor_retry_delay: Duration::from_millis(config.sensor_retry_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Completed { setpoint: f32, status: HeaterStatus },
    /// No decision this tick; the heater keeps its previous status.
    Skipped,
    Cancelled,
}

enum Sensed {
    Reading(f32),
    Unavailable,
    Cancelled,
}

/// Sync, sense, resolve, decide, persist, report, wait. One tick at a time,
/// never overlapping.
pub struct ControlLoop<R, S, C> {
    remote: R,
    sensor: S,
    clock: C,
    store: StatusStore,
    schedule: Schedule,
    state: ControlState,
    settings: LoopSettings,
    shutdown: Shutdown,
}

impl<R, S, C> ControlLoop<R, S, C>
where
    R: RemoteAuthority,
    S: TemperatureSensor,
    C: Clock,
{
    pub fn new(
        remote: R,
        sensor: S,
        clock: C,
        store: StatusStore,
        schedule: Schedule,
        settings: LoopSettings,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            remote,
            sensor,
            clock,
            store,
            schedule,
            state: ControlState::default(),
            settings,
            shutdown,
        }
    }

    /// Runs until shutdown is requested and returns the final state.
    pub async fn run(mut self) -> ControlState {
        info!("control loop started");
        loop {
            if self.tick().await == TickOutcome::Cancelled {
                break;
            }
            if !self.shutdown.sleep(self.settings.tick_interval).await {
                break;
            }
        }
        info!("control loop stopped");
        self.state
    }

    pub async fn tick(&mut self) -> TickOutcome {
        if !self.sync().await || self.shutdown.is_requested() {
            return TickOutcome::Cancelled;
        }

        let sensed = match self.sense().await {
            Sensed::Reading(temperature) => temperature,
            Sensed::Unavailable => {
                self.state.sensor_degraded = true;
                return TickOutcome::Skipped;
            }
            Sensed::Cancelled => return TickOutcome::Cancelled,
        };
        info!(temperature = sensed, "temperature sensed");

        let now = self.clock.now();
        let time_of_day = TimeOfDay::normalize(&now);
        let Some(setpoint) = self.schedule.resolve(time_of_day) else {
            warn!("no schedule entries to resolve against");
            return TickOutcome::Skipped;
        };
        info!(setpoint, at = %time_of_day, "setpoint resolved");
        if let Some(next) = self.schedule.next_transition(time_of_day) {
            debug!(next_at = %next.time, next_setpoint = next.setpoint, "next schedule transition");
        }

        let previous = self.state.heater_status;
        let status = self.state.apply_reading(setpoint, sensed);
        if status != previous {
            info!(from = previous.as_str(), to = status.as_str(), "heater status changed");
        }

        let timestamp = now.timestamp();
        if let Err(err) = self.store.persist(StatusRecord { status, timestamp }).await {
            error!("failed to persist heater status: {err}");
        }

        self.state.last_report_time = Some(timestamp);
        if let Err(err) = self.remote.push(&StatusReport::new(sensed, status)).await {
            warn!("status report dropped: {err}");
        }

        TickOutcome::Completed { setpoint, status }
    }

    /// Pulls until a usable schedule is in place. Transport failures retry
    /// forever at a fixed delay; a rejected update keeps the previous schedule
    /// and only retries when there is nothing to fall back on.
    /// Returns `false` if shutdown interrupted the wait.
    async fn sync(&mut self) -> bool {
        let mut attempt: u64 = 0;
        loop {
            if self.shutdown.is_requested() {
                return false;
            }
            attempt += 1;

            match self.remote.pull().await {
                Ok(update) => match self.schedule.replace(update.pairs.as_slice()) {
                    Ok(()) => {
                        self.state.last_sync_success = true;
                        debug!(attempt, entries = self.schedule.entries().len(), "schedule synchronized");
                        return true;
                    }
                    Err(err) => {
                        if self.reject_update(&err) {
                            return true;
                        }
                    }
                },
                Err(SyncError::Schedule(err)) => {
                    if self.reject_update(&err) {
                        return true;
                    }
                }
                Err(err) => {
                    self.state.last_sync_success = false;
                    info!(attempt, "server not available, retrying: {err}");
                }
            }

            if !self.shutdown.sleep(self.settings.retry_delay).await {
                return false;
            }
        }
    }

    /// Returns whether a previously synchronized schedule is still usable.
    fn reject_update(&mut self, err: &ScheduleError) -> bool {
        self.state.last_sync_success = false;
        if self.schedule.is_empty() {
            warn!("discarding schedule update, no schedule yet: {err}");
            false
        } else {
            warn!("discarding schedule update, keeping previous schedule: {err}");
            true
        }
    }

    async fn sense(&mut self) -> Sensed {
        let attempts = self.settings.sensor_retries.saturating_add(1);
        for attempt in 1..=attempts {
            match self.sensor.read().await {
                Ok(temperature) => return Sensed::Reading(temperature),
                Err(err) if attempt < attempts => {
                    warn!(attempt, "sensor read failed, retrying: {err}");
                    if !self.shutdown.sleep(self.settings.sensor_retry_delay).await {
                        return Sensed::Cancelled;
                    }
                }
                Err(err) => {
                    error!(attempts, "sensor unavailable, skipping decision: {err}");
                }
            }
        }
        Sensed::Unavailable
    }
}
