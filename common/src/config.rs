use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::ConfigError;
use crate::schedule::{SetpointParsing, WrapPolicy};

/// Upper bound for `setpoints`. Forty-eight slots is a half-hourly day.
pub const MAX_SETPOINTS: usize = 48;

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub endpoint: String,
    pub logfile: Option<PathBuf>,
    pub sensor_file: PathBuf,
    pub status_file: PathBuf,
    pub setpoints: usize,
    pub tick_interval_ms: u64,
    pub retry_delay_ms: u64,
    pub request_timeout_ms: u64,
    pub sensor_retries: u32,
    pub sensor_retry_delay_ms: u64,
    pub timezone: Option<String>,
    pub wrap_policy: WrapPolicy,
    pub setpoint_parsing: SetpointParsing,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9000".to_string(),
            logfile: None,
            sensor_file: PathBuf::from("/tmp/temp"),
            status_file: PathBuf::from("/tmp/status"),
            setpoints: 3,
            tick_interval_ms: 1_000,
            retry_delay_ms: 1_000,
            request_timeout_ms: 10_000,
            sensor_retries: 3,
            sensor_retry_delay_ms: 1_000,
            timezone: None,
            wrap_policy: WrapPolicy::FirstEntry,
            setpoint_parsing: SetpointParsing::Strict,
        }
    }
}

impl ControllerConfig {
    /// Parses a `key=value` file. Blank lines and `#` comments are skipped,
    /// unknown keys are ignored and missing keys keep their defaults.
    pub fn from_kv_str(input: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Syntax {
                    line: index + 1,
                    content: line.to_string(),
                });
            };
            config.apply(key.trim(), value.trim())?;
        }

        config.endpoint = normalize_endpoint(&config.endpoint);
        Ok(config)
    }

    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = normalize_endpoint(endpoint);
    }

    pub fn tz(&self) -> Option<Tz> {
        self.timezone.as_deref().and_then(|name| name.parse().ok())
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "endpoint" => self.endpoint = non_empty("endpoint", value)?.to_string(),
            "logfile" => self.logfile = optional(value).map(PathBuf::from),
            "sensor_file" => self.sensor_file = PathBuf::from(non_empty("sensor_file", value)?),
            "status_file" => self.status_file = PathBuf::from(non_empty("status_file", value)?),
            "setpoints" => {
                self.setpoints = number("setpoints", value)?;
                if !(1..=MAX_SETPOINTS).contains(&self.setpoints) {
                    return Err(invalid("setpoints", value));
                }
            }
            "tick_interval_ms" => self.tick_interval_ms = positive("tick_interval_ms", value)?,
            "retry_delay_ms" => self.retry_delay_ms = positive("retry_delay_ms", value)?,
            "request_timeout_ms" => {
                self.request_timeout_ms = positive("request_timeout_ms", value)?
            }
            "sensor_retries" => self.sensor_retries = number("sensor_retries", value)?,
            "sensor_retry_delay_ms" => {
                self.sensor_retry_delay_ms = number("sensor_retry_delay_ms", value)?
            }
            "timezone" => {
                self.timezone = match optional(value) {
                    Some(name) => {
                        name.parse::<Tz>()
                            .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))?;
                        Some(name.to_string())
                    }
                    None => None,
                }
            }
            "wrap_policy" => {
                self.wrap_policy = match value {
                    "first" => WrapPolicy::FirstEntry,
                    "carry_last" => WrapPolicy::CarryLast,
                    _ => return Err(invalid("wrap_policy", value)),
                }
            }
            "setpoint_parsing" => {
                self.setpoint_parsing = match value {
                    "strict" => SetpointParsing::Strict,
                    "lenient" => SetpointParsing::Lenient,
                    _ => return Err(invalid("setpoint_parsing", value)),
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

fn optional(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn non_empty<'a>(key: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    optional(value).ok_or_else(|| invalid(key, value))
}

fn number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match number(key, value)? {
        0 => Err(invalid(key, value)),
        n => Ok(n),
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}
