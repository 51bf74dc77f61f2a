use serde::Serialize;
use serde_json::{Map, Value};

use crate::control::HeaterStatus;
use crate::error::ScheduleError;

/// Raw `(time, setpoint)` pairs pulled from the remote authority, in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleUpdate {
    pub pairs: Vec<(String, String)>,
}

impl ScheduleUpdate {
    /// Extracts `time1..timeN` and `temp1..tempN` from a pull response.
    ///
    /// Every field must be present and a JSON string; anything else is a
    /// protocol error and no partial update is produced.
    pub fn from_json(body: &Value, setpoints: usize) -> Result<Self, ScheduleError> {
        let object = body
            .as_object()
            .ok_or_else(|| ScheduleError::Protocol("response is not a JSON object".to_string()))?;

        let pairs = (1..=setpoints)
            .map(|slot| {
                let time = string_field(object, &format!("time{slot}"))?;
                let temp = string_field(object, &format!("temp{slot}"))?;
                Ok((time, temp))
            })
            .collect::<Result<Vec<_>, ScheduleError>>()?;
        Ok(Self { pairs })
    }

    pub fn from_slice(body: &[u8], setpoints: usize) -> Result<Self, ScheduleError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| ScheduleError::Protocol(format!("invalid JSON: {err}")))?;
        Self::from_json(&value, setpoints)
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<String, ScheduleError> {
    match object.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ScheduleError::Protocol(format!("field {key} is not a string"))),
        None => Err(ScheduleError::Protocol(format!("missing field {key}"))),
    }
}

/// Body of the status report pushed back to the remote authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub current_temp: String,
    pub status: &'static str,
}

impl StatusReport {
    pub fn new(temperature: f32, status: HeaterStatus) -> Self {
        Self {
            current_temp: format!("{temperature:.2}"),
            status: status.as_str(),
        }
    }
}
