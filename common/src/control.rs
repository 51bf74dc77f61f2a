#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterStatus {
    On,
    Off,
    Unknown,
}

impl HeaterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ON" => Some(Self::On),
            "OFF" => Some(Self::Off),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Bang-bang decision without hysteresis.
///
/// An exact match keeps the previous status. Before the first real decision
/// the previous status is `Unknown`; a tie then resolves to `Off` so the
/// heater never starts from an undefined state.
pub fn decide(setpoint: f32, sensed: f32, previous: HeaterStatus) -> HeaterStatus {
    if setpoint < sensed {
        HeaterStatus::Off
    } else if setpoint > sensed {
        HeaterStatus::On
    } else if previous == HeaterStatus::Unknown {
        HeaterStatus::Off
    } else {
        previous
    }
}

/// Per-tick state owned by the control loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub last_temperature: f32,
    pub heater_status: HeaterStatus,
    pub last_sync_success: bool,
    /// Epoch seconds of the last outbound report attempt.
    pub last_report_time: Option<i64>,
    pub sensor_degraded: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            last_temperature: 0.0,
            heater_status: HeaterStatus::Unknown,
            last_sync_success: false,
            last_report_time: None,
            sensor_degraded: false,
        }
    }
}

impl ControlState {
    /// Records a fresh reading and applies the decision law. Returns the new status.
    pub fn apply_reading(&mut self, setpoint: f32, sensed: f32) -> HeaterStatus {
        self.last_temperature = sensed;
        self.sensor_degraded = false;
        self.heater_status = decide(setpoint, sensed, self.heater_status);
        self.heater_status
    }
}
