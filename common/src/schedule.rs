
use crate::error::ScheduleError;
use crate::time_of_day::TimeOfDay;

/// What `resolve` returns when `now` is earlier than every boundary of the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WrapPolicy {
    /// Use the earliest entry's setpoint (the long-standing behavior).
    #[default]
    FirstEntry,
    /// Carry the latest entry's setpoint past midnight until the first boundary.
    CarryLast,
}

/// How setpoint strings that fail to parse are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetpointParsing {
    /// Reject the whole update.
    #[default]
    Strict,
    /// Fall back to a setpoint of zero.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleEntry {
    pub time: TimeOfDay,
    pub setpoint: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
    wrap_policy: WrapPolicy,
    setpoint_parsing: SetpointParsing,
}

impl Schedule {
    pub fn new(wrap_policy: WrapPolicy, setpoint_parsing: SetpointParsing) -> Self {
        Self {
            entries: Vec::new(),
            wrap_policy,
            setpoint_parsing,
        }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses `(time, setpoint)` string pairs and swaps them in as the full entry
    /// list. Nothing changes unless every pair parses.
    pub fn replace<T, S>(&mut self, pairs: &[(T, S)]) -> Result<(), ScheduleError>
    where
        T: AsRef<str>,
        S: AsRef<str>,
    {
        let mut entries = Vec::with_capacity(pairs.len());
        for (index, (time, setpoint)) in pairs.iter().enumerate() {
            let slot = index + 1;
            let time = TimeOfDay::parse(&format!("time{slot}"), time.as_ref())?;
            let setpoint = self.parse_setpoint(slot, setpoint.as_ref())?;
            entries.push(ScheduleEntry { time, setpoint });
        }

        self.entries = entries;
        self.sort();
        Ok(())
    }

    /// Stable ascending sort by time; entries sharing a time keep their order.
    pub fn sort(&mut self) {
        self.entries.sort_by_key(|entry| entry.time);
    }

    /// Setpoint in force at `now`: the latest entry whose boundary is strictly
    /// before `now`. A boundary equal to `now` has not been crossed yet.
    pub fn resolve(&self, now: TimeOfDay) -> Option<f32> {
        if let Some(entry) = self.entries.iter().rev().find(|entry| entry.time < now) {
            return Some(entry.setpoint);
        }

        let fallback = match self.wrap_policy {
            WrapPolicy::FirstEntry => self.entries.first(),
            WrapPolicy::CarryLast => self.entries.last(),
        };
        fallback.map(|entry| entry.setpoint)
    }

    /// The next boundary that `resolve` will cross after `now`, wrapping to the
    /// earliest entry once the last boundary of the day has passed.
    pub fn next_transition(&self, now: TimeOfDay) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|entry| entry.time >= now)
            .or_else(|| self.entries.first())
    }

    fn parse_setpoint(&self, slot: usize, raw: &str) -> Result<f32, ScheduleError> {
        match raw.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => match self.setpoint_parsing {
                SetpointParsing::Lenient => Ok(0.0),
                SetpointParsing::Strict => Err(ScheduleError::format(
                    format!("temp{slot}"),
                    raw,
                    "not a finite number",
                )),
            },
        }
    }
}
