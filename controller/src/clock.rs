use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use chrono_tz::Tz;

pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the configured timezone, or the host's local time when none is set.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Option<Tz>,
}

impl SystemClock {
    pub fn new(tz: Option<Tz>) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.tz {
            Some(tz) => {
                let local = Utc::now().with_timezone(&tz);
                local.with_timezone(&local.offset().fix())
            }
            None => {
                let local = Local::now();
                local.with_timezone(&local.offset().fix())
            }
        }
    }
}
