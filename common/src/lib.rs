pub mod atomic_file;
pub mod config;
pub mod control;
pub mod error;
pub mod protocol;
pub mod reading;
pub mod schedule;
pub mod time_of_day;

pub use config::ControllerConfig;
pub use control::{decide, ControlState, HeaterStatus};
pub use error::{ConfigError, ScheduleError};
pub use protocol::{ScheduleUpdate, StatusReport};
pub use schedule::{Schedule, ScheduleEntry, SetpointParsing, WrapPolicy};
pub use time_of_day::TimeOfDay;
