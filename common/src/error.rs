use thiserror::Error;

/// Rejections raised while turning a remote schedule into [`crate::Schedule`] entries.
///
/// `Protocol` covers structurally broken responses (missing or mistyped fields);
/// `Format` covers fields that are present but unparsable. Both leave the
/// previously active schedule untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("invalid {field} value {value:?}: {reason}")]
    Format {
        field: String,
        value: String,
        reason: &'static str,
    },
    #[error("schedule response is malformed: {0}")]
    Protocol(String),
}

impl ScheduleError {
    pub(crate) fn format(field: impl Into<String>, value: &str, reason: &'static str) -> Self {
        Self::Format {
            field: field.into(),
            value: value.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("line {line}: expected key=value, got {content:?}")]
    Syntax { line: usize, content: String },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
}
