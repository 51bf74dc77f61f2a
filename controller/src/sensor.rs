use std::path::PathBuf;

use thermd_common::reading::parse_reading;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("cannot read sensor file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sensor file {} holds no temperature reading", path.display())]
    Malformed { path: PathBuf },
}

#[allow(async_fn_in_trait)]
pub trait TemperatureSensor {
    async fn read(&mut self) -> Result<f32, SensorError>;
}

/// Reads the file the thermocouple service keeps overwriting.
#[derive(Debug, Clone)]
pub struct FileSensor {
    path: PathBuf,
}

impl FileSensor {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TemperatureSensor for FileSensor {
    async fn read(&mut self) -> Result<f32, SensorError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SensorError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_reading(&raw).ok_or_else(|| SensorError::Malformed {
            path: self.path.clone(),
        })
    }
}
