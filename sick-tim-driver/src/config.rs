//! Driver configuration, loaded from TOML.
//!
//! ```toml
//! warmup_ms = 3000
//!
//! [sensor]
//! address = "192.168.0.1:2112"
//! connect_timeout_ms = 10000
//! model = "tim561"
//!
//! [filter]
//! min_distance = 0.1
//! max_distance = 3.0
//! view_angle = 180.0
//! ```
//!
//! Every key is optional.

use crate::constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_SENSOR_ADDRESS, DEFAULT_WARMUP_MS};
use crate::driver_threads::IngestionSettings;
use crate::error::SickError;
use crate::filter::{FilterConfig, ScanFilter};
use serde::{Deserialize, Serialize};
use sick_tim_data::{model_geometry, ScanGeometry, SickModel};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SensorConfig {
    /// `host:port` of the sensor's data port.
    pub address: String,
    pub connect_timeout_ms: u64,
    pub model: SickModel,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig {
            address: DEFAULT_SENSOR_ADDRESS.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            model: SickModel::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    pub sensor: SensorConfig,
    pub filter: FilterConfig,
    pub warmup_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            sensor: SensorConfig::default(),
            filter: FilterConfig::default(),
            warmup_ms: DEFAULT_WARMUP_MS,
        }
    }
}

impl DriverConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SickError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, SickError> {
        let config: DriverConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn geometry(&self) -> ScanGeometry {
        model_geometry(self.sensor.model)
    }

    pub fn validate(&self) -> Result<(), SickError> {
        if self.sensor.address.is_empty() {
            return Err(SickError::InvalidConfig("sensor address is empty".to_string()));
        }
        if self.sensor.connect_timeout_ms == 0 {
            return Err(SickError::InvalidConfig(
                "connect_timeout_ms must be positive".to_string(),
            ));
        }
        self.filter.validate(&self.geometry())
    }

    pub fn ingestion_settings(&self) -> Result<IngestionSettings, SickError> {
        Ok(IngestionSettings {
            filter: ScanFilter::new(self.filter, self.geometry())?,
            warmup: Duration::from_millis(self.warmup_ms),
        })
    }
}
