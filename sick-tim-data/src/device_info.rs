#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Device block carried in the header of every scan-data telegram.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceInfo {
    pub version_number: i64,
    pub device_number: i64,
    pub serial_number: String,
    pub device_status_1: i64,
    pub device_status_2: i64,
}

impl DeviceInfo {
    /// Both status words are zero while the sensor operates normally.
    pub fn is_nominal(&self) -> bool {
        self.device_status_1 == 0 && self.device_status_2 == 0
    }
}
