use crate::device_info::DeviceInfo;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker written in place of a distance that fell outside the accepted range.
pub const SENTINEL_DISTANCE: f64 = -1.;

/// One decoded `LMDscandata` telegram.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanRecord {
    /// Telegram type, `sSN` for streamed scan data.
    pub command_type: String,
    /// Telegram name, `LMDscandata` for scan data.
    pub command: String,
    pub device: DeviceInfo,
    pub telegram_counter: i64,
    /// Microseconds since the sensor was powered on.
    pub time_since_startup: i64,
    /// Microseconds since power on at the time the telegram was sent.
    pub time_of_transmission: i64,
    /// Angular step between two samples, in 1/10000 degree.
    pub angular_step_width: i64,
    pub number_of_data: usize,
    /// Distances in meters, `number_of_data` entries.
    pub data: Vec<f64>,
}

/// Range readings that passed the distance and angle filters.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilteredScan {
    /// Distance in meters, or [`SENTINEL_DISTANCE`] when out of range.
    pub distances: Vec<f64>,
    /// Beam angle of each entry in `distances`, in radian.
    pub angles_radian: Vec<f64>,
}

impl FilteredScan {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Iterates over `(angle, distance)` pairs whose distance is not the sentinel.
    pub fn valid_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.angles_radian
            .iter()
            .copied()
            .zip(self.distances.iter().copied())
            .filter(|(_, d)| *d != SENTINEL_DISTANCE)
    }
}
