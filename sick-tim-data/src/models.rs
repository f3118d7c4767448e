#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Supported sensor models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SickModel {
    Tim551,
    #[default]
    Tim561,
    Tim571,
}

/// Angular layout of one full scan.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanGeometry {
    /// Number of samples in one scan.
    pub datagram_size: usize,
    /// Angle of the first sample, in degree.
    pub start_angle: f64,
    /// Angle of the last sample, in degree.
    pub stop_angle: f64,
}

impl ScanGeometry {
    /// Total field of view, in degree.
    pub fn sensor_angle(&self) -> f64 {
        self.stop_angle - self.start_angle
    }

    /// Evenly spaced beam angles in radian, both end points included.
    pub fn angles_radian(&self) -> Vec<f64> {
        let start = self.start_angle.to_radians();
        let stop = self.stop_angle.to_radians();
        match self.datagram_size {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (stop - start) / ((n - 1) as f64);
                (0..n)
                    .map(|i| if i == n - 1 { stop } else { start + (i as f64) * step })
                    .collect()
            }
        }
    }
}

pub fn model_geometry(model: SickModel) -> ScanGeometry {
    match model {
        SickModel::Tim551 => ScanGeometry {
            datagram_size: 271,
            start_angle: -45.,
            stop_angle: 225.,
        },
        SickModel::Tim561 | SickModel::Tim571 => ScanGeometry {
            datagram_size: 811,
            start_angle: -45.,
            stop_angle: 225.,
        },
    }
}
