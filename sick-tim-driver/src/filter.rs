use crate::constants::{DEFAULT_MAX_DISTANCE, DEFAULT_MIN_DISTANCE, DEFAULT_VIEW_ANGLE};
use crate::error::SickError;
use serde::{Deserialize, Serialize};
use sick_tim_data::{FilteredScan, ScanGeometry, ScanRecord, SENTINEL_DISTANCE};
use std::borrow::Cow;
use std::ops::Range;

/// Replaces every distance outside the open interval `(min_distance, max_distance)`
/// with [`SENTINEL_DISTANCE`].
pub fn clean_by_distance(samples: &[f64], min_distance: f64, max_distance: f64) -> Vec<f64> {
    samples
        .iter()
        .map(|&d| {
            if d > min_distance && d < max_distance {
                d
            } else {
                SENTINEL_DISTANCE
            }
        })
        .collect()
}

/// Index range of the centered window covering `view_angle` degree.
///
/// The window holds `floor((datagram_size / sensor_angle) * (view_angle / 2))`
/// samples around `len / 2`. Even-sized windows start one sample earlier.
pub fn angle_window(
    len: usize,
    view_angle: f64,
    geometry: &ScanGeometry,
) -> Result<Range<usize>, SickError> {
    let sensor_angle = geometry.sensor_angle();
    if !view_angle.is_finite() || view_angle <= 0. || view_angle > sensor_angle {
        return Err(SickError::InvalidViewAngle(view_angle));
    }

    let window = ((geometry.datagram_size as f64 / sensor_angle) * (view_angle / 2.)).floor() as usize;
    let midpoint = (len / 2) as isize;
    let mut start = midpoint - (window / 2) as isize;
    if window % 2 == 0 {
        start -= 1;
    }
    let end = start + window as isize;

    if start < 0 || end > len as isize {
        return Err(SickError::WindowOutOfBounds { start, end, len });
    }
    Ok(start as usize..end as usize)
}

/// Keeps the centered window of `samples` that covers `view_angle` degree.
pub fn clean_by_angle(
    samples: &[f64],
    view_angle: f64,
    geometry: &ScanGeometry,
) -> Result<Vec<f64>, SickError> {
    let window = angle_window(samples.len(), view_angle, geometry)?;
    Ok(samples[window].to_vec())
}

/// Distance bounds in meter and the requested view angle in degree.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_distance: f64,
    pub max_distance: f64,
    pub view_angle: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            min_distance: DEFAULT_MIN_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            view_angle: DEFAULT_VIEW_ANGLE,
        }
    }
}

impl FilterConfig {
    pub fn validate(&self, geometry: &ScanGeometry) -> Result<(), SickError> {
        if !self.min_distance.is_finite() || !self.max_distance.is_finite() {
            return Err(SickError::InvalidConfig(
                "distance bounds must be finite".to_string(),
            ));
        }
        if self.min_distance >= self.max_distance {
            return Err(SickError::InvalidConfig(format!(
                "min_distance {} must be below max_distance {}",
                self.min_distance, self.max_distance
            )));
        }
        angle_window(geometry.datagram_size, self.view_angle, geometry)?;
        Ok(())
    }
}

/// Applies the distance filter and then the angle filter to decoded scans.
#[derive(Clone, Debug)]
pub struct ScanFilter {
    config: FilterConfig,
    geometry: ScanGeometry,
    angles_radian: Vec<f64>,
}

impl ScanFilter {
    pub fn new(config: FilterConfig, geometry: ScanGeometry) -> Result<Self, SickError> {
        config.validate(&geometry)?;
        Ok(ScanFilter {
            config,
            geometry,
            angles_radian: geometry.angles_radian(),
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn apply(&self, record: &ScanRecord) -> Result<FilteredScan, SickError> {
        let cleaned = clean_by_distance(
            &record.data,
            self.config.min_distance,
            self.config.max_distance,
        );
        let window = angle_window(cleaned.len(), self.config.view_angle, &self.geometry)?;
        let angles = self.angles_for(cleaned.len());
        Ok(FilteredScan {
            distances: cleaned[window.clone()].to_vec(),
            angles_radian: angles[window].to_vec(),
        })
    }

    fn angles_for(&self, len: usize) -> Cow<'_, [f64]> {
        if len == self.angles_radian.len() {
            Cow::Borrowed(&self.angles_radian)
        } else {
            let geometry = ScanGeometry {
                datagram_size: len,
                ..self.geometry
            };
            Cow::Owned(geometry.angles_radian())
        }
    }
}
