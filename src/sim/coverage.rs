//! Arena coverage monitor
//!
//! Sums bubble areas against the playable area once per physics tick. Only the raw
//! ratio decides game over; the smoothed value exists for display.

use serde::{Deserialize, Serialize};

use crate::circle_area;

/// Result of one coverage sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSample {
    pub ratio: f32,
    pub display: f32,
    /// True only on the sample that first crossed the threshold
    pub crossed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageMonitor {
    threshold: f32,
    smoothing: f32,
    ratio: f32,
    display: f32,
    triggered: bool,
    /// Degenerate playable area already reported
    #[serde(skip)]
    area_warned: bool,
}

impl CoverageMonitor {
    pub fn new(threshold: f32, smoothing: f32) -> Self {
        Self {
            threshold,
            smoothing,
            ratio: 0.0,
            display: 0.0,
            triggered: false,
            area_warned: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Last raw ratio, in [0, 1]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Smoothed ratio for display
    pub fn display_ratio(&self) -> f32 {
        self.display
    }

    /// Smoothed ratio as a percentage of the threshold, clamped to [0, 100]
    pub fn display_percent(&self) -> f32 {
        (self.display / self.threshold * 100.0).clamp(0.0, 100.0)
    }

    pub fn has_triggered(&self) -> bool {
        self.triggered
    }

    /// Sample the given radii against the playable area.
    ///
    /// A zero or negative playable area leaves the ratio at its last value.
    pub fn sample<I>(&mut self, radii: I, playable_area: f32, dt: f32) -> CoverageSample
    where
        I: IntoIterator<Item = f32>,
    {
        if playable_area > 0.0 {
            let total: f32 = radii.into_iter().map(circle_area).sum();
            self.ratio = (total / playable_area).clamp(0.0, 1.0);
            self.area_warned = false;
        } else if !self.area_warned {
            log::warn!("Playable area is {playable_area}, skipping coverage samples");
            self.area_warned = true;
        }

        let blend = (self.smoothing * dt).clamp(0.0, 1.0);
        self.display += (self.ratio - self.display) * blend;

        let crossed = !self.triggered && self.ratio >= self.threshold;
        if crossed {
            self.triggered = true;
        }

        CoverageSample {
            ratio: self.ratio,
            display: self.display,
            crossed,
        }
    }

    pub fn reset(&mut self) {
        self.ratio = 0.0;
        self.display = 0.0;
        self.triggered = false;
        self.area_warned = false;
    }
}
