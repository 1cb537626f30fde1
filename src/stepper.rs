//! Frame time to fixed-step conversion
//!
//! Rendering runs at whatever rate the host manages; physics always advances in
//! `SIM_DT` steps. Leftover time carries over to the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one frame of `frame_dt` seconds, calling `step` once per
    /// fixed step that is due. Returns the number of steps taken.
    ///
    /// Long frames are clamped to `MAX_FRAME_DT` and at most `MAX_SUBSTEPS`
    /// steps run per frame to prevent a spiral of death.
    pub fn advance<F: FnMut(f32)>(&mut self, frame_dt: f32, mut step: F) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }

    /// Drop any carried time (after a pause or restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
