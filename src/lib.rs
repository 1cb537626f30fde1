//! Bubble Clicker - simulation core for a rising-bubble arcade game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (bubbles, spawner, modifiers, coverage, score)
//! - `tuning`: Data-driven game balance
//! - `presenter`: Outbound notifications for visuals, audio and UI
//! - `stepper`: Frame time to fixed-step conversion

pub mod error;
pub mod presenter;
pub mod sim;
pub mod stepper;
pub mod tuning;

pub use error::ConfigError;
pub use presenter::{NullPresenter, Presenter, SoundEffect};
pub use stepper::FixedStepper;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the stepper will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena defaults (portrait 9:16 viewport, orthographic half-height 5)
    pub const ARENA_HALF_WIDTH: f32 = 2.8;
    pub const ARENA_HALF_HEIGHT: f32 = 5.0;
    pub const CONFINEMENT_MARGIN: f32 = 0.1;

    /// Bubble defaults
    pub const BASE_SCALE: f32 = 0.5;
    pub const BASE_POINTS: u32 = 10;
    pub const RISE_SPEED: f32 = 0.3;
    pub const GROWTH_SPEED: f32 = 0.1;
    pub const MAX_GROWTH_FACTOR: f32 = 5.0;
    pub const WOBBLE_AMPLITUDE: f32 = 0.1;
    pub const WOBBLE_FREQUENCY: f32 = 1.0;
    pub const PROBE_DISTANCE: f32 = 0.05;
    /// Gap between a bubble's top edge and the start of its upward probe
    pub const PROBE_EPSILON: f32 = 0.01;
    pub const IMPULSE_DAMPING: f32 = 3.0;

    /// Explosive bubble defaults
    pub const EXPLOSION_SCALE: f32 = 2.0;
    pub const EXPLOSION_OVERLAP: f32 = 1.25;
    pub const EXPLOSION_DURATION: f32 = 0.8;

    /// Child spawning defaults
    pub const MAX_GENERATIONS: u32 = 4;
    pub const CHILD_COUNT: u32 = 3;
    pub const CHILD_SCALE_FACTOR: f32 = 0.5;
    pub const CHILD_SPREAD: f32 = 0.2;
    pub const CHILD_IMPULSE: f32 = 1.5;

    /// Spawner defaults
    pub const SPAWN_INTERVAL: f32 = 1.5;
    pub const SPAWN_ACCELERATION: f32 = 0.01;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.5;
    pub const SPAWN_WIDTH: f32 = 8.0;

    /// Type distribution defaults (85% normal, the rest split evenly)
    pub const SPECIAL_CHANCE: f32 = 0.15;

    /// Modifier defaults
    pub const SWIPE_DURATION: f32 = 3.0;
    pub const FREEZE_DURATION: f32 = 3.0;
    pub const FREEZE_SLOWDOWN_FACTOR: f32 = 0.1;

    /// Coverage defaults
    pub const COVERAGE_THRESHOLD: f32 = 0.6;
    pub const COVERAGE_SMOOTHING: f32 = 4.0;
}

/// Area of a circle with the given radius
#[inline]
pub fn circle_area(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}

/// True when two circles intersect or touch
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Exponential ease-out on `t` in [0, 1]
#[inline]
pub fn ease_out_expo(t: f32) -> f32 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * t.max(0.0))
    }
}
