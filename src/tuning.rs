//! Data-driven game balance
//!
//! Every gameplay number lives here. A tuning file only needs the keys it wants to
//! change; everything else falls back to the defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{Arena, BubbleParams, TypeDistribution};

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    /// Arena used until the host reports a viewport
    pub arena: Arena,

    // === Bubbles ===
    /// Root bubble radius at growth factor 1
    pub base_scale: f32,
    pub base_points: u32,
    pub rise_speed: f32,
    pub growth_speed: f32,
    pub max_growth_factor: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    /// Stop rising while another bubble sits directly above
    pub block_when_covered: bool,
    pub probe_distance: f32,
    /// Decay rate of child impulse velocity (1/s)
    pub impulse_damping: f32,

    // === Explosive ===
    pub explosion_scale: f32,
    pub explosion_overlap: f32,
    pub explosion_duration: f32,

    // === Children ===
    pub max_generations: u32,
    pub child_count: u32,
    pub child_scale_factor: f32,
    pub child_spread: f32,
    pub child_impulse: f32,

    // === Spawner ===
    pub spawn_interval: f32,
    pub spawn_acceleration: f32,
    pub min_spawn_interval: f32,
    pub spawn_width: f32,
    pub distribution: TypeDistribution,

    // === Modifiers ===
    pub swipe_duration: f32,
    pub freeze_duration: f32,
    /// 0 halts bubbles entirely while Freeze is active, 1 means no slowdown
    pub freeze_slowdown_factor: f32,

    // === Coverage ===
    pub coverage_threshold: f32,
    pub coverage_smoothing: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena: Arena::with_margin(
                Vec2::new(-ARENA_HALF_WIDTH, -ARENA_HALF_HEIGHT),
                Vec2::new(ARENA_HALF_WIDTH, ARENA_HALF_HEIGHT),
                CONFINEMENT_MARGIN,
            ),

            base_scale: BASE_SCALE,
            base_points: BASE_POINTS,
            rise_speed: RISE_SPEED,
            growth_speed: GROWTH_SPEED,
            max_growth_factor: MAX_GROWTH_FACTOR,
            wobble_amplitude: WOBBLE_AMPLITUDE,
            wobble_frequency: WOBBLE_FREQUENCY,
            block_when_covered: true,
            probe_distance: PROBE_DISTANCE,
            impulse_damping: IMPULSE_DAMPING,

            explosion_scale: EXPLOSION_SCALE,
            explosion_overlap: EXPLOSION_OVERLAP,
            explosion_duration: EXPLOSION_DURATION,

            max_generations: MAX_GENERATIONS,
            child_count: CHILD_COUNT,
            child_scale_factor: CHILD_SCALE_FACTOR,
            child_spread: CHILD_SPREAD,
            child_impulse: CHILD_IMPULSE,

            spawn_interval: SPAWN_INTERVAL,
            spawn_acceleration: SPAWN_ACCELERATION,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            spawn_width: SPAWN_WIDTH,
            distribution: TypeDistribution::default(),

            swipe_duration: SWIPE_DURATION,
            freeze_duration: FREEZE_DURATION,
            freeze_slowdown_factor: FREEZE_SLOWDOWN_FACTOR,

            coverage_threshold: COVERAGE_THRESHOLD,
            coverage_smoothing: COVERAGE_SMOOTHING,
        }
    }
}

impl Tuning {
    /// Parse a tuning from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check every tunable, returning the first one out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena.width() > 0.0 && self.arena.height() > 0.0) {
            return Err(ConfigError::invalid(
                "arena",
                self.arena.width().min(self.arena.height()),
                "arena must have positive width and height",
            ));
        }
        if !(0.0..0.5).contains(&self.arena.margin) {
            return Err(ConfigError::invalid(
                "arena.margin",
                self.arena.margin,
                "must be in [0, 0.5)",
            ));
        }
        if self.base_scale <= 0.0 {
            return Err(ConfigError::invalid(
                "base_scale",
                self.base_scale,
                "must be positive",
            ));
        }
        if self.max_growth_factor < 1.0 {
            return Err(ConfigError::invalid(
                "max_growth_factor",
                self.max_growth_factor,
                "must be at least 1",
            ));
        }
        if self.rise_speed < 0.0 || self.growth_speed < 0.0 {
            return Err(ConfigError::invalid(
                "growth_speed",
                self.rise_speed.min(self.growth_speed),
                "speeds must be non-negative",
            ));
        }
        if self.child_scale_factor <= 0.0 || self.child_scale_factor > 1.0 {
            return Err(ConfigError::invalid(
                "child_scale_factor",
                self.child_scale_factor,
                "must be in (0, 1]",
            ));
        }
        if self.spawn_interval <= 0.0 {
            return Err(ConfigError::invalid(
                "spawn_interval",
                self.spawn_interval,
                "must be positive",
            ));
        }
        if self.min_spawn_interval <= 0.0 || self.min_spawn_interval > self.spawn_interval {
            return Err(ConfigError::invalid(
                "min_spawn_interval",
                self.min_spawn_interval,
                "must be positive and no larger than spawn_interval",
            ));
        }
        if self.spawn_acceleration < 0.0 {
            return Err(ConfigError::invalid(
                "spawn_acceleration",
                self.spawn_acceleration,
                "must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.freeze_slowdown_factor) {
            return Err(ConfigError::invalid(
                "freeze_slowdown_factor",
                self.freeze_slowdown_factor,
                "must be in [0, 1]",
            ));
        }
        if self.coverage_threshold <= 0.0 || self.coverage_threshold > 1.0 {
            return Err(ConfigError::invalid(
                "coverage_threshold",
                self.coverage_threshold,
                "must be in (0, 1]",
            ));
        }
        if self.explosion_scale < 1.0 || self.explosion_overlap <= 0.0 {
            return Err(ConfigError::invalid(
                "explosion_scale",
                self.explosion_scale,
                "explosion must not shrink the bubble",
            ));
        }
        self.distribution.validate()
    }

    /// Tunables handed to every spawner-created bubble
    pub fn bubble_params(&self) -> BubbleParams {
        BubbleParams {
            base_points: self.base_points,
            rise_speed: self.rise_speed,
            growth_speed: self.growth_speed,
            max_growth_factor: self.max_growth_factor,
            wobble_amplitude: self.wobble_amplitude,
            wobble_frequency: self.wobble_frequency,
            explosion_scale: self.explosion_scale,
            explosion_overlap: self.explosion_overlap,
            max_generations: self.max_generations,
            child_count: self.child_count,
            child_scale_factor: self.child_scale_factor,
            child_spread: self.child_spread,
            child_impulse: self.child_impulse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_interval": 2.0, "child_count": 5 }"#).unwrap();
        assert_eq!(tuning.spawn_interval, 2.0);
        assert_eq!(tuning.child_count, 5);
        assert_eq!(tuning.base_points, BASE_POINTS);
        assert_eq!(tuning.min_spawn_interval, MIN_SPAWN_INTERVAL);
    }

    #[test]
    fn test_distribution_overrides() {
        let tuning =
            Tuning::from_json(r#"{ "distribution": { "special_chance": 0.5 } }"#).unwrap();
        assert_eq!(tuning.distribution.special_chance, 0.5);
        assert_eq!(tuning.distribution.swipe_weight, 1.0);
    }

    #[test]
    fn test_validate_rejects_zero_base_scale() {
        let tuning = Tuning {
            base_scale: 0.0,
            ..Default::default()
        };
        match tuning.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "base_scale"),
            other => panic!("expected invalid base_scale, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_min_interval_above_start() {
        let tuning = Tuning {
            spawn_interval: 0.4,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bubble_params_mirror_tuning() {
        let tuning = Tuning {
            base_points: 7,
            max_generations: 2,
            ..Default::default()
        };
        let params = tuning.bubble_params();
        assert_eq!(params.base_points, 7);
        assert_eq!(params.max_generations, 2);
        assert_eq!(params.child_count, tuning.child_count);
    }
}
