//! Root bubble spawner with an accelerating cadence
//!
//! Every spawn shortens the interval by a fixed step until it reaches the floor.
//! That ramp is the game's whole difficulty curve.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerPhase {
    /// Session over, nothing spawns
    Idle,
    Spawning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub phase: SpawnerPhase,
    initial_interval: f32,
    interval: f32,
    acceleration: f32,
    min_interval: f32,
    /// Width of the horizontal spawn zone, centered on the arena
    pub spawn_width: f32,
    accumulator: f32,
    spawn_count: u32,
}

impl Spawner {
    pub fn new(initial_interval: f32, acceleration: f32, min_interval: f32, spawn_width: f32) -> Self {
        Self {
            phase: SpawnerPhase::Spawning,
            initial_interval,
            interval: initial_interval,
            acceleration,
            min_interval,
            spawn_width,
            accumulator: 0.0,
            spawn_count: 0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Spawns emitted through the timed ramp since the last reset
    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    /// Accumulate time. Returns true when a root bubble is due this tick.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.phase == SpawnerPhase::Idle {
            return false;
        }
        self.accumulator += dt;
        if self.accumulator < self.interval {
            return false;
        }
        self.accumulator = 0.0;
        self.interval = (self.interval - self.acceleration).max(self.min_interval);
        self.spawn_count += 1;
        true
    }

    pub fn stop(&mut self) {
        self.phase = SpawnerPhase::Idle;
    }

    /// Back to the initial interval with an empty accumulator
    pub fn reset(&mut self) {
        self.phase = SpawnerPhase::Spawning;
        self.interval = self.initial_interval;
        self.accumulator = 0.0;
        self.spawn_count = 0;
    }
}
