//! Arena bounds
//!
//! The host's viewing bounds, expressed in world units. Bubbles are clamped to the
//! full rectangle; coverage is measured against the confined (playable) rectangle,
//! which trims `margin` of the width and height from every edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Bottom-left corner
    pub min: Vec2,
    /// Top-right corner
    pub max: Vec2,
    /// Fraction of each dimension excluded from the playable area on every edge
    #[serde(default)]
    pub margin: f32,
}

impl Arena {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self::with_margin(min, max, 0.0)
    }

    pub fn with_margin(min: Vec2, max: Vec2, margin: f32) -> Self {
        Self { min, max, margin }
    }

    /// Arena of the given size centered on the origin
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Vec2::new(width, height) * 0.5;
        Self::new(-half, half)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Area bubbles are measured against for coverage
    pub fn playable_area(&self) -> f32 {
        let keep = (1.0 - 2.0 * self.margin).max(0.0);
        (self.width() * keep) * (self.height() * keep)
    }

    /// Clamp a circle's center so the footprint stays inside horizontally and
    /// below the top edge. The bottom edge only bounds the center, so freshly
    /// spawned bubbles may start partly below the arena.
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        let x = if radius * 2.0 >= self.width() {
            self.center().x
        } else {
            pos.x.clamp(self.min.x + radius, self.max.x - radius)
        };
        let top = (self.max.y - radius).max(self.min.y);
        let y = pos.y.clamp(self.min.y, top);
        Vec2::new(x, y)
    }

    /// True when the circle's top edge is at (or past) the arena ceiling
    pub fn touches_top(&self, pos: Vec2, radius: f32) -> bool {
        pos.y + radius >= self.max.y - 1e-4
    }
}
