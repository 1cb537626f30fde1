//! Bubble entities
//!
//! A bubble rises, wobbles sideways and grows until it is popped. Normal bubbles
//! split into smaller children when popped; special bubbles trigger global
//! effects instead (see [`super::pop`]).

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::noise::noise1;
use crate::consts::{PROBE_EPSILON, SPECIAL_CHANCE};
use crate::error::ConfigError;

/// Stable bubble identifier, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

/// Bubble types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BubbleKind {
    #[default]
    Normal,
    /// Enables swipe popping for a while
    Swipe,
    /// Grows, then destroys everything nearby
    Explosive,
    /// Slows every bubble for a while
    Freeze,
}

impl BubbleKind {
    pub fn is_special(&self) -> bool {
        *self != BubbleKind::Normal
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BubbleKind::Normal => "Normal",
            BubbleKind::Swipe => "Swipe",
            BubbleKind::Explosive => "Explosive",
            BubbleKind::Freeze => "Freeze",
        }
    }
}

/// Weighted bubble type roll shared by the spawner and child spawning.
///
/// First roll decides special vs normal, second picks the special kind by weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDistribution {
    pub special_chance: f32,
    pub swipe_weight: f32,
    pub explosive_weight: f32,
    pub freeze_weight: f32,
}

impl Default for TypeDistribution {
    fn default() -> Self {
        Self {
            special_chance: SPECIAL_CHANCE,
            swipe_weight: 1.0,
            explosive_weight: 1.0,
            freeze_weight: 1.0,
        }
    }
}

impl TypeDistribution {
    /// Every bubble is Normal
    pub fn normal_only() -> Self {
        Self {
            special_chance: 0.0,
            ..Default::default()
        }
    }

    fn special_total(&self) -> f32 {
        self.swipe_weight + self.explosive_weight + self.freeze_weight
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.special_chance) {
            return Err(ConfigError::invalid(
                "distribution.special_chance",
                self.special_chance,
                "must be in [0, 1]",
            ));
        }
        let weights = [self.swipe_weight, self.explosive_weight, self.freeze_weight];
        if weights.iter().any(|w| *w < 0.0) || self.special_total() <= 0.0 {
            return Err(ConfigError::invalid(
                "distribution.weights",
                self.special_total(),
                "weights must be non-negative with a positive sum",
            ));
        }
        Ok(())
    }

    /// Probability of rolling `kind`
    pub fn probability(&self, kind: BubbleKind) -> f32 {
        let total = self.special_total();
        let special = |weight: f32| {
            if total > 0.0 {
                self.special_chance * weight / total
            } else {
                0.0
            }
        };
        match kind {
            BubbleKind::Normal if total > 0.0 => 1.0 - self.special_chance,
            BubbleKind::Normal => 1.0,
            BubbleKind::Swipe => special(self.swipe_weight),
            BubbleKind::Explosive => special(self.explosive_weight),
            BubbleKind::Freeze => special(self.freeze_weight),
        }
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> BubbleKind {
        let total = self.special_total();
        if total <= 0.0 || rng.random::<f32>() >= self.special_chance {
            return BubbleKind::Normal;
        }
        let pick = rng.random::<f32>() * total;
        if pick < self.swipe_weight {
            BubbleKind::Swipe
        } else if pick < self.swipe_weight + self.explosive_weight {
            BubbleKind::Explosive
        } else {
            BubbleKind::Freeze
        }
    }
}

/// Per-bubble tunables, set at creation and inherited by children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleParams {
    pub base_points: u32,
    pub rise_speed: f32,
    pub growth_speed: f32,
    pub max_growth_factor: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    pub explosion_scale: f32,
    pub explosion_overlap: f32,
    pub max_generations: u32,
    pub child_count: u32,
    pub child_scale_factor: f32,
    pub child_spread: f32,
    pub child_impulse: f32,
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Normal life: rising, growing, selectable
    Rising,
    /// Explosive bubble after selection: frozen in place, easing up to its
    /// explosion radius until the scheduled resolution fires
    Exploding {
        elapsed: f32,
        duration: f32,
        start_radius: f32,
    },
}

/// Position and size of a bubble at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub id: BubbleId,
    pub pos: Vec2,
    pub radius: f32,
}

/// Per-tick inputs a bubble needs from the session
#[derive(Debug, Clone, Copy)]
pub struct BubbleTickContext {
    pub dt: f32,
    /// Session time in seconds, drives the wobble
    pub time: f32,
    pub arena: Arena,
    /// 1.0 normally, the freeze slowdown factor while Freeze is active
    pub speed_multiplier: f32,
    pub impulse_damping: f32,
    /// Another bubble sits directly above
    pub blocked_above: bool,
}

/// A bubble entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: BubbleId,
    pub kind: BubbleKind,
    /// 0 for spawner-created bubbles, parent + 1 for children
    pub generation: u32,
    pub pos: Vec2,
    /// Radius at growth factor 1
    pub base_scale: f32,
    /// Multiplier on `base_scale`; starts at 1 and never decreases
    pub growth_factor: f32,
    /// Decaying velocity from the split that created this bubble
    pub impulse: Vec2,
    /// Wobble phase offset so siblings don't move in lockstep
    pub wobble_phase: f32,
    pub params: BubbleParams,
    pub state: BubbleState,
    /// Upward motion was blocked on the last tick
    pub blocked: bool,
}

impl Bubble {
    pub fn new(
        id: BubbleId,
        kind: BubbleKind,
        generation: u32,
        pos: Vec2,
        base_scale: f32,
        params: BubbleParams,
    ) -> Self {
        Self {
            id,
            kind,
            generation,
            pos,
            base_scale,
            growth_factor: 1.0,
            impulse: Vec2::ZERO,
            wobble_phase: 0.0,
            params,
            state: BubbleState::Rising,
            blocked: false,
        }
    }

    /// Current radius
    pub fn radius(&self) -> f32 {
        match self.state {
            BubbleState::Rising => self.base_scale * self.growth_factor,
            BubbleState::Exploding {
                elapsed,
                duration,
                start_radius,
            } => {
                let t = if duration > 0.0 { elapsed / duration } else { 1.0 };
                let scale = 1.0 + (self.params.explosion_scale - 1.0) * crate::ease_out_expo(t);
                start_radius * scale
            }
        }
    }

    pub fn footprint(&self) -> Footprint {
        Footprint {
            id: self.id,
            pos: self.pos,
            radius: self.radius(),
        }
    }

    /// Can be clicked, swiped, blocked against or caught in an explosion
    pub fn is_selectable(&self) -> bool {
        matches!(self.state, BubbleState::Rising)
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, BubbleState::Exploding { .. })
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= self.radius() * self.radius()
    }

    /// Radius the explosion animation ends at
    pub fn explosion_final_radius(&self) -> f32 {
        match self.state {
            BubbleState::Exploding { start_radius, .. } => start_radius * self.params.explosion_scale,
            BubbleState::Rising => self.radius() * self.params.explosion_scale,
        }
    }

    /// Radius of the circle that catches other bubbles at resolution
    pub fn explosion_reach(&self) -> f32 {
        self.explosion_final_radius() * self.params.explosion_overlap
    }

    /// Freeze in place and start easing toward the explosion radius
    pub fn start_explosion(&mut self, duration: f32) {
        if self.is_exploding() {
            return;
        }
        self.state = BubbleState::Exploding {
            elapsed: 0.0,
            duration,
            start_radius: self.radius(),
        };
        self.impulse = Vec2::ZERO;
    }

    /// Advance one physics step
    pub fn tick(&mut self, ctx: &BubbleTickContext) {
        if let BubbleState::Exploding {
            ref mut elapsed,
            duration,
            ..
        } = self.state
        {
            *elapsed = (*elapsed + ctx.dt).min(duration);
            return;
        }

        let speed = ctx.speed_multiplier;
        let radius = self.radius();

        self.blocked = ctx.blocked_above || ctx.arena.touches_top(self.pos, radius);
        let rise = if self.blocked {
            0.0
        } else {
            self.params.rise_speed * speed
        };

        let wobble = noise1(ctx.time * self.params.wobble_frequency + self.wobble_phase)
            * self.params.wobble_amplitude
            * speed;

        let velocity = Vec2::new(wobble, rise) + self.impulse * speed;
        self.pos += velocity * ctx.dt;
        self.impulse *= (-ctx.impulse_damping * ctx.dt).exp();

        let growth = self.params.growth_speed * speed;
        self.growth_factor = (self.growth_factor + growth * ctx.dt)
            .min(self.params.max_growth_factor)
            .max(self.growth_factor);

        self.pos = ctx.arena.clamp_circle(self.pos, self.radius());
    }

    /// True if this bubble may split when popped
    pub fn can_spawn_children(&self) -> bool {
        self.kind == BubbleKind::Normal
            && self.params.child_count > 0
            && self.generation < self.params.max_generations
    }

    /// Build the children released by popping this bubble.
    ///
    /// Returns nothing for special kinds, at the generation cap, or when the
    /// parent has no usable size.
    pub fn spawn_children<R, F>(
        &self,
        rng: &mut R,
        distribution: &TypeDistribution,
        mut next_id: F,
    ) -> Vec<Bubble>
    where
        R: Rng + ?Sized,
        F: FnMut() -> BubbleId,
    {
        if !self.can_spawn_children() {
            return Vec::new();
        }

        let child_scale = self.radius() * self.params.child_scale_factor;
        if !(child_scale > f32::EPSILON) {
            log::warn!(
                "Bubble {:?} has no usable size (base_scale {}), skipping children",
                self.id,
                self.base_scale
            );
            return Vec::new();
        }

        let generation = self.generation + 1;
        (0..self.params.child_count)
            .map(|_| {
                let dir = Vec2::from_angle(rng.random_range(0.0..TAU));
                let offset = dir * self.params.child_spread;

                let jitter = random_in_disk(rng, 0.3);
                let push = (dir + jitter).normalize_or_zero();
                let push = if push == Vec2::ZERO { dir } else { push };
                let magnitude = self.params.child_impulse * rng.random_range(0.8..1.3);

                let mut child = Bubble::new(
                    next_id(),
                    distribution.roll(rng),
                    generation,
                    self.pos + offset,
                    child_scale,
                    self.params.clone(),
                );
                child.impulse = push * magnitude;
                child.wobble_phase = rng.random_range(0.0..TAU);
                child
            })
            .collect()
    }
}

/// Uniform random point in a disk of the given radius
fn random_in_disk<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    let r = radius * rng.random::<f32>().sqrt();
    Vec2::from_angle(rng.random_range(0.0..TAU)) * r
}

/// Short upward probe from just above `bubble`'s top edge.
///
/// Blocked when any other footprint touches the probe segment.
pub fn probe_blocked(bubble: &Footprint, others: &[Footprint], probe_distance: f32) -> bool {
    let start = bubble.pos.y + bubble.radius + PROBE_EPSILON;
    let end = start + probe_distance;
    others.iter().any(|other| {
        if other.id == bubble.id {
            return false;
        }
        let closest = Vec2::new(bubble.pos.x, other.pos.y.clamp(start, end));
        other.pos.distance_squared(closest) <= other.radius * other.radius
    })
}
