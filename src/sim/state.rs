//! Session state and core simulation types
//!
//! One [`Session`] owns everything that changes during a run: the live bubbles,
//! spawner, modifiers, coverage monitor, score and deferred actions. Components
//! never reach each other through globals; they go through the session.

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::Arena;
use super::bubble::{Bubble, BubbleId, BubbleKind, Footprint};
use super::coverage::CoverageMonitor;
use super::modifiers::{ModifierController, ModifierKind, ModifierSnapshot};
use super::pop::{self, PopEffect, PopOutcome, PopTrigger};
use super::schedule::{PendingAction, Scheduler};
use super::score::ScoreBoard;
use super::spawner::Spawner;
use crate::circles_overlap;
use crate::presenter::{SoundEffect, TextTint};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Arena filled up; nothing ticks until restart
    GameOver,
}

/// Notifications for the presenter, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BubbleSpawned {
        id: BubbleId,
        kind: BubbleKind,
        generation: u32,
        pos: Vec2,
    },
    BubblePopped {
        id: BubbleId,
        kind: BubbleKind,
        pos: Vec2,
    },
    ExplosionStarted {
        id: BubbleId,
        pos: Vec2,
    },
    Sound(SoundEffect),
    ScoreChanged(u64),
    PopCountChanged(u64),
    CoverageChanged {
        ratio: f32,
        display_percent: f32,
    },
    FloatingText {
        text: String,
        pos: Vec2,
        tint: TextTint,
    },
    ModifierStarted {
        kind: ModifierKind,
        duration: f32,
    },
    ModifierEnded(ModifierKind),
    GameOver {
        score: u64,
        pops: u64,
    },
    SessionRestarted,
}

/// One play session
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Last known viewing bounds
    pub arena: Arena,
    /// Live bubbles (sorted by id)
    pub bubbles: Vec<Bubble>,
    pub spawner: Spawner,
    pub modifiers: ModifierController,
    pub coverage: CoverageMonitor,
    pub score: ScoreBoard,
    pub scheduler: Scheduler,
    /// Simulated seconds since (re)start
    pub elapsed: f64,
    /// Physics ticks since (re)start
    pub time_ticks: u64,
    seed: u64,
    rng: Pcg32,
    next_id: u32,
    gesture_active: bool,
    swiped_this_gesture: HashSet<BubbleId>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Start a session with the given tuning and RNG seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        if let Err(err) = tuning.validate() {
            log::warn!("Starting session with invalid tuning: {err}");
        }

        let mut session = Self {
            phase: GamePhase::Playing,
            arena: tuning.arena,
            bubbles: Vec::new(),
            spawner: Spawner::new(
                tuning.spawn_interval,
                tuning.spawn_acceleration,
                tuning.min_spawn_interval,
                tuning.spawn_width,
            ),
            modifiers: ModifierController::new(),
            coverage: CoverageMonitor::new(tuning.coverage_threshold, tuning.coverage_smoothing),
            score: ScoreBoard::new(),
            scheduler: Scheduler::new(),
            elapsed: 0.0,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            gesture_active: false,
            swiped_this_gesture: HashSet::new(),
            events: Vec::new(),
            tuning,
        };

        log::info!("Session started (seed {seed})");
        session.spawn_root_bubble();
        session
    }

    /// Start a session with a random seed
    pub fn with_random_seed(tuning: Tuning) -> Self {
        Self::new(tuning, rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new bubble ID
    pub fn next_bubble_id(&mut self) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Clear everything and start over. Pending explosions and modifier windows
    /// are cancelled.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Playing;
        self.bubbles.clear();
        self.scheduler.clear();
        self.spawner.reset();
        self.modifiers.reset();
        self.coverage.reset();
        self.score.reset();
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.gesture_active = false;
        self.swiped_this_gesture.clear();
        // Undrained events from the previous run stay queued ahead of the restart
        self.events.push(GameEvent::SessionRestarted);

        log::info!("Session restarted");
        self.spawn_root_bubble();
    }

    /// Terminal transition. Idempotent.
    pub fn end_session(&mut self) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.score.lock();
        self.spawner.stop();
        self.gesture_active = false;
        self.events.push(GameEvent::GameOver {
            score: self.score.score(),
            pops: self.score.pop_count(),
        });
        log::info!(
            "Game over: score {}, {} bubbles popped, coverage {:.1}%",
            self.score.score(),
            self.score.pop_count(),
            self.coverage.ratio() * 100.0
        );
    }

    /// Adopt new viewing bounds, keeping the configured confinement margin
    pub fn set_arena(&mut self, arena: Arena) {
        if arena.width() <= 0.0 || arena.height() <= 0.0 {
            log::warn!("Ignoring degenerate viewport {arena:?}");
            return;
        }
        if arena.min != self.arena.min || arena.max != self.arena.max {
            log::debug!("Viewport changed to {:?}..{:?}", arena.min, arena.max);
        }
        self.arena = Arena::with_margin(arena.min, arena.max, self.tuning.arena.margin);
    }

    // === Bubbles ===

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.index_of(id).map(|i| &self.bubbles[i])
    }

    pub fn bubble_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.index_of(id).map(|i| &mut self.bubbles[i])
    }

    fn index_of(&self, id: BubbleId) -> Option<usize> {
        self.bubbles.binary_search_by_key(&id, |b| b.id).ok()
    }

    /// Insert a bubble, keeping id order
    pub fn insert_bubble(&mut self, bubble: Bubble) {
        self.events.push(GameEvent::BubbleSpawned {
            id: bubble.id,
            kind: bubble.kind,
            generation: bubble.generation,
            pos: bubble.pos,
        });
        match self.bubbles.binary_search_by_key(&bubble.id, |b| b.id) {
            Ok(i) => self.bubbles[i] = bubble,
            Err(i) => self.bubbles.insert(i, bubble),
        }
    }

    pub fn remove_bubble(&mut self, id: BubbleId) -> Option<Bubble> {
        self.index_of(id).map(|i| self.bubbles.remove(i))
    }

    /// Spawn a generation-0 bubble of the given kind
    pub fn spawn_bubble_at(&mut self, kind: BubbleKind, pos: Vec2) -> BubbleId {
        let id = self.next_bubble_id();
        let mut bubble = Bubble::new(
            id,
            kind,
            0,
            pos,
            self.tuning.base_scale,
            self.tuning.bubble_params(),
        );
        bubble.wobble_phase = self.rng.random_range(0.0..std::f32::consts::TAU);
        self.insert_bubble(bubble);
        id
    }

    /// Spawn a random-kind root bubble somewhere along the bottom edge
    pub fn spawn_root_bubble(&mut self) -> BubbleId {
        let half = self.spawner.spawn_width.min(self.arena.width()).max(0.0) / 2.0;
        let x = if half > 0.0 {
            self.arena.center().x + self.rng.random_range(-half..half)
        } else {
            self.arena.center().x
        };
        let kind = self.tuning.distribution.roll(&mut self.rng);
        let id = self.spawn_bubble_at(kind, Vec2::new(x, self.arena.min.y));
        log::debug!("Spawned {} bubble {:?} at x={x:.2}", kind.as_str(), id);
        id
    }

    /// Smallest selectable bubble containing `point`
    pub fn bubble_at(&self, point: Vec2) -> Option<BubbleId> {
        self.bubbles
            .iter()
            .filter(|b| b.is_selectable() && b.contains_point(point))
            .min_by(|a, b| a.radius().total_cmp(&b.radius()))
            .map(|b| b.id)
    }

    /// Footprints of bubbles that can block or be hit (exploding bubbles excluded)
    pub fn solid_footprints(&self) -> Vec<Footprint> {
        self.bubbles
            .iter()
            .filter(|b| b.is_selectable())
            .map(Bubble::footprint)
            .collect()
    }

    /// Multiplier on rise and growth for the given modifier snapshot
    pub fn speed_multiplier(&self, snapshot: ModifierSnapshot) -> f32 {
        if snapshot.freeze {
            self.tuning.freeze_slowdown_factor
        } else {
            1.0
        }
    }

    // === Selection ===

    /// Discrete click on a bubble. Returns true if it was popped (or started
    /// exploding). Ignored while Swipe is active or after game over.
    pub fn select(&mut self, id: BubbleId) -> bool {
        if self.is_over() || self.modifiers.is_active(ModifierKind::Swipe) {
            return false;
        }
        self.pop(id, PopTrigger::Click)
    }

    /// Start a new drag gesture
    pub fn begin_gesture(&mut self) {
        self.gesture_active = true;
        self.swiped_this_gesture.clear();
    }

    pub fn end_gesture(&mut self) {
        self.gesture_active = false;
    }

    /// Bubble touched during a drag. Pops it only while Swipe is active, at most
    /// once per gesture.
    pub fn swipe_touch(&mut self, id: BubbleId) -> bool {
        if self.is_over() || !self.modifiers.is_active(ModifierKind::Swipe) {
            return false;
        }
        if !self.gesture_active {
            self.begin_gesture();
        }
        if !self.swiped_this_gesture.insert(id) {
            return false;
        }
        self.pop(id, PopTrigger::Swipe)
    }

    fn pop(&mut self, id: BubbleId, trigger: PopTrigger) -> bool {
        let Some(bubble) = self.bubble(id) else {
            return false;
        };
        if !bubble.is_selectable() {
            return false;
        }
        let (kind, generation, pos) = (bubble.kind, bubble.generation, bubble.pos);
        let outcome = pop::resolve(kind, generation, bubble.params.base_points, trigger);
        log::debug!(
            "Popped {} bubble {:?} (gen {generation}, {trigger:?}) for {} points",
            kind.as_str(),
            id,
            outcome.score
        );

        let removes = outcome.removes_bubble();
        self.apply_outcome(id, pos, outcome);
        if removes && let Some(bubble) = self.remove_bubble(id) {
            self.events.push(GameEvent::BubblePopped {
                id,
                kind: bubble.kind,
                pos: bubble.pos,
            });
        }
        true
    }

    fn apply_outcome(&mut self, id: BubbleId, pos: Vec2, outcome: PopOutcome) {
        if outcome.score > 0
            && let Some(score) = self.score.add_score(outcome.score)
        {
            self.events.push(GameEvent::ScoreChanged(score));
        }
        if outcome.pops > 0
            && let Some(pops) = self.score.increment_pop_count(outcome.pops)
        {
            self.events.push(GameEvent::PopCountChanged(pops));
        }

        for effect in outcome.effects {
            match effect {
                PopEffect::SpawnChildren => self.spawn_children_of(id),
                PopEffect::ActivateModifier(kind) => self.activate_modifier(kind),
                PopEffect::BeginExplosion => self.begin_explosion(id),
                PopEffect::Sound(sound) => self.events.push(GameEvent::Sound(sound)),
                PopEffect::FloatingText { text, tint } => {
                    self.events.push(GameEvent::FloatingText { text, pos, tint })
                }
            }
        }
    }

    fn spawn_children_of(&mut self, id: BubbleId) {
        let Some(parent) = self.bubble(id).cloned() else {
            return;
        };
        let mut next_id = self.next_id;
        let children = parent.spawn_children(&mut self.rng, &self.tuning.distribution, || {
            let id = BubbleId(next_id);
            next_id += 1;
            id
        });
        self.next_id = next_id;
        for child in children {
            self.insert_bubble(child);
        }
    }

    fn activate_modifier(&mut self, kind: ModifierKind) {
        let duration = match kind {
            ModifierKind::Swipe => self.tuning.swipe_duration,
            ModifierKind::Freeze => self.tuning.freeze_duration,
        };
        let restarted = self.modifiers.activate(kind, duration);
        if self.modifiers.is_active(kind) {
            log::info!(
                "{kind:?} mode {} for {duration:.1}s",
                if restarted { "restarted" } else { "activated" }
            );
            self.events.push(GameEvent::ModifierStarted { kind, duration });
        }
    }

    fn begin_explosion(&mut self, id: BubbleId) {
        let duration = self.tuning.explosion_duration.max(0.0);
        let fire_at = self.elapsed + f64::from(duration);
        let Some(bubble) = self.bubble_mut(id) else {
            return;
        };
        bubble.start_explosion(duration);
        let pos = bubble.pos;
        self.scheduler
            .schedule(fire_at, PendingAction::ResolveExplosion { bubble: id });
        self.events.push(GameEvent::ExplosionStarted { id, pos });
    }

    // === Deferred actions ===

    pub(crate) fn run_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::ResolveExplosion { bubble } => {
                self.resolve_explosion(bubble);
            }
        }
    }

    /// Destroy every selectable bubble touching the explosion, then the
    /// explosive itself. Returns how many others were destroyed.
    pub fn resolve_explosion(&mut self, id: BubbleId) -> u64 {
        let Some(bomb) = self.bubble(id) else {
            return 0;
        };
        let (center, reach, base_points) = (bomb.pos, bomb.explosion_reach(), bomb.params.base_points);

        let victims: Vec<BubbleId> = self
            .solid_footprints()
            .into_iter()
            .filter(|f| f.id != id && circles_overlap(center, reach, f.pos, f.radius))
            .map(|f| f.id)
            .collect();

        for victim in &victims {
            if let Some(bubble) = self.remove_bubble(*victim) {
                self.events.push(GameEvent::BubblePopped {
                    id: *victim,
                    kind: bubble.kind,
                    pos: bubble.pos,
                });
            }
        }

        let destroyed = victims.len() as u64;
        log::debug!("Explosion {:?} destroyed {destroyed} bubbles", id);
        self.apply_outcome(id, center, pop::resolve_explosion(base_points, destroyed));

        if let Some(bubble) = self.remove_bubble(id) {
            self.events.push(GameEvent::BubblePopped {
                id,
                kind: bubble.kind,
                pos: bubble.pos,
            });
        }
        destroyed
    }

    // === Events ===

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain. The queue only shrinks through
    /// [`Session::drain_events`], so hosts should drain once per frame.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
