//! Fixed-step simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG owned by the session
//! - Stable iteration order (by bubble ID)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod bubble;
pub mod coverage;
pub mod modifiers;
pub mod noise;
pub mod pop;
pub mod schedule;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use bubble::{
    Bubble, BubbleId, BubbleKind, BubbleParams, BubbleState, BubbleTickContext, Footprint,
    TypeDistribution, probe_blocked,
};
pub use coverage::{CoverageMonitor, CoverageSample};
pub use modifiers::{ModifierController, ModifierKind, ModifierSnapshot, ModifierTimer};
pub use pop::{PopEffect, PopOutcome, PopTrigger};
pub use schedule::{PendingAction, Scheduler};
pub use score::ScoreBoard;
pub use spawner::{Spawner, SpawnerPhase};
pub use state::{GameEvent, GamePhase, Session};
pub use tick::{GestureInput, TickInput, tick};
