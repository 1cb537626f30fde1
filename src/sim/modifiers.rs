//! Timed global modifiers (Swipe, Freeze)
//!
//! Each kind is an independent countdown. Activating a kind that is already active
//! restarts its timer at the new duration; windows never stack.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Continuous-drag popping
    Swipe,
    /// Multiplicative slowdown of rise and growth
    Freeze,
}

impl ModifierKind {
    pub const ALL: [ModifierKind; 2] = [ModifierKind::Swipe, ModifierKind::Freeze];
}

/// One countdown timer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierTimer {
    pub active: bool,
    pub remaining: f32,
    pub total: f32,
}

impl ModifierTimer {
    /// Fraction of the window left, 0 when inactive
    pub fn fraction_remaining(&self) -> f32 {
        if self.active && self.total > 0.0 {
            (self.remaining / self.total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Immutable view of which modifiers are active, taken at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierSnapshot {
    pub swipe: bool,
    pub freeze: bool,
}

/// Both modifier timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierController {
    swipe: ModifierTimer,
    freeze: ModifierTimer,
}

impl ModifierController {
    pub fn new() -> Self {
        Self::default()
    }

    fn timer_mut(&mut self, kind: ModifierKind) -> &mut ModifierTimer {
        match kind {
            ModifierKind::Swipe => &mut self.swipe,
            ModifierKind::Freeze => &mut self.freeze,
        }
    }

    pub fn timer(&self, kind: ModifierKind) -> &ModifierTimer {
        match kind {
            ModifierKind::Swipe => &self.swipe,
            ModifierKind::Freeze => &self.freeze,
        }
    }

    pub fn is_active(&self, kind: ModifierKind) -> bool {
        self.timer(kind).active
    }

    pub fn remaining(&self, kind: ModifierKind) -> f32 {
        self.timer(kind).remaining
    }

    /// Start (or restart) a modifier window.
    ///
    /// Returns true if the modifier was already active and got restarted. A
    /// non-positive duration is ignored.
    pub fn activate(&mut self, kind: ModifierKind, duration: f32) -> bool {
        if duration <= 0.0 {
            log::warn!("Ignoring {kind:?} activation with duration {duration}");
            return false;
        }
        let timer = self.timer_mut(kind);
        let restarted = timer.active;
        timer.active = true;
        timer.total = duration;
        timer.remaining = duration;
        restarted
    }

    /// Count every active timer down by `dt`, returning the kinds that expired
    pub fn update(&mut self, dt: f32) -> Vec<ModifierKind> {
        let mut expired = Vec::new();
        for kind in ModifierKind::ALL {
            let timer = self.timer_mut(kind);
            if !timer.active {
                continue;
            }
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                timer.remaining = 0.0;
                timer.active = false;
                expired.push(kind);
            }
        }
        expired
    }

    pub fn snapshot(&self) -> ModifierSnapshot {
        ModifierSnapshot {
            swipe: self.swipe.active,
            freeze: self.freeze.active,
        }
    }

    /// Cancel every window (session restart)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
