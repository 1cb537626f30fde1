//! Pop resolution
//!
//! Pure mapping from "this bubble was popped" to score, pop count and the effects
//! the session must carry out. Nothing here touches session state.

use super::bubble::BubbleKind;
use super::modifiers::ModifierKind;
use crate::presenter::{SoundEffect, TextTint};

/// How the bubble was popped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopTrigger {
    /// Discrete click/tap
    Click,
    /// Touched during a gesture while Swipe is active
    Swipe,
}

/// Side effects of a pop, applied by the session in order
#[derive(Debug, Clone, PartialEq)]
pub enum PopEffect {
    SpawnChildren,
    ActivateModifier(ModifierKind),
    /// Defer destruction until the explosion resolves
    BeginExplosion,
    Sound(SoundEffect),
    FloatingText { text: String, tint: TextTint },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopOutcome {
    pub score: u64,
    pub pops: u64,
    pub effects: Vec<PopEffect>,
}

impl PopOutcome {
    /// The popped bubble leaves the live set right away
    pub fn removes_bubble(&self) -> bool {
        !self.effects.contains(&PopEffect::BeginExplosion)
    }
}

fn scoring(score: u64, pops: u64, sound: SoundEffect, tint: TextTint) -> PopOutcome {
    PopOutcome {
        score,
        pops,
        effects: vec![
            PopEffect::Sound(sound),
            PopEffect::FloatingText {
                text: format!("+{score}"),
                tint,
            },
        ],
    }
}

/// Resolve a pop of `kind` at `generation`
pub fn resolve(kind: BubbleKind, generation: u32, base_points: u32, trigger: PopTrigger) -> PopOutcome {
    let base = u64::from(base_points);

    if trigger == PopTrigger::Swipe {
        return scoring(base, 1, SoundEffect::Swipe, TextTint::Cyan);
    }

    match kind {
        BubbleKind::Normal => {
            let sound = if generation == 0 {
                SoundEffect::Pop
            } else {
                SoundEffect::Swipe
            };
            let score = base * (u64::from(generation) + 1);
            let mut outcome = scoring(score, 1, sound, TextTint::Default);
            outcome.effects.push(PopEffect::SpawnChildren);
            outcome
        }
        BubbleKind::Swipe => {
            let mut outcome = scoring(base, 1, SoundEffect::Swipe, TextTint::Green);
            outcome.effects.insert(0, PopEffect::ActivateModifier(ModifierKind::Swipe));
            outcome
        }
        BubbleKind::Freeze => {
            let mut outcome = scoring(base, 1, SoundEffect::Pop, TextTint::Cyan);
            outcome.effects.insert(0, PopEffect::ActivateModifier(ModifierKind::Freeze));
            outcome
        }
        BubbleKind::Explosive => PopOutcome {
            score: 0,
            pops: 0,
            effects: vec![PopEffect::BeginExplosion],
        },
    }
}

/// Resolve a finished explosion that destroyed `destroyed` other bubbles
pub fn resolve_explosion(base_points: u32, destroyed: u64) -> PopOutcome {
    let base = u64::from(base_points);
    let score = base * 2 + base * destroyed;
    let popped = 1 + destroyed;
    let text = if popped > 1 {
        format!("+{score}\n({popped} popped!)")
    } else {
        format!("+{score}")
    };
    PopOutcome {
        score,
        pops: popped,
        effects: vec![
            PopEffect::Sound(SoundEffect::Dead),
            PopEffect::FloatingText {
                text,
                tint: TextTint::Yellow,
            },
        ],
    }
}
