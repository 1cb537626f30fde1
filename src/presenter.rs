//! Outbound notifications for visuals, audio and UI
//!
//! The simulation records [`GameEvent`]s; the host drains them after each frame and
//! forwards them here. Every method defaults to a no-op, so a presenter only
//! implements what it can show, and a missing presenter never affects gameplay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BubbleKind, GameEvent, ModifierKind};

/// Sound effect identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Root bubble popped, Freeze bubble popped
    Pop,
    /// Child bubble popped, Swipe bubble popped, swipe pop
    Swipe,
    /// Explosion
    Dead,
}

/// Floating text color hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextTint {
    #[default]
    Default,
    Green,
    Cyan,
    Yellow,
}

pub trait Presenter {
    fn play_pop_effect(&mut self, _kind: BubbleKind, _pos: Vec2) {}
    fn play_explosion_start(&mut self, _pos: Vec2) {}
    fn play_sound(&mut self, _sound: SoundEffect) {}
    fn report_score(&mut self, _score: u64) {}
    fn report_pop_count(&mut self, _pops: u64) {}
    fn report_coverage(&mut self, _ratio: f32, _display_percent: f32) {}
    fn show_floating_text(&mut self, _text: &str, _pos: Vec2, _tint: TextTint) {}
    fn modifier_changed(&mut self, _kind: ModifierKind, _active: bool, _duration: f32) {}
    fn game_over(&mut self, _score: u64, _pops: u64) {}
    fn session_restarted(&mut self) {}
}

/// Presenter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// Forward events to a presenter in the order they happened
pub fn dispatch(events: &[GameEvent], presenter: &mut dyn Presenter) {
    for event in events {
        match event {
            GameEvent::BubbleSpawned { .. } => {}
            GameEvent::BubblePopped { kind, pos, .. } => presenter.play_pop_effect(*kind, *pos),
            GameEvent::ExplosionStarted { pos, .. } => presenter.play_explosion_start(*pos),
            GameEvent::Sound(sound) => presenter.play_sound(*sound),
            GameEvent::ScoreChanged(score) => presenter.report_score(*score),
            GameEvent::PopCountChanged(pops) => presenter.report_pop_count(*pops),
            GameEvent::CoverageChanged {
                ratio,
                display_percent,
            } => presenter.report_coverage(*ratio, *display_percent),
            GameEvent::FloatingText { text, pos, tint } => {
                presenter.show_floating_text(text, *pos, *tint)
            }
            GameEvent::ModifierStarted { kind, duration } => {
                presenter.modifier_changed(*kind, true, *duration)
            }
            GameEvent::ModifierEnded(kind) => presenter.modifier_changed(*kind, false, 0.0),
            GameEvent::GameOver { score, pops } => presenter.game_over(*score, *pops),
            GameEvent::SessionRestarted => presenter.session_restarted(),
        }
    }
}
