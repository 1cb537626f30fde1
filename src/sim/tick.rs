//! Fixed timestep simulation tick
//!
//! Advances a session by one physics step. Frame-rate independent: the host
//! calls this at `SIM_DT` through [`crate::FixedStepper`].

use super::arena::Arena;
use super::bubble::{BubbleId, BubbleTickContext, probe_blocked};
use super::state::{GameEvent, Session};

/// Drag gesture input for a single tick
#[derive(Debug, Clone, Default)]
pub struct GestureInput {
    /// A drag started this tick (clears the swiped set)
    pub begin: bool,
    /// Bubbles under the pointer while dragging
    pub touched: Vec<BubbleId>,
    /// The drag ended this tick
    pub end: bool,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Discrete clicks/taps, already resolved to bubbles by the host
    pub selections: Vec<BubbleId>,
    pub gesture: GestureInput,
    /// Current visible bounds, if the host reported them
    pub viewport: Option<Arena>,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    if session.is_over() {
        return;
    }

    if let Some(viewport) = input.viewport {
        session.set_arena(viewport);
    }

    // Every bubble sees the modifier state from the start of the tick
    let snapshot = session.modifiers.snapshot();

    for kind in session.modifiers.update(dt) {
        log::info!("{kind:?} mode ended");
        session.push_event(GameEvent::ModifierEnded(kind));
    }

    // Input
    for &id in &input.selections {
        session.select(id);
    }
    if input.gesture.begin {
        session.begin_gesture();
    }
    for &id in &input.gesture.touched {
        session.swipe_touch(id);
    }
    if input.gesture.end {
        session.end_gesture();
    }

    session.time_ticks += 1;
    session.elapsed += f64::from(dt);

    // Deferred actions
    for action in session.scheduler.drain_due(session.elapsed) {
        session.run_action(action);
    }

    if session.spawner.tick(dt) {
        session.spawn_root_bubble();
    }

    // Bubbles
    let tuning = &session.tuning;
    let footprints = if tuning.block_when_covered {
        session.solid_footprints()
    } else {
        Vec::new()
    };
    let mut ctx = BubbleTickContext {
        dt,
        time: session.elapsed as f32,
        arena: session.arena,
        speed_multiplier: session.speed_multiplier(snapshot),
        impulse_damping: tuning.impulse_damping,
        blocked_above: false,
    };
    let probe_distance = tuning.probe_distance;
    for bubble in &mut session.bubbles {
        ctx.blocked_above = bubble.is_selectable()
            && !footprints.is_empty()
            && probe_blocked(&bubble.footprint(), &footprints, probe_distance);
        bubble.tick(&ctx);
    }

    // Coverage
    let playable_area = session.arena.playable_area();
    let before = (session.coverage.ratio(), session.coverage.display_ratio());
    let sample = session.coverage.sample(
        session.bubbles.iter().map(|b| b.radius()),
        playable_area,
        dt,
    );
    if (sample.ratio, sample.display) != before {
        session.push_event(GameEvent::CoverageChanged {
            ratio: sample.ratio,
            display_percent: session.coverage.display_percent(),
        });
    }
    if sample.crossed {
        log::info!(
            "Coverage {:.1}% reached threshold {:.1}%",
            sample.ratio * 100.0,
            session.coverage.threshold() * 100.0
        );
        session.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::consts::SIM_DT;
    use crate::presenter::TextTint;
    use crate::sim::{BubbleKind, GamePhase, ModifierKind, TypeDistribution};
    use glam::Vec2;
    use proptest::prelude::*;

    /// Nothing moves or spawns on its own
    fn still_tuning() -> Tuning {
        Tuning {
            arena: Arena::centered(20.0, 20.0),
            rise_speed: 0.0,
            growth_speed: 0.0,
            wobble_amplitude: 0.0,
            block_when_covered: false,
            spawn_interval: 1000.0,
            min_spawn_interval: 1000.0,
            coverage_threshold: 1.0,
            ..Default::default()
        }
    }

    fn empty_session(tuning: Tuning) -> Session {
        let mut session = Session::new(tuning, 7);
        session.bubbles.clear();
        session.drain_events();
        session
    }

    fn run(session: &mut Session, seconds: f32) {
        let steps = (seconds / SIM_DT).ceil() as u32;
        for _ in 0..steps {
            tick(session, &TickInput::default(), SIM_DT);
        }
    }

    fn click(session: &mut Session, id: BubbleId) {
        let input = TickInput {
            selections: vec![id],
            ..Default::default()
        };
        tick(session, &input, SIM_DT);
    }

    fn game_over_count(session: &Session) -> usize {
        session
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count()
    }

    #[test]
    fn test_explosion_destroys_inside_only() {
        let mut session = empty_session(still_tuning());
        let bomb = session.spawn_bubble_at(BubbleKind::Explosive, Vec2::ZERO);
        // Reach is 0.5 * 2.0 * 1.25 = 1.25
        let inside: Vec<_> = [Vec2::new(1.0, 0.0), Vec2::new(-1.2, 0.0), Vec2::new(0.0, 1.5)]
            .into_iter()
            .map(|pos| session.spawn_bubble_at(BubbleKind::Normal, pos))
            .collect();
        let outside: Vec<_> = [Vec2::new(4.0, 0.0), Vec2::new(0.0, -6.0)]
            .into_iter()
            .map(|pos| session.spawn_bubble_at(BubbleKind::Normal, pos))
            .collect();

        click(&mut session, bomb);
        assert!(session.bubble(bomb).unwrap().is_exploding());
        assert_eq!(session.score.score(), 0);

        run(&mut session, 1.0);
        assert!(session.bubble(bomb).is_none());
        for id in &inside {
            assert!(session.bubble(*id).is_none());
        }
        for id in &outside {
            assert!(session.bubble(*id).is_some());
        }
        assert_eq!(session.score.score(), 50);
        assert_eq!(session.score.pop_count(), 4);

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::FloatingText {
            text: "+50\n(4 popped!)".to_string(),
            pos: Vec2::ZERO,
            tint: TextTint::Yellow,
        }));
    }

    #[test]
    fn test_exploding_bubble_ignores_clicks() {
        let mut session = empty_session(still_tuning());
        let bomb = session.spawn_bubble_at(BubbleKind::Explosive, Vec2::ZERO);
        click(&mut session, bomb);
        click(&mut session, bomb);
        assert_eq!(session.scheduler.len(), 1);
        run(&mut session, 1.0);
        assert_eq!(session.score.pop_count(), 1);
        assert!(session.scheduler.is_empty());
    }

    #[test]
    fn test_normal_pop_through_tick() {
        let tuning = Tuning {
            distribution: TypeDistribution::normal_only(),
            ..still_tuning()
        };
        let mut session = empty_session(tuning);
        let root = session.spawn_bubble_at(BubbleKind::Normal, Vec2::ZERO);
        click(&mut session, root);
        assert_eq!(session.score.score(), 10);
        assert_eq!(session.bubbles.len(), 3);

        let child = session.bubbles[0].id;
        assert_eq!(session.bubbles[0].generation, 1);
        click(&mut session, child);
        assert_eq!(session.score.score(), 30);
        assert_eq!(session.score.pop_count(), 2);
        assert_eq!(session.bubbles.len(), 5);
    }

    #[test]
    fn test_coverage_first_crossing_ends_session() {
        let tuning = Tuning {
            arena: Arena::centered(10.0, 10.0),
            coverage_threshold: 0.6,
            ..still_tuning()
        };
        let mut session = empty_session(tuning);
        // pi * 3.35^2 covers ~35% of the 10x10 arena
        let a = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(-2.0, 0.0));
        session.bubble_mut(a).unwrap().base_scale = 3.35;
        tick(&mut session, &TickInput::default(), SIM_DT);
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(session.coverage.ratio() < 0.6);

        let b = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(2.0, 0.0));
        session.bubble_mut(b).unwrap().base_scale = 3.0;
        tick(&mut session, &TickInput::default(), SIM_DT);
        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(session.coverage.ratio() >= 0.6);
        assert_eq!(game_over_count(&session), 1);
    }

    #[test]
    fn test_game_over_stops_everything() {
        let tuning = Tuning {
            spawn_interval: 0.1,
            min_spawn_interval: 0.1,
            ..still_tuning()
        };
        let mut session = empty_session(tuning);
        let id = session.spawn_bubble_at(BubbleKind::Normal, Vec2::ZERO);
        session.score.add_score(70);
        session.end_session();
        let before = session.bubbles.len();

        click(&mut session, id);
        run(&mut session, 1.0);
        assert_eq!(session.bubbles.len(), before);
        assert_eq!(session.score.score(), 70);
        assert_eq!(session.time_ticks, 0);

        session.end_session();
        assert_eq!(game_over_count(&session), 1);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut session = Session::new(still_tuning(), 11);
        let bomb = session.spawn_bubble_at(BubbleKind::Explosive, Vec2::new(5.0, 0.0));
        click(&mut session, bomb);
        session.end_session();

        session.restart();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.bubbles.len(), 1);
        assert_eq!(session.score.score(), 0);
        assert_eq!(session.score.pop_count(), 0);

        // The cancelled explosion never fires
        run(&mut session, 2.0);
        assert_eq!(session.score.pop_count(), 0);
        assert_eq!(session.bubbles.len(), 1);
    }

    #[test]
    fn test_spawner_adds_roots() {
        let tuning = Tuning {
            spawn_interval: 0.5,
            spawn_acceleration: 0.0,
            min_spawn_interval: 0.5,
            ..still_tuning()
        };
        let mut session = empty_session(tuning);
        run(&mut session, 2.1);
        assert_eq!(session.bubbles.len(), 4);
        assert!(session.bubbles.iter().all(|b| b.generation == 0));
    }

    #[test]
    fn test_freeze_slows_rise_and_growth() {
        let tuning = Tuning {
            rise_speed: 1.0,
            growth_speed: 0.5,
            ..still_tuning()
        };
        let mut normal = empty_session(tuning.clone());
        let a = normal.spawn_bubble_at(BubbleKind::Normal, Vec2::new(0.0, -8.0));
        let mut frozen = empty_session(tuning);
        let b = frozen.spawn_bubble_at(BubbleKind::Normal, Vec2::new(0.0, -8.0));
        frozen.modifiers.activate(ModifierKind::Freeze, 10.0);

        run(&mut normal, 1.0);
        run(&mut frozen, 1.0);
        let a = normal.bubble(a).unwrap();
        let b = frozen.bubble(b).unwrap();
        assert!(b.pos.y + 8.0 < (a.pos.y + 8.0) * 0.2);
        assert!(b.growth_factor - 1.0 < (a.growth_factor - 1.0) * 0.2);
    }

    #[test]
    fn test_freeze_activated_mid_tick_applies_next_tick() {
        let tuning = Tuning {
            rise_speed: 1.0,
            ..still_tuning()
        };
        let mut session = empty_session(tuning);
        let freeze = session.spawn_bubble_at(BubbleKind::Freeze, Vec2::new(5.0, 0.0));
        let watched = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(-5.0, -8.0));

        click(&mut session, freeze);
        assert!(session.modifiers.is_active(ModifierKind::Freeze));
        let first = session.bubble(watched).unwrap().pos.y + 8.0;
        assert!((first - SIM_DT).abs() < 1e-5);

        tick(&mut session, &TickInput::default(), SIM_DT);
        let second = session.bubble(watched).unwrap().pos.y + 8.0 - first;
        assert!((second - SIM_DT * 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_modifier_expires_with_event() {
        let mut session = empty_session(still_tuning());
        let swipe = session.spawn_bubble_at(BubbleKind::Swipe, Vec2::ZERO);
        click(&mut session, swipe);
        assert!(session.modifiers.is_active(ModifierKind::Swipe));
        run(&mut session, 3.1);
        assert!(!session.modifiers.is_active(ModifierKind::Swipe));
        assert!(
            session
                .events()
                .contains(&GameEvent::ModifierEnded(ModifierKind::Swipe))
        );
    }

    #[test]
    fn test_swipe_gesture_through_tick() {
        let mut session = empty_session(still_tuning());
        let swipe = session.spawn_bubble_at(BubbleKind::Swipe, Vec2::ZERO);
        let a = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(-4.0, 0.0));
        let b = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(4.0, 0.0));
        let c = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(0.0, 4.0));
        click(&mut session, swipe);
        assert_eq!(session.score.score(), 10);

        // Clicks are ignored while swiping
        click(&mut session, c);
        assert!(session.bubble(c).is_some());

        let drag = TickInput {
            gesture: GestureInput {
                begin: true,
                touched: vec![a, a, b],
                end: true,
            },
            ..Default::default()
        };
        tick(&mut session, &drag, SIM_DT);
        assert!(session.bubble(a).is_none());
        assert!(session.bubble(b).is_none());
        assert_eq!(session.score.score(), 30);
        assert_eq!(session.score.pop_count(), 3);
        // Swiped Normal bubbles leave no children
        assert_eq!(session.bubbles.len(), 1);
    }

    #[test]
    fn test_viewport_adopted() {
        let mut session = empty_session(still_tuning());
        let input = TickInput {
            viewport: Some(Arena::centered(4.0, 6.0)),
            ..Default::default()
        };
        tick(&mut session, &input, SIM_DT);
        assert_eq!(session.arena.width(), 4.0);
        assert_eq!(session.arena.margin, session.tuning.arena.margin);

        tick(&mut session, &TickInput::default(), SIM_DT);
        assert_eq!(session.arena.height(), 6.0);
    }

    #[test]
    fn test_blocked_bubble_stops_under_neighbor() {
        let tuning = Tuning {
            rise_speed: 1.0,
            block_when_covered: true,
            ..still_tuning()
        };
        let mut session = empty_session(tuning);
        let lower = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(0.0, 0.0));
        let upper = session.spawn_bubble_at(BubbleKind::Normal, Vec2::new(0.0, 9.5));
        run(&mut session, 10.0);
        let lower = session.bubble(lower).unwrap();
        let upper = session.bubble(upper).unwrap();
        assert!(upper.blocked);
        assert!(lower.blocked);
        assert!(lower.pos.y + lower.radius() <= upper.pos.y - upper.radius() + 0.1);
    }

    #[test]
    fn test_coverage_reported_only_on_change() {
        let mut session = empty_session(still_tuning());
        let id = session.spawn_bubble_at(BubbleKind::Normal, Vec2::ZERO);
        session.bubble_mut(id).unwrap().base_scale = 2.0;
        run(&mut session, 1.0);
        assert!(
            session
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::CoverageChanged { .. }))
        );

        // Nothing on screen: the ratio and display settle at zero and stay there
        session.bubbles.clear();
        run(&mut session, 120.0);
        session.drain_events();
        run(&mut session, 10.0);
        assert!(session.events().is_empty());
    }

    proptest! {
        #[test]
        fn prop_generation_bounded(seed in any::<u64>(), picks in prop::collection::vec(0usize..64, 1..40)) {
            let tuning = Tuning {
                distribution: TypeDistribution::normal_only(),
                ..still_tuning()
            };
            let mut session = Session::new(tuning, seed);
            for pick in picks {
                if session.bubbles.is_empty() {
                    break;
                }
                let id = session.bubbles[pick % session.bubbles.len()].id;
                click(&mut session, id);
                for bubble in &session.bubbles {
                    prop_assert!(bubble.generation <= session.tuning.max_generations);
                }
            }
        }
    }
}
