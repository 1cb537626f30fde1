//! Bubble Clicker headless runner
//!
//! Drives a session at a fixed frame rate with an autoplay input source and
//! logs everything the presenter would show.

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;

use bubble_clicker::presenter::{self, TextTint};
use bubble_clicker::sim::{
    BubbleId, BubbleKind, GestureInput, ModifierKind, Session, TickInput, tick,
};
use bubble_clicker::{FixedStepper, Presenter, SoundEffect, Tuning};

#[derive(Parser)]
#[command(name = "bubble-clicker")]
#[command(about = "Run a headless Bubble Clicker session with an autoplay player")]
struct Args {
    /// Simulated seconds to run before stopping
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON tuning file; missing fields keep their defaults
    #[arg(long)]
    tuning: Option<std::path::PathBuf>,

    /// Autoplay clicks (or swipes) per simulated second
    #[arg(long, default_value_t = 2.0)]
    clicks_per_second: f32,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
}

/// Presenter that writes everything to the log
#[derive(Default)]
struct LogPresenter {
    pops_shown: u64,
    sounds_played: u64,
}

impl Presenter for LogPresenter {
    fn play_pop_effect(&mut self, kind: BubbleKind, pos: Vec2) {
        self.pops_shown += 1;
        if kind.is_special() {
            log::debug!("{} pop at ({:.2}, {:.2})", kind.as_str(), pos.x, pos.y);
        } else {
            log::trace!("pop effect: {} at ({:.2}, {:.2})", kind.as_str(), pos.x, pos.y);
        }
    }

    fn play_explosion_start(&mut self, pos: Vec2) {
        log::debug!("explosion charging at ({:.2}, {:.2})", pos.x, pos.y);
    }

    fn play_sound(&mut self, sound: SoundEffect) {
        self.sounds_played += 1;
        log::trace!("sound: {sound:?}");
    }

    fn show_floating_text(&mut self, text: &str, _pos: Vec2, tint: TextTint) {
        log::debug!("text ({tint:?}): {}", text.replace('\n', " "));
    }

    fn modifier_changed(&mut self, kind: ModifierKind, active: bool, duration: f32) {
        if active {
            log::info!("{kind:?} on for {duration:.1}s");
        } else {
            log::info!("{kind:?} off");
        }
    }

    fn game_over(&mut self, score: u64, pops: u64) {
        log::info!("GAME OVER: {score} points, {pops} pops");
    }
}

/// Picks what the simulated player does next
struct Autoplay {
    interval: f32,
    timer: f32,
}

impl Autoplay {
    fn new(clicks_per_second: f32) -> Self {
        Self {
            interval: 1.0 / clicks_per_second,
            timer: 0.0,
        }
    }

    /// Input for the next frame of `frame_dt` seconds
    fn next_input(&mut self, session: &Session, frame_dt: f32) -> TickInput {
        self.timer += frame_dt;
        if self.timer < self.interval {
            return TickInput::default();
        }
        self.timer -= self.interval;

        if session.modifiers.is_active(ModifierKind::Swipe) {
            // Drag through everything on screen
            let touched: Vec<BubbleId> = session
                .bubbles
                .iter()
                .filter(|b| b.is_selectable())
                .map(|b| b.id)
                .collect();
            return TickInput {
                gesture: GestureInput {
                    begin: true,
                    touched,
                    end: true,
                },
                ..Default::default()
            };
        }

        let largest = session
            .bubbles
            .iter()
            .filter(|b| b.is_selectable())
            .max_by(|a, b| a.radius().total_cmp(&b.radius()))
            .map(|b| b.id);
        TickInput {
            selections: largest.into_iter().collect(),
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if !(args.fps > 0.0) {
        bail!("--fps must be positive, got {}", args.fps);
    }
    if !(args.clicks_per_second > 0.0) {
        bail!(
            "--clicks-per-second must be positive, got {}",
            args.clicks_per_second
        );
    }

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let mut session = match args.seed {
        Some(seed) => Session::new(tuning, seed),
        None => Session::with_random_seed(tuning),
    };
    log::info!("Running {:.0}s at {:.0} fps (seed {})", args.seconds, args.fps, session.seed());

    let mut stepper = FixedStepper::new();
    let mut autoplay = Autoplay::new(args.clicks_per_second);
    let mut log_presenter = LogPresenter::default();
    let frame_dt = 1.0 / args.fps;
    let frames = (args.seconds * args.fps).ceil() as u64;

    // Input waits here until a frame actually runs a step
    let mut pending: Option<TickInput> = None;
    for _ in 0..frames {
        if session.is_over() {
            break;
        }
        if pending.is_none() {
            pending = Some(autoplay.next_input(&session, frame_dt));
        }
        stepper.advance(frame_dt, |dt| {
            let step_input = pending.take().unwrap_or_default();
            tick(&mut session, &step_input, dt);
        });
        presenter::dispatch(&session.drain_events(), &mut log_presenter);
    }

    println!();
    println!("=== SESSION SUMMARY ===");
    println!("  Seed:       {}", session.seed());
    println!("  Score:      {}", session.score.score());
    println!("  Pops:       {}", session.score.pop_count());
    println!("  Elapsed:    {:.1}s", session.elapsed);
    println!("  Coverage:   {:.1}%", session.coverage.ratio() * 100.0);
    println!("  Bubbles:    {}", session.bubbles.len());
    println!("  Ended:      {}", if session.is_over() { "yes" } else { "no" });
    for kind in ModifierKind::ALL {
        if session.modifiers.is_active(kind) {
            let left = session.modifiers.timer(kind).fraction_remaining();
            println!("  {kind:?}:{:>8.0}% left", left * 100.0);
        }
    }
    log::debug!(
        "presenter saw {} pop effects and {} sounds",
        log_presenter.pops_shown,
        log_presenter.sounds_played
    );

    Ok(())
}
