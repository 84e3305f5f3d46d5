mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use display::{TerminalRenderer, Viewport};
use shooting_gallery::clock::SystemClock;
use shooting_gallery::compute::new_round;
use shooting_gallery::config::RoundConfig;
use shooting_gallery::input::{EventQueue, InputEvent, InputSource};
use shooting_gallery::session::{Outcome, Session};
use shooting_gallery::snapshot;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

#[derive(Parser, Debug)]
#[command(name = "shooting_gallery", about = "Click the targets before your ammo runs out")]
struct Args {
    /// Seed for target generation (random if omitted).
    #[arg(long)]
    seed: Option<u64>,
    /// Magazine size; the round starts with a full magazine.
    #[arg(long)]
    ammo: Option<u32>,
    /// Round length in seconds; 0 plays until ammo runs out.
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,
    /// Write debug logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn round_config(&self) -> RoundConfig {
        let mut config = RoundConfig::default();
        if let Some(ammo) = self.ammo {
            config.max_ammo = ammo;
            config.starting_ammo = ammo;
        }
        if let Some(secs) = self.time_limit {
            config.time_limit_ms = (secs > 0).then(|| secs.saturating_mul(1000));
        }
        config
    }
}

fn init_logging(path: &Path) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(EnvFilter::from_default_env().add_directive("shooting_gallery=debug".parse()?))
        .init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Translates terminal events arriving on the reader thread's channel into
/// round input.  Mouse cells are mapped to play-area pixels.
struct TerminalInput<'a> {
    rx: &'a mpsc::Receiver<Event>,
    viewport: Viewport,
    screen_width: f32,
    screen_height: f32,
}

impl InputSource for TerminalInput<'_> {
    fn poll(&mut self, queue: &mut EventQueue) {
        while let Ok(ev) = self.rx.try_recv() {
            let translated = match ev {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    modifiers,
                    ..
                }) => match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(InputEvent::Quit)
                    }
                    KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                        Some(InputEvent::PauseToggle)
                    }
                    _ => None,
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => self
                    .viewport
                    .to_play(column, row, self.screen_width, self.screen_height)
                    .map(|(x, y)| InputEvent::Click { x, y }),
                _ => None,
            };
            if let Some(event) = translated {
                if !queue.push(event) {
                    warn!(?event, "input queue full, event dropped");
                }
            }
        }
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    viewport: Viewport,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<MenuResult> {
    display::draw_menu(out, viewport)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => return Ok(MenuResult::Start),
            },
            Ok(Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(_),
                ..
            })) => return Ok(MenuResult::Start),
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = args.round_config();
    config.validate().context("invalid round settings")?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(out, &rx, config, args.seed);

    // Always restore the terminal
    let mut out = stdout();
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run(
    out: BufWriter<Stdout>,
    rx: &mpsc::Receiver<Event>,
    config: RoundConfig,
    seed: Option<u64>,
) -> Result<()> {
    let (width, height) = terminal::size().context("reading terminal size")?;
    let viewport = Viewport { width, height };
    let mut renderer = TerminalRenderer::new(out, viewport);

    if let MenuResult::Quit = show_menu(renderer.out(), viewport, rx)? {
        return Ok(());
    }

    let rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let pause_ms = config.game_over_pause_ms;
    let input = TerminalInput {
        rx,
        viewport,
        screen_width: config.screen_width,
        screen_height: config.screen_height,
    };

    let mut session = Session::new(new_round(config), SystemClock::new(), input, renderer, rng);
    session.start();

    let mut next_frame = Instant::now() + FRAME;
    let outcome = session.run(|| {
        let now = Instant::now();
        if next_frame > now {
            thread::sleep(next_frame - now);
        }
        next_frame = Instant::now().max(next_frame) + FRAME;
    });

    let state = session.state();
    info!(
        ?outcome,
        score = state.player.score,
        hits = state.player.hits,
        misses = state.player.misses,
        render_failures = session.render_failures(),
        "session finished"
    );
    if let Ok(json) = snapshot::encode(state) {
        tracing::debug!(snapshot = %json, "final round state");
    }

    if outcome == Outcome::GameOver {
        // Keep the final frame on screen before exiting.
        thread::sleep(Duration::from_millis(pause_ms));
    }
    Ok(())
}
