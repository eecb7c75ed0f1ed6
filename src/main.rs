mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use invaders_sim::compute::{advance, init_state, FrameInput};
use invaders_sim::{FootprintTable, Level, Rules, SimConfig};

use display::Terminal;

/// A key is considered "held" if its last press/repeat event arrived within
/// this window.  Covers terminals that don't emit key-release events: the
/// OS key-repeat rate is ≥ 15 Hz, so the window is refreshed before expiry.
const HOLD_WINDOW: Duration = Duration::from_millis(140);

#[derive(Parser, Debug)]
#[command(name = "invaders")]
#[command(about = "Space invaders in the terminal")]
struct Args {
    /// Level to start on (1-3 formations, 4 is the meteor gauntlet)
    #[arg(long, default_value_t = 1)]
    level: u8,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Target milliseconds per tick
    #[arg(long, default_value_t = 10)]
    tick_ms: u64,

    /// Where tracing output goes (the terminal is busy drawing)
    #[arg(long, default_value = "invaders.log")]
    log_file: PathBuf,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW`.
fn is_held(key_seen: &HashMap<KeyCode, Instant>, key: &KeyCode, now: Instant) -> bool {
    key_seen
        .get(key)
        .map(|&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn held_any(key_seen: &HashMap<KeyCode, Instant>, keys: &[KeyCode], now: Instant) -> bool {
    keys.iter().any(|k| is_held(key_seen, k, now))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, we record
/// when every key was last pressed or repeated and hand the simulation a
/// snapshot of which keys are still "fresh" each tick.  Pause and "any key"
/// are edge-triggered and reported once.
fn game_loop<W: Write>(
    term: &mut Terminal<W>,
    rules: &Rules,
    level: Level,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let tick = Duration::from_millis(rules.config.tick_ms);
    let mut state = init_state(rules, level);
    let mut key_seen: HashMap<KeyCode, Instant> = HashMap::new();
    let mut last_loop = Instant::now();

    loop {
        let frame_start = Instant::now();
        let mut input = FrameInput::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_seen.insert(code, frame_start);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => input.pause_toggled = true,
                        _ => input.acknowledge = true,
                    }
                }
                KeyEventKind::Repeat => {
                    key_seen.insert(code, frame_start);
                }
                KeyEventKind::Release => {
                    key_seen.remove(&code);
                }
            }
        }

        input.move_left = held_any(
            &key_seen,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame_start,
        );
        input.move_right = held_any(
            &key_seen,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame_start,
        );
        input.fire = is_held(&key_seen, &KeyCode::Char(' '), frame_start);
        input.elapsed_ms = frame_start.duration_since(last_loop).as_millis() as u64;
        last_loop = frame_start;

        advance(&mut state, rules, &input, rng, term);
        term.take_error().context("failed to draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < tick {
            thread::sleep(tick - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    // Configuration problems fail here, before the terminal is touched.
    let config = SimConfig::with_tick_ms(args.tick_ms);
    let rules = Rules::new(config, &FootprintTable::default()).context("invalid configuration")?;
    let level = Level::new(args.level).context("invalid --level")?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(level = level.number(), seed = ?args.seed, "starting");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, so the game loop
    // never blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = Terminal::new(&mut out, &rules.config)
        .context("failed to query terminal size")
        .and_then(|mut term| game_loop(&mut term, &rules, level, &mut rng, &rx));

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
