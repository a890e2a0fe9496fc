mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{info, LevelFilter};
use rand::thread_rng;

use skyraid::compute::{init_state, tick, FIELD_W};
use skyraid::entities::{GameState, GameStatus, InputState};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".skyraid_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(score: u32) {
    let _ = std::fs::write(high_score_path(), score.to_string());
}

// ── Title screen ──────────────────────────────────────────────────────────────

enum TitleResult {
    Start,
    Quit,
}

fn show_title<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<TitleResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "✦  S K Y R A I D  ✦";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs_str = format!("Best Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(4),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    let blurb = [
        "Your ship fires on its own — dodge the descending",
        "raiders and catch falling power-ups.",
    ];
    for (i, line) in blurb.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(line.chars().count() as u16 / 2),
            cy.saturating_sub(2) + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(*line))?;
    }

    let item_info: &[(&str, Color, &str)] = &[
        ("♥", Color::Magenta, " Energy  — +30 energy (max 100)"),
        ("★", Color::Yellow, " Weapon  — faster fire, then 2- and 3-way spread"),
    ];
    for (i, (sym, color, desc)) in item_info.iter().enumerate() {
        let row = cy + 1 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("← → / A D : Move   Mouse drag : Steer   Q : Quit"))?;

    let go = "Press any key to launch";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(go.chars().count() as u16 / 2),
        cy + 6,
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(go))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(TitleResult::Quit);
                }
                _ => return Ok(TitleResult::Start),
            },
            Ok(Event::Mouse(MouseEvent { kind: MouseEventKind::Down(_), .. })) => {
                return Ok(TitleResult::Start);
            }
            Ok(_) => {}
            Err(_) => return Ok(TitleResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Map a terminal column back to a world x coordinate (inverse of the
/// display scaling, which draws the field between the border columns).
fn column_to_world(column: u16, term_width: u16) -> f64 {
    let usable = term_width.saturating_sub(3).max(1) as f64;
    (column.saturating_sub(1) as f64 / usable).clamp(0.0, 1.0) * FIELD_W
}

/// Returns `true` → quit program,  `false` → restart a fresh session.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key; each frame the still-"fresh" keys are
/// treated as held.  This works both on keyboard-enhancement terminals
/// (real release events) and classic ones (keys expire after `HOLD_WINDOW`
/// frames of silence).  A left-button drag additionally supplies an
/// absolute steering target, which takes precedence over the keys.
///
/// Each frame advances the simulation by exactly one fixed `dt`; once the
/// state reports game over, no further ticks run — the loop blocks until
/// the player restarts or quits.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let dt = FRAME.as_secs_f64();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut drag_col: Option<u16> = None;
    let mut term = terminal::size()?;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left)
                    | MouseEventKind::Drag(MouseButton::Left) => {
                        drag_col = Some(column);
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        drag_col = None;
                    }
                    _ => {}
                },
                Event::Resize(w, h) => {
                    term = (w, h);
                }
                _ => {}
            }
        }

        let input = InputState {
            left: is_held(&key_frame, &KeyCode::Left, frame)
                || is_held(&key_frame, &KeyCode::Char('a'), frame)
                || is_held(&key_frame, &KeyCode::Char('A'), frame),
            right: is_held(&key_frame, &KeyCode::Right, frame)
                || is_held(&key_frame, &KeyCode::Char('d'), frame)
                || is_held(&key_frame, &KeyCode::Char('D'), frame),
            drag_x: drag_col.map(|c| column_to_world(c, term.0)),
        };

        *state = tick(state, &input, dt, &mut rng);

        display::render(out, state, term)?;

        if state.status == GameStatus::GameOver {
            info!("game over at score {}", state.score);
            // Terminal state: stop ticking and await an explicit restart.
            return await_restart(rx);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

/// Block on the game-over screen.  Any key or click restarts; q/Esc quits.
fn await_restart(rx: &mpsc::Receiver<Event>) -> std::io::Result<bool> {
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                _ => return Ok(false),
            },
            Ok(Event::Mouse(MouseEvent { kind: MouseEventKind::Down(_), .. })) => {
                return Ok(false);
            }
            Ok(_) => {}
            Err(_) => return Ok(true), // reader thread gone → exit
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    simple_logging::log_to_file("skyraid.log", LevelFilter::Info)?;
    info!("skyraid starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

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

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("skyraid exiting");
    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut high_score = load_high_score();

    match show_title(out, rx, high_score)? {
        TitleResult::Quit => return Ok(()),
        TitleResult::Start => {}
    }

    // Sessions restart in place; the title screen is only shown once.
    loop {
        let mut state = init_state(high_score);
        let quit = game_loop(out, &mut state, rx)?;

        // Persist new high score if beaten
        if state.score > high_score {
            high_score = state.score;
            save_high_score(high_score);
            info!("new high score: {}", high_score);
        }

        if quit {
            break;
        }
        // Otherwise fall through into a fresh session
    }
    Ok(())
}
