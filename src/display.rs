/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer, an immutable view of the
/// game state and the current terminal size.  No game logic is performed;
/// this module only scales world coordinates onto the terminal grid and
/// translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use skyraid::compute::{EXPLOSION_LIFETIME, FIELD_H, FIELD_W, MAX_ENERGY};
use skyraid::entities::{Enemy, EnemyKind, Explosion, GameState, GameStatus, Item, ItemKind, Missile};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_WEAPON: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_ENEMY_SCOUT: Color = Color::Green;
const C_ENEMY_CRUISER: Color = Color::Red;
const C_MISSILE: Color = Color::Cyan;
const C_ITEM_ENERGY: Color = Color::Magenta;
const C_ITEM_WEAPON: Color = Color::Yellow;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Terminal grid position plus the play-area box the world is scaled into.
struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    /// Leftmost/rightmost playable columns (inside the border).
    fn col(&self, x: f64) -> u16 {
        let usable = self.width.saturating_sub(2) as f64;
        (1.0 + (x / FIELD_W).clamp(0.0, 1.0) * (usable - 1.0).max(0.0)).round() as u16
    }

    /// Playable rows run from 2 (below the top bar) to height-3.
    fn row(&self, y: f64) -> Option<u16> {
        if y < 0.0 {
            return None; // still above the field
        }
        let usable = self.height.saturating_sub(5) as f64;
        let r = 2.0 + (y / FIELD_H).clamp(0.0, 1.0) * usable.max(0.0);
        Some(r.round() as u16)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    term: (u16, u16),
) -> std::io::Result<()> {
    let vp = Viewport { width: term.0, height: term.1 };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &vp)?;
    draw_hud(out, state, &vp)?;

    for enemy in &state.enemies {
        draw_enemy(out, enemy, &vp)?;
    }
    for item in &state.items {
        draw_item(out, item, &vp)?;
    }
    for missile in &state.missiles {
        draw_missile(out, missile, &vp)?;
    }
    for explosion in &state.explosions {
        draw_explosion(out, explosion, &vp)?;
    }

    draw_player(out, state, &vp)?;
    draw_controls_hint(out, &vp)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, &vp)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let w = vp.width as usize;
    let h = vp.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    // Energy bar — left
    const BAR_CELLS: i32 = 10;
    let filled = (state.energy * BAR_CELLS + MAX_ENERGY - 1) / MAX_ENERGY;
    let bar: String = (0..BAR_CELLS)
        .map(|i| if i < filled { '█' } else { '░' })
        .collect();
    let bar_color = if state.energy > 60 {
        Color::Green
    } else if state.energy > 30 {
        Color::Yellow
    } else {
        Color::Red
    };
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(bar_color))?;
    out.queue(Print(format!("E:{} {:>3}%", bar, state.energy)))?;

    // Weapon level — centre
    let volley: String = "║".repeat(state.missile_count as usize);
    let weapon_str = format!("Wpn Lv{} {}", state.weapon_pickups + 1, volley);
    let wx = (vp.width / 2).saturating_sub(weapon_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WEAPON))?;
    out.queue(Print(&weapon_str))?;

    // Score and high score — right
    let hi = state.high_score.max(state.score);
    let score_str = if hi > 0 {
        format!("Score:{:>6}  Hi:{:>6}", state.score, hi)
    } else {
        format!("Score:{:>6}", state.score)
    };
    let rx = vp
        .width
        .saturating_sub(score_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    // 2-row sprite:
    //   ▲       ← tip
    //  /█\      ← fuselage + wings
    let p = &state.player;
    let cx = vp.col(p.x + p.w / 2.0);
    let Some(ty) = vp.row(p.y) else { return Ok(()) };

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(cx, ty))?;
    out.queue(Print("▲"))?;

    let wing_y = ty + 1;
    if wing_y < vp.height.saturating_sub(2) {
        out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), wing_y))?;
        out.queue(Print("/█\\"))?;
    }

    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, vp: &Viewport) -> std::io::Result<()> {
    let cx = vp.col(enemy.x + enemy.w / 2.0);
    let Some(ty) = vp.row(enemy.y) else { return Ok(()) };
    let lx = cx.saturating_sub(1).max(1);
    let play_bottom = vp.height.saturating_sub(2);

    match enemy.kind {
        EnemyKind::Scout => {
            //   «▼»    ← swept-back wings
            out.queue(style::SetForegroundColor(C_ENEMY_SCOUT))?;
            out.queue(cursor::MoveTo(lx, ty))?;
            out.queue(Print("«▼»"))?;
        }
        EnemyKind::Cruiser => {
            //   (◎)    ← armored core
            //   ╚═╝    ← engine block
            out.queue(style::SetForegroundColor(C_ENEMY_CRUISER))?;
            out.queue(cursor::MoveTo(lx, ty))?;
            out.queue(Print("(◎)"))?;
            if ty + 1 < play_bottom {
                out.queue(cursor::MoveTo(lx, ty + 1))?;
                out.queue(Print("╚═╝"))?;
            }
        }
    }
    Ok(())
}

fn draw_missile<W: Write>(out: &mut W, missile: &Missile, vp: &Viewport) -> std::io::Result<()> {
    let Some(ty) = vp.row(missile.y) else { return Ok(()) };
    out.queue(cursor::MoveTo(vp.col(missile.x + missile.w / 2.0), ty))?;
    out.queue(style::SetForegroundColor(C_MISSILE))?;
    // Lean the glyph with the launch angle
    let glyph = if missile.angle > 0.01 {
        "╱"
    } else if missile.angle < -0.01 {
        "╲"
    } else {
        "║"
    };
    out.queue(Print(glyph))?;
    Ok(())
}

/// Falling power-up items:
///   ♥  (magenta) — Energy: +30 energy, capped at 100
///   ★  (yellow)  — Weapon: fire rate, then 2- and 3-missile spread
fn draw_item<W: Write>(out: &mut W, item: &Item, vp: &Viewport) -> std::io::Result<()> {
    let Some(ty) = vp.row(item.y) else { return Ok(()) };
    out.queue(cursor::MoveTo(vp.col(item.x + item.w / 2.0), ty))?;
    match item.kind {
        ItemKind::Energy => {
            out.queue(style::SetForegroundColor(C_ITEM_ENERGY))?;
            out.queue(Print("♥"))?;
        }
        ItemKind::Weapon => {
            out.queue(style::SetForegroundColor(C_ITEM_WEAPON))?;
            out.queue(Print("★"))?;
        }
    }
    Ok(())
}

fn draw_explosion<W: Write>(
    out: &mut W,
    explosion: &Explosion,
    vp: &Viewport,
) -> std::io::Result<()> {
    let Some(ty) = vp.row(explosion.y) else { return Ok(()) };
    // Shrink the glyph as the blast burns out
    let life = explosion.remaining / EXPLOSION_LIFETIME;
    let glyph = if life > 0.66 {
        "✺"
    } else if life > 0.33 {
        "✶"
    } else {
        "·"
    };
    out.queue(cursor::MoveTo(vp.col(explosion.x), ty))?;
    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   Mouse drag : Steer   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score);
    let best_score = state.high_score.max(state.score);
    let best_line = if state.score >= state.high_score && state.score > 0 {
        format!("★ NEW BEST: {:>6} ★", best_score)
    } else {
        format!("Best Score:  {:>6}", best_score)
    };

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let best_color = if state.score >= state.high_score && state.score > 0 {
        Color::Yellow
    } else {
        Color::DarkGrey
    };

    let cx = vp.width / 2;
    let total_rows = lines.len() + 3;
    let start_row = (vp.height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let best_row = score_row + 1;
    let col = cx.saturating_sub(best_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, best_row))?;
    out.queue(style::SetForegroundColor(best_color))?;
    out.queue(Print(&best_line))?;

    let hint = "Any key / click - Play Again   Q - Quit";
    let hint_row = best_row + 1;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
