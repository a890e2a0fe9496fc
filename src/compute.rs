/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, the frame's input, a time step and an
/// RNG handle) and returns a brand-new `GameState`.  Side effects are
/// limited to the injected RNG, so a seeded generator makes a whole
/// session deterministic.
///
/// All speeds are world units per second and every advance is scaled by
/// `dt`, so the simulation is frame-rate independent.  At the reference
/// 60 Hz step the per-tick movement reduces to whole units
/// (e.g. 300/60 = 5 for the player).

use rand::Rng;

use crate::entities::{
    Enemy, EnemyKind, Explosion, GameState, GameStatus, InputState, Item, ItemKind, Missile,
    Player, Rect,
};

// ── World geometry ───────────────────────────────────────────────────────────

/// Play-field width in world units.
pub const FIELD_W: f64 = 450.0;
/// Play-field height in world units.
pub const FIELD_H: f64 = 800.0;

pub const PLAYER_SIZE: f64 = 80.0;
pub const ENEMY_SIZE: f64 = 100.0;
pub const ITEM_SIZE: f64 = 60.0;
pub const MISSILE_W: f64 = 8.0;
pub const MISSILE_H: f64 = 22.0;

/// Gap between the player and the bottom edge at spawn.
const PLAYER_BOTTOM_MARGIN: f64 = 30.0;

// ── Tuning (units/second unless noted) ───────────────────────────────────────

pub const PLAYER_SPEED: f64 = 300.0;
pub const MISSILE_SPEED: f64 = 480.0;
/// Sideways drift applied to angled spread missiles.
pub const MISSILE_DRIFT: f64 = 300.0;
pub const ITEM_SPEED: f64 = 180.0;
pub const ENEMY_BASE_SPEED: f64 = 120.0;
/// Extra enemy speed gained per second of session time.
pub const ENEMY_SPEED_RAMP: f64 = 1.2;
/// Expected enemy spawns per second (per-tick roll is `rate * dt`).
pub const ENEMY_SPAWN_RATE: f64 = 1.2;

/// Seconds between auto-fire volleys before any weapon pickup.
pub const BASE_SHOT_INTERVAL: f64 = 0.5;
/// Seconds between item spawns.
pub const ITEM_INTERVAL: f64 = 10.0;
/// Degrees between adjacent missiles in a spread volley.
pub const SPREAD_STEP_DEG: f64 = 15.0;

pub const MAX_ENERGY: i32 = 100;
/// Energy lost when an enemy rams the player.
pub const COLLISION_ENERGY_DRAIN: i32 = 20;
/// Energy restored by an energy item.
pub const ENERGY_ITEM_RESTORE: i32 = 30;
pub const MAX_WEAPON_PICKUPS: u32 = 3;

/// Display time of a blast visual, in seconds (20 frames at 60 Hz).
pub const EXPLOSION_LIFETIME: f64 = 20.0 / 60.0;

/// Missile hits needed to destroy an enemy of the given kind.
fn toughness(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Scout => 1,
        EnemyKind::Cruiser => 2,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session: player centered near the bottom, empty entity
/// lists, full energy, base weapon.  Also used for restarts — only the
/// high score survives across sessions.
pub fn init_state(high_score: u32) -> GameState {
    GameState {
        player: Player {
            x: FIELD_W / 2.0 - PLAYER_SIZE / 2.0,
            y: FIELD_H - PLAYER_SIZE - PLAYER_BOTTOM_MARGIN,
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
        },
        enemies: Vec::new(),
        missiles: Vec::new(),
        items: Vec::new(),
        explosions: Vec::new(),
        energy: MAX_ENERGY,
        score: 0,
        high_score,
        missile_count: 1,
        weapon_pickups: 0,
        shot_interval: BASE_SHOT_INTERVAL,
        clock: 0.0,
        last_shot: 0.0,
        last_item: 0.0,
        status: GameStatus::Playing,
    }
}

fn spawn_enemy(rng: &mut impl Rng) -> Enemy {
    let kind = if rng.gen_bool(0.5) {
        EnemyKind::Scout
    } else {
        EnemyKind::Cruiser
    };
    Enemy {
        x: rng.gen_range(0.0..FIELD_W - ENEMY_SIZE),
        y: -ENEMY_SIZE,
        w: ENEMY_SIZE,
        h: ENEMY_SIZE,
        kind,
        hits_left: toughness(kind),
    }
}

fn spawn_item(rng: &mut impl Rng) -> Item {
    Item {
        x: rng.gen_range(0.0..FIELD_W - ITEM_SIZE),
        y: -ITEM_SIZE,
        w: ITEM_SIZE,
        h: ITEM_SIZE,
        kind: if rng.gen_bool(0.5) {
            ItemKind::Energy
        } else {
            ItemKind::Weapon
        },
    }
}

fn explosion_for(enemy: &Enemy) -> Explosion {
    Explosion {
        x: enemy.x + enemy.w / 2.0,
        y: enemy.y + enemy.h / 2.0,
        size: enemy.w,
        remaining: EXPLOSION_LIFETIME,
    }
}

// ── Collision ────────────────────────────────────────────────────────────────

/// Half-open AABB overlap test.  Symmetric in its arguments.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

// ── Auto-fire ────────────────────────────────────────────────────────────────

/// Build one volley from the player's nose: a single straight missile,
/// or a symmetric fan in 15° increments centered on vertical when the
/// missile count is above one.
pub fn fire_volley(player: &Player, missile_count: u32) -> Vec<Missile> {
    let nose_x = player.x + player.w / 2.0 - MISSILE_W / 2.0;
    let nose_y = player.y;

    if missile_count <= 1 {
        return vec![Missile { x: nose_x, y: nose_y, w: MISSILE_W, h: MISSILE_H, angle: 0.0 }];
    }

    (0..missile_count)
        .map(|i| {
            let deg = (i as f64 - (missile_count - 1) as f64 / 2.0) * SPREAD_STEP_DEG;
            Missile {
                x: nose_x,
                y: nose_y,
                w: MISSILE_W,
                h: MISSILE_H,
                angle: deg.to_radians(),
            }
        })
        .collect()
}

// ── Player movement ──────────────────────────────────────────────────────────

/// Advance the player by the held-direction input, or snap toward an
/// absolute drag target when one is present.  Always clamped to the field.
pub fn advance_player(player: &Player, input: &InputState, dt: f64) -> Player {
    let mut x = player.x;
    if let Some(target) = input.drag_x {
        x = target - player.w / 2.0;
    } else {
        if input.left {
            x -= PLAYER_SPEED * dt;
        }
        if input.right {
            x += PLAYER_SPEED * dt;
        }
    }
    Player {
        x: x.clamp(0.0, FIELD_W - player.w),
        ..*player
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by one step of `dt` seconds.
///
/// Stage order matters and matches the session rules: fire, move the
/// player, spawn, resolve enemies (ram before missile hits, first
/// matching missile wins, at most one missile consumed per enemy per
/// tick), resolve items, then advance missiles and blast visuals.
/// Missile/enemy collision sees the missiles' pre-advance positions.
/// Removal is immediate, so no stage ever observes a stale entity.
pub fn tick(state: &GameState, input: &InputState, dt: f64, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.clock += dt;

    // ── 1. Auto-fire on the shot interval ────────────────────────────────────
    if next.clock - next.last_shot >= next.shot_interval {
        next.missiles.extend(fire_volley(&next.player, next.missile_count));
        next.last_shot = next.clock;
    }

    // ── 2. Player movement ───────────────────────────────────────────────────
    next.player = advance_player(&next.player, input, dt);

    // ── 3. Probabilistic enemy spawn ─────────────────────────────────────────
    if rng.gen_bool((ENEMY_SPAWN_RATE * dt).min(1.0)) {
        next.enemies.push(spawn_enemy(rng));
    }

    // ── 4. Timed item spawn ──────────────────────────────────────────────────
    if next.clock - next.last_item >= ITEM_INTERVAL {
        next.items.push(spawn_item(rng));
        next.last_item = next.clock;
    }

    // ── 5. Enemies: advance, cull, ram the player, take missile hits ─────────
    let enemy_speed = ENEMY_BASE_SPEED + next.clock * ENEMY_SPEED_RAMP;
    for i in (0..next.enemies.len()).rev() {
        next.enemies[i].y += enemy_speed * dt;

        // Past the bottom edge: gone, no score, no blast.
        if next.enemies[i].y > FIELD_H {
            next.enemies.remove(i);
            continue;
        }

        if intersects(&next.enemies[i].bounds(), &next.player.bounds()) {
            let rammed = next.enemies.remove(i);
            next.explosions.push(explosion_for(&rammed));
            next.energy = (next.energy - COLLISION_ENERGY_DRAIN).max(0);
            if next.energy == 0 {
                next.status = GameStatus::GameOver;
            }
            continue;
        }

        for j in (0..next.missiles.len()).rev() {
            if intersects(&next.missiles[j].bounds(), &next.enemies[i].bounds()) {
                next.missiles.remove(j);
                next.enemies[i].hits_left -= 1;
                if next.enemies[i].hits_left == 0 {
                    let destroyed = next.enemies.remove(i);
                    next.score += 1;
                    next.explosions.push(explosion_for(&destroyed));
                }
                break;
            }
        }
    }

    // ── 6. Items: advance, cull, apply pickups ───────────────────────────────
    for i in (0..next.items.len()).rev() {
        next.items[i].y += ITEM_SPEED * dt;

        if next.items[i].y > FIELD_H {
            next.items.remove(i);
            continue;
        }

        if intersects(&next.items[i].bounds(), &next.player.bounds()) {
            match next.items[i].kind {
                ItemKind::Energy => {
                    next.energy = (next.energy + ENERGY_ITEM_RESTORE).min(MAX_ENERGY);
                }
                ItemKind::Weapon => apply_weapon_pickup(&mut next),
            }
            next.items.remove(i);
        }
    }

    // ── 7. Missiles: advance, cull above the top edge ────────────────────────
    for j in (0..next.missiles.len()).rev() {
        let m = &mut next.missiles[j];
        m.y -= MISSILE_SPEED * dt;
        m.x += m.angle.sin() * MISSILE_DRIFT * dt;
        if m.y + m.h < 0.0 {
            next.missiles.remove(j);
        }
    }

    // ── 8. Blast visuals age out ─────────────────────────────────────────────
    for k in (0..next.explosions.len()).rev() {
        next.explosions[k].remaining -= dt;
        if next.explosions[k].remaining <= 0.0 {
            next.explosions.remove(k);
        }
    }

    next
}

/// Weapon pickup ladder: the first pickup halves the shot interval, the
/// second and third widen the volley to 2 and 3 missiles.  Capped — extra
/// pickups past the third do nothing.
fn apply_weapon_pickup(state: &mut GameState) {
    if state.weapon_pickups >= MAX_WEAPON_PICKUPS {
        return;
    }
    state.weapon_pickups += 1;
    match state.weapon_pickups {
        1 => state.shot_interval = BASE_SHOT_INTERVAL / 2.0,
        2 => state.missile_count = 2,
        _ => state.missile_count = 3,
    }
}
