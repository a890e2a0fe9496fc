/// All game entity types — pure data, no logic.
///
/// World coordinates are floating-point, origin at the top-left of the
/// play field, y growing downward.  Every solid entity is an axis-aligned
/// rectangle; `bounds()` is the view collision code works with.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyKind {
    /// One missile hit destroys it.
    Scout,
    /// Armored — takes two missile hits.
    Cruiser,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemKind {
    /// Restores energy on pickup, capped at the maximum.
    Energy,
    /// Advances the weapon pickup level (fire rate, then spread width).
    Weapon,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Axis-aligned rectangle used for all collision tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.w, h: self.h }
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub kind: EnemyKind,
    /// Missile hits remaining before the enemy is destroyed.
    pub hits_left: u32,
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.w, h: self.h }
    }
}

// ── Missile ───────────────────────────────────────────────────────────────────

/// A player missile.  Travels upward; spread shots also drift sideways
/// proportionally to the sine of their launch angle.
#[derive(Clone, Copy, Debug)]
pub struct Missile {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Launch angle in radians, 0 = straight up, positive = rightward.
    pub angle: f64,
}

impl Missile {
    pub fn bounds(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.w, h: self.h }
    }
}

// ── Item ──────────────────────────────────────────────────────────────────────

/// A falling power-up item.
#[derive(Clone, Copy, Debug)]
pub struct Item {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub kind: ItemKind,
}

impl Item {
    pub fn bounds(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: self.w, h: self.h }
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

/// Transient visual left behind by a destroyed enemy.  Purely cosmetic;
/// nothing collides with it.
#[derive(Clone, Copy, Debug)]
pub struct Explosion {
    /// Center of the blast.
    pub x: f64,
    pub y: f64,
    /// Initial blast radius in world units.
    pub size: f64,
    /// Seconds of display time remaining.
    pub remaining: f64,
}

// ── Per-tick input ────────────────────────────────────────────────────────────

/// Snapshot of the player's control input for one tick.  Built by the
/// host shell each frame; the simulation never reads devices directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    /// Absolute target for the player's center x (pointer drag).
    /// When set it overrides the held-direction keys.
    pub drag_x: Option<f64>,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub missiles: Vec<Missile>,
    pub items: Vec<Item>,
    /// Short-lived blast visuals after an enemy is destroyed.
    pub explosions: Vec<Explosion>,
    /// Hull energy, always within 0..=100.  Reaching 0 ends the session.
    pub energy: i32,
    pub score: u32,
    /// Best score seen across sessions (loaded at startup).
    pub high_score: u32,
    /// Missiles per volley: 1, 2 or 3.  Never decreases within a session.
    pub missile_count: u32,
    /// Weapon items collected so far, capped at 3.
    pub weapon_pickups: u32,
    /// Seconds between auto-fire volleys.
    pub shot_interval: f64,
    /// Seconds elapsed since the session started.
    pub clock: f64,
    /// Clock value at the last auto-fire volley.
    pub last_shot: f64,
    /// Clock value at the last item spawn.
    pub last_item: f64,
    pub status: GameStatus,
}
