/// All game entity types.  Pure data, no logic beyond small lookups.

use std::time::{Duration, Instant};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Integer cell coordinate on the playfield (x = column, y = row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ── Enumerations ──────────────────────────────────────────────────────────────

/// Row class of an alien.  Decides score, fire chance and sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienKind {
    Top,
    Middle,
    Bottom,
}

impl AlienKind {
    /// Kind for the given formation row (0 = top).
    pub fn for_row(row: i32) -> Self {
        match row {
            0 => AlienKind::Top,
            1 => AlienKind::Middle,
            _ => AlienKind::Bottom,
        }
    }

    /// Numeric tier: 0 for `Top`, 1 for `Middle`, 2 for `Bottom`.
    pub fn tier(self) -> u32 {
        match self {
            AlienKind::Top => 0,
            AlienKind::Middle => 1,
            AlienKind::Bottom => 2,
        }
    }

    /// Points awarded for destroying an alien of this kind.
    pub fn points(self) -> u32 {
        (self.tier() + 1) * 10
    }

    /// Percent chance that a selected alien of this kind actually fires.
    pub fn fire_chance(self) -> u32 {
        match self {
            AlienKind::Top => 15,
            AlienKind::Middle => 10,
            AlienKind::Bottom => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver { won: bool },
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::GameOver { .. })
    }

    pub fn is_won(self) -> bool {
        matches!(self, GameStatus::GameOver { won: true })
    }
}

/// Normalized player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Fire,
    Restart,
    Quit,
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub pos: Vec2,
    pub kind: AlienKind,
    pub alive: bool,
}

/// Shared shape for player and alien projectiles; the owner is implied by
/// which list the bullet lives in.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub active: bool,
}

impl Bullet {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            active: true,
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Everything that makes up one round.  Cloneable so the update functions
/// can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub ship: Ship,
    pub aliens: Vec<Alien>,
    /// Upward-travelling bullets fired by the ship.
    pub player_bullets: Vec<Bullet>,
    /// Downward-travelling bullets fired by the swarm.
    pub alien_bullets: Vec<Bullet>,
    pub score: u32,
    pub status: GameStatus,
    /// Horizontal swarm direction, +1 (right) or -1 (left).
    pub direction: i32,
    /// Minimum time between two swarm steps.
    pub speed: Duration,
    pub last_swarm_move: Instant,
}

impl GameSession {
    pub fn alive_aliens(&self) -> usize {
        self.aliens.iter().filter(|a| a.alive).count()
    }
}
