/// Fixed session parameters.  None of these are user-configurable; the
/// command line only controls seeding and logging.

use std::time::Duration;

// ── Playfield ─────────────────────────────────────────────────────────────────

pub const WIDTH: i32 = 60;
pub const HEIGHT: i32 = 20;

// ── Swarm ─────────────────────────────────────────────────────────────────────

pub const ALIEN_ROWS: i32 = 3;
pub const ALIEN_COLS: i32 = 6;

/// Top-left corner of the formation and the spacing between aliens.
pub const SWARM_ORIGIN_X: i32 = 10;
pub const SWARM_ORIGIN_Y: i32 = 3;
pub const SWARM_SPACING_X: i32 = 7;
pub const SWARM_SPACING_Y: i32 = 3;

/// Alien footprint used by the collision box.
pub const ALIEN_WIDTH: i32 = 6;
pub const ALIEN_HEIGHT: i32 = 2;

/// An alien at or past this column while moving right turns the swarm
/// around.  One column tighter than the footprint alone would require.
pub const SWARM_RIGHT_EDGE: i32 = WIDTH - ALIEN_WIDTH - 1;
pub const SWARM_LEFT_EDGE: i32 = 1;
/// An alien descending onto this row ends the round.
pub const DEADLINE_ROW: i32 = HEIGHT - 3;

/// Delay between swarm steps while at least half the swarm is alive.
pub const SWARM_BASE_SPEED: Duration = Duration::from_millis(500);
/// Delay between swarm steps once fewer than half remain.
pub const SWARM_FAST_SPEED: Duration = Duration::from_millis(300);

// ── Ship & projectiles ────────────────────────────────────────────────────────

pub const SHIP_WIDTH: i32 = 3;

pub const MAX_PLAYER_BULLETS: usize = 3;
pub const MAX_ALIEN_BULLETS: usize = 5;

// ── Timing & input ────────────────────────────────────────────────────────────

pub const TICKS_PER_SECOND: u32 = 20;
pub const TICK: Duration = Duration::from_millis(1000 / TICKS_PER_SECOND as u64);

/// Capacity of the queue between the input thread and the main loop.
pub const INPUT_QUEUE_CAPACITY: usize = 10;
