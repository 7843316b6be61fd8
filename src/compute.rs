/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameSession` (plus, where needed, the clock reading or an RNG handle) and
/// returns a brand-new `GameSession`.  Side effects are limited to the
/// injected RNG and log output.

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng;

use crate::collision::{collides, hits_ship};
use crate::config::{
    ALIEN_COLS, ALIEN_ROWS, DEADLINE_ROW, HEIGHT, MAX_ALIEN_BULLETS, MAX_PLAYER_BULLETS,
    SHIP_WIDTH, SWARM_BASE_SPEED, SWARM_FAST_SPEED, SWARM_LEFT_EDGE, SWARM_ORIGIN_X,
    SWARM_ORIGIN_Y, SWARM_RIGHT_EDGE, SWARM_SPACING_X, SWARM_SPACING_Y, WIDTH,
};
use crate::entities::{Alien, AlienKind, Bullet, Command, GameSession, GameStatus, Ship, Vec2};

// ── Constructors ─────────────────────────────────────────────────────────────

fn spawn_swarm() -> Vec<Alien> {
    (0..ALIEN_ROWS)
        .flat_map(|row| {
            (0..ALIEN_COLS).map(move |col| Alien {
                pos: Vec2::new(
                    SWARM_ORIGIN_X + col * SWARM_SPACING_X,
                    SWARM_ORIGIN_Y + row * SWARM_SPACING_Y,
                ),
                kind: AlienKind::for_row(row),
                alive: true,
            })
        })
        .collect()
}

/// Build a fresh round.  `now` seeds the swarm's move timer.
pub fn init_state(now: Instant) -> GameSession {
    GameSession {
        ship: Ship {
            pos: Vec2::new(WIDTH / 2, HEIGHT - 2),
        },
        aliens: spawn_swarm(),
        player_bullets: Vec::with_capacity(MAX_PLAYER_BULLETS),
        alien_bullets: Vec::with_capacity(MAX_ALIEN_BULLETS),
        score: 0,
        status: GameStatus::Playing,
        direction: 1,
        speed: SWARM_BASE_SPEED,
        last_swarm_move: now,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_ship_left(state: &GameSession) -> GameSession {
    let mut ship = state.ship.clone();
    if ship.pos.x > 1 {
        ship.pos.x -= 1;
    }
    GameSession {
        ship,
        ..state.clone()
    }
}

pub fn move_ship_right(state: &GameSession) -> GameSession {
    let mut ship = state.ship.clone();
    if ship.pos.x < WIDTH - SHIP_WIDTH - 1 {
        ship.pos.x += 1;
    }
    GameSession {
        ship,
        ..state.clone()
    }
}

/// Fire from the middle of the ship.  At most 3 bullets are in flight.
pub fn fire(state: &GameSession) -> GameSession {
    if state.player_bullets.len() >= MAX_PLAYER_BULLETS {
        return state.clone();
    }
    let mut player_bullets = state.player_bullets.clone();
    player_bullets.push(Bullet::new(state.ship.pos.x + 1, state.ship.pos.y - 1));
    GameSession {
        player_bullets,
        ..state.clone()
    }
}

/// Apply one input command immediately.
///
/// While playing, movement and fire act on the ship and `Restart` is ignored.
/// Once the round is over only `Restart` has an effect.  `Quit` never changes
/// the session; the caller ends the loop.
pub fn apply_command(state: &GameSession, command: Command, now: Instant) -> GameSession {
    match (state.status, command) {
        (GameStatus::Playing, Command::MoveLeft) => move_ship_left(state),
        (GameStatus::Playing, Command::MoveRight) => move_ship_right(state),
        (GameStatus::Playing, Command::Fire) => fire(state),
        (GameStatus::GameOver { .. }, Command::Restart) => {
            info!("Restarting (previous score {})", state.score);
            init_state(now)
        }
        _ => state.clone(),
    }
}

// ── Bullet passes ────────────────────────────────────────────────────────────

/// Move player bullets up one row, resolving hits against the swarm.
///
/// A bullet already on the top row leaves the grid.  A bullet whose next cell
/// falls inside a living alien's box kills the first such alien in list order
/// and is consumed.
pub fn update_player_bullets(state: &GameSession) -> GameSession {
    let mut aliens = state.aliens.clone();
    let mut score = state.score;

    let player_bullets: Vec<Bullet> = state
        .player_bullets
        .iter()
        .filter_map(|b| {
            if !b.active || b.pos.y <= 0 {
                return None;
            }
            let next = Vec2::new(b.pos.x, b.pos.y - 1);
            if let Some(alien) = aliens.iter_mut().find(|a| a.alive && collides(next, a.pos)) {
                alien.alive = false;
                score += alien.kind.points();
                return None;
            }
            Some(Bullet {
                pos: next,
                ..b.clone()
            })
        })
        .collect();

    GameSession {
        aliens,
        player_bullets,
        score,
        ..state.clone()
    }
}

/// Move alien bullets down one row.
///
/// Landing on the ship ends the round, but the bullet itself stays in play
/// until it drops off the bottom row.
pub fn update_alien_bullets(state: &GameSession) -> GameSession {
    let mut ship_hit = false;

    let alien_bullets: Vec<Bullet> = state
        .alien_bullets
        .iter()
        .filter_map(|b| {
            if !b.active || b.pos.y >= HEIGHT - 1 {
                return None;
            }
            let next = Vec2::new(b.pos.x, b.pos.y + 1);
            if hits_ship(next, &state.ship) {
                ship_hit = true;
            }
            Some(Bullet {
                pos: next,
                ..b.clone()
            })
        })
        .collect();

    let status = if ship_hit {
        info!("Ship destroyed, final score {}", state.score);
        GameStatus::GameOver { won: false }
    } else {
        state.status
    };

    GameSession {
        alien_bullets,
        status,
        ..state.clone()
    }
}

// ── Swarm ────────────────────────────────────────────────────────────────────

fn at_edge(x: i32, direction: i32) -> bool {
    (direction > 0 && x >= SWARM_RIGHT_EDGE) || (direction < 0 && x <= SWARM_LEFT_EDGE)
}

/// Step the formation once `speed` has elapsed since the previous step.
///
/// The edge check runs on the pre-move positions.  If any living alien sits
/// on the edge it is heading for, the whole swarm reverses and drops one row
/// instead of stepping sideways.  The first alien to reach the deadline row
/// ends the round and the descent stops there.
pub fn move_swarm(state: &GameSession, now: Instant) -> GameSession {
    if now.saturating_duration_since(state.last_swarm_move) < state.speed {
        return state.clone();
    }

    let mut next = GameSession {
        last_swarm_move: now,
        ..state.clone()
    };

    let reverse = next
        .aliens
        .iter()
        .filter(|a| a.alive)
        .any(|a| at_edge(a.pos.x, state.direction));

    if !reverse {
        for alien in next.aliens.iter_mut().filter(|a| a.alive) {
            alien.pos.x += state.direction;
        }
        return next;
    }

    next.direction = -state.direction;
    debug!("Swarm reversing, now heading {:+}", next.direction);

    for alien in next.aliens.iter_mut().filter(|a| a.alive) {
        alien.pos.y += 1;
        if alien.pos.y >= DEADLINE_ROW {
            info!("Swarm reached row {}, final score {}", alien.pos.y, next.score);
            next.status = GameStatus::GameOver { won: false };
            break;
        }
    }

    next
}

/// Frontmost living alien of each column, as `(column x, alien index)` pairs
/// in order of first appearance.  Only these aliens may fire.
pub fn frontline(aliens: &[Alien]) -> Vec<(i32, usize)> {
    let mut columns: Vec<(i32, usize)> = Vec::new();
    for (i, alien) in aliens.iter().enumerate().filter(|(_, a)| a.alive) {
        match columns.iter_mut().find(|(x, _)| *x == alien.pos.x) {
            Some(entry) => {
                if aliens[entry.1].pos.y < alien.pos.y {
                    entry.1 = i;
                }
            }
            None => columns.push((alien.pos.x, i)),
        }
    }
    columns
}

/// Maybe fire one alien bullet.
///
/// A column is picked uniformly among the frontline, then the chosen alien's
/// kind decides whether it actually shoots.
pub fn alien_fire(state: &GameSession, rng: &mut impl Rng) -> GameSession {
    if state.alien_bullets.len() >= MAX_ALIEN_BULLETS {
        return state.clone();
    }

    let columns = frontline(&state.aliens);
    if columns.is_empty() {
        return state.clone();
    }

    let (_, index) = columns[rng.gen_range(0..columns.len())];
    let shooter = &state.aliens[index];
    if rng.gen_range(0..100u32) >= shooter.kind.fire_chance() {
        return state.clone();
    }

    let mut alien_bullets = state.alien_bullets.clone();
    alien_bullets.push(Bullet::new(shooter.pos.x + 2, shooter.pos.y + 2));
    GameSession {
        alien_bullets,
        ..state.clone()
    }
}

/// The round is won once no alien is left alive.
pub fn check_win(state: &GameSession) -> GameSession {
    if state.aliens.iter().any(|a| a.alive) {
        return state.clone();
    }
    if !state.status.is_won() {
        info!("Swarm destroyed, final score {}", state.score);
    }
    GameSession {
        status: GameStatus::GameOver { won: true },
        ..state.clone()
    }
}

/// Swarm step delay for the given head-count.
pub fn swarm_speed(alive: usize, total: usize) -> Duration {
    if alive < total / 2 {
        SWARM_FAST_SPEED
    } else {
        SWARM_BASE_SPEED
    }
}

pub fn adjust_swarm_speed(state: &GameSession) -> GameSession {
    let speed = swarm_speed(state.alive_aliens(), state.aliens.len());
    if speed != state.speed {
        debug!("Swarm step delay {:?} -> {:?}", state.speed, speed);
    }
    GameSession {
        speed,
        ..state.clone()
    }
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the round by one tick.  A finished round is left untouched.
///
/// Order: player bullets, alien bullets, swarm step, alien fire, win check,
/// speed adjustment.  A loss earlier in the tick does not stop the later
/// steps from running.
pub fn tick(state: &GameSession, now: Instant, rng: &mut impl Rng) -> GameSession {
    if state.status.is_over() {
        return state.clone();
    }

    let next = update_player_bullets(state);
    let next = update_alien_bullets(&next);
    let next = move_swarm(&next, now);
    let next = alien_fire(&next, rng);
    let next = check_win(&next);
    adjust_swarm_speed(&next)
}
