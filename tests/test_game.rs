use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use terminal_invaders::compute::init_state;
use terminal_invaders::config::TICK;
use terminal_invaders::entities::*;
use terminal_invaders::game::{advance_deadline, game_loop, run};
use terminal_invaders::input::InputPump;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// An input pump that presses each key after its delay, then goes quiet.
fn scripted(keys: Vec<(Duration, KeyCode)>) -> InputPump {
    let mut script = keys.into_iter();
    InputPump::spawn_with(move || match script.next() {
        Some((delay, code)) => {
            thread::sleep(delay);
            Ok(Some(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))))
        }
        None => {
            thread::sleep(Duration::from_millis(5));
            Ok(None)
        }
    })
}

// ── advance_deadline ──────────────────────────────────────────────────────────

#[test]
fn deadline_steps_one_tick_when_on_time() {
    let t0 = Instant::now();
    assert_eq!(advance_deadline(t0, t0), t0 + TICK);
    assert_eq!(advance_deadline(t0, t0 + TICK / 2), t0 + TICK);
}

#[test]
fn deadline_drops_missed_ticks() {
    let t0 = Instant::now();
    let late = t0 + TICK * 3 + Duration::from_millis(7);
    assert_eq!(advance_deadline(t0, late), late + TICK);
}

// ── game_loop ─────────────────────────────────────────────────────────────────

#[test]
fn quit_ends_a_fresh_session() {
    let input = scripted(vec![(Duration::ZERO, KeyCode::Char('q'))]);
    let mut out = Vec::new();
    assert!(run(&mut out, &input, &mut seeded_rng()).is_ok());
    assert!(!out.is_empty());
    input.shutdown();
}

#[test]
fn quit_is_honoured_after_game_over() {
    let input = scripted(vec![(Duration::ZERO, KeyCode::Char('q'))]);
    let state = GameSession {
        status: GameStatus::GameOver { won: false },
        ..init_state(Instant::now())
    };
    let mut out = Vec::new();
    let end = game_loop(&mut out, &input, &mut seeded_rng(), state).unwrap();
    assert_eq!(end.status, GameStatus::GameOver { won: false });
    input.shutdown();
}

#[test]
fn quit_after_ship_hit_returns() {
    let input = scripted(vec![(Duration::from_millis(300), KeyCode::Char('q'))]);
    let mut state = init_state(Instant::now());
    // Ship sits at (30, 18); the first tick lands this on it
    state.alien_bullets.push(Bullet::new(31, 17));
    let mut out = Vec::new();
    let end = game_loop(&mut out, &input, &mut seeded_rng(), state).unwrap();
    assert_eq!(end.status, GameStatus::GameOver { won: false });
    input.shutdown();
}

#[test]
fn fire_before_first_tick_is_drawn() {
    let input = scripted(vec![
        (Duration::ZERO, KeyCode::Char(' ')),
        (Duration::from_millis(300), KeyCode::Char('q')),
    ]);
    let mut out = Vec::new();
    game_loop(&mut out, &input, &mut seeded_rng(), init_state(Instant::now())).unwrap();
    input.shutdown();

    // Spawned at (31, 17), moved to (31, 16) by the first tick; the cursor
    // escape is 1-based row;col
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("\x1b[17;32Ho"));
}

#[test]
fn hung_up_input_ends_the_loop() {
    let input = InputPump::spawn_with(|| panic!("input source gone"));
    // Give the pump thread time to die and drop its sender
    thread::sleep(Duration::from_millis(50));
    let mut out = Vec::new();
    let state = init_state(Instant::now());
    let end = game_loop(&mut out, &input, &mut seeded_rng(), state).unwrap();
    assert_eq!(end.status, GameStatus::Playing);
    input.shutdown();
}
