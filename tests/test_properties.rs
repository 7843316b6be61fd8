use std::time::{Duration, Instant};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use terminal_invaders::collision::collides;
use terminal_invaders::compute::{apply_command, init_state, tick};
use terminal_invaders::config::*;
use terminal_invaders::display::Renderer;
use terminal_invaders::entities::*;

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::MoveLeft),
        Just(Command::MoveRight),
        Just(Command::Fire),
        Just(Command::Restart),
    ]
}

/// Run `ticks` ticks 50 ms apart, firing whenever `fire_every` divides the
/// tick number, and hand every consecutive pair of states to `check`.
fn simulate(
    seed: u64,
    ticks: u32,
    fire_every: u32,
    mut check: impl FnMut(&GameSession, &GameSession),
) {
    let t0 = Instant::now();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = init_state(t0);
    for n in 1..=ticks {
        let now = t0 + TICK * n;
        if n % fire_every == 0 {
            state = apply_command(&state, Command::Fire, now);
        }
        let next = tick(&state, now, &mut rng);
        check(&state, &next);
        state = next;
    }
}

proptest! {
    #[test]
    fn collision_matches_alien_footprint(
        ax in -5i32..65,
        ay in -5i32..25,
        dx in -10i32..10,
        dy in -10i32..10,
    ) {
        let expected = (0..=5).contains(&dx) && (0..=1).contains(&dy);
        prop_assert_eq!(collides(Vec2::new(ax + dx, ay + dy), Vec2::new(ax, ay)), expected);
    }

    #[test]
    fn ship_and_player_bullets_stay_bounded(commands in prop::collection::vec(command(), 0..120)) {
        let now = Instant::now();
        let mut state = init_state(now);
        for c in commands {
            state = apply_command(&state, c, now);
            prop_assert!(state.player_bullets.len() <= MAX_PLAYER_BULLETS);
            prop_assert!(state.ship.pos.x >= 1 && state.ship.pos.x <= WIDTH - 4);
        }
    }

    #[test]
    fn alien_bullets_and_swarm_stay_bounded(seed in any::<u64>(), fire_every in 1u32..8) {
        simulate(seed, 400, fire_every, |_, next| {
            assert!(next.alien_bullets.len() <= MAX_ALIEN_BULLETS);
            assert!(next.player_bullets.len() <= MAX_PLAYER_BULLETS);
            for a in &next.aliens {
                assert!(a.pos.x >= SWARM_LEFT_EDGE && a.pos.x <= SWARM_RIGHT_EDGE);
            }
        });
    }

    #[test]
    fn swarm_moves_rigidly(seed in any::<u64>(), fire_every in 1u32..8) {
        simulate(seed, 400, fire_every, |prev, next| {
            if next.status.is_over() {
                return;
            }
            let deltas: Vec<(i32, i32)> = prev
                .aliens
                .iter()
                .zip(&next.aliens)
                .filter(|(_, after)| after.alive)
                .map(|(before, after)| (after.pos.x - before.pos.x, after.pos.y - before.pos.y))
                .collect();
            if let Some(first) = deltas.first() {
                assert!(deltas.iter().all(|d| d == first), "{:?}", deltas);
                assert!(matches!(*first, (0, 0) | (1, 0) | (-1, 0) | (0, 1)));
            }
        });
    }

    #[test]
    fn redraw_without_changes_is_silent(seed in any::<u64>(), ticks in 0u32..60) {
        let t0 = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = init_state(t0);
        for n in 1..=ticks {
            state = tick(&state, t0 + Duration::from_millis(50) * n, &mut rng);
        }
        let mut renderer = Renderer::new();
        renderer.draw(&mut Vec::new(), &state).unwrap();
        prop_assert_eq!(renderer.draw(&mut Vec::new(), &state).unwrap(), 0);
    }
}
