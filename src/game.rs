/// The dispatch loop: the one place where the ticker, the input queue, the
/// simulation and the renderer meet.

use std::io::{self, Write};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Instant;

use crossterm::{terminal, ExecutableCommand};
use log::info;
use rand::Rng;

use crate::compute::{apply_command, init_state, tick};
use crate::config::TICK;
use crate::display::{self, Renderer};
use crate::entities::{Command, GameSession};
use crate::input::InputPump;

/// Deadline of the tick after the one just served at `now`.  When the loop
/// has fallen more than a tick behind, the missed ticks are dropped instead
/// of being replayed back to back.
pub fn advance_deadline(deadline: Instant, now: Instant) -> Instant {
    let next = deadline + TICK;
    if next <= now {
        now + TICK
    } else {
        next
    }
}

/// Single consumer of both event sources, starting from `state`.
///
/// A due tick is always served before more input is read, so a flood of key
/// presses cannot stall the simulation.  Commands arriving between ticks are
/// applied at once and show up in the next frame.  Returns the session as it
/// stood on Quit, or when the input side hung up.
pub fn game_loop<W: Write>(
    out: &mut W,
    input: &InputPump,
    rng: &mut impl Rng,
    mut state: GameSession,
) -> io::Result<GameSession> {
    let mut renderer = Renderer::new();
    renderer.draw(out, &state)?;

    let mut next_tick = Instant::now() + TICK;
    loop {
        let now = Instant::now();
        if now >= next_tick {
            state = tick(&state, now, rng);
            renderer.draw(out, &state)?;
            next_tick = advance_deadline(next_tick, now);
            continue;
        }

        match input.recv_timeout(next_tick - now) {
            Ok(Command::Quit) => {
                info!("Quit with score {}", state.score);
                return Ok(state);
            }
            Ok(command) => state = apply_command(&state, command, Instant::now()),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(state),
        }
    }
}

/// Switch to the alternate screen and play a fresh round until Quit.
pub fn run<W: Write>(out: &mut W, input: &InputPump, rng: &mut impl Rng) -> io::Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    display::begin(out)?;
    game_loop(out, input, rng, init_state(Instant::now()))?;
    Ok(())
}
