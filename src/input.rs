/// Keyboard acquisition.
///
/// A dedicated thread reads terminal events, keeps only the keys the game
/// understands and forwards them as `Command`s through a bounded queue, so
/// the main loop never blocks on terminal I/O.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::config::INPUT_QUEUE_CAPACITY;
use crate::entities::Command;

/// How long one terminal poll may block before the stop flag is rechecked.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Map a key press to a game command.  Releases, repeats and unbound keys
/// yield `None`.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        // Raw mode swallows SIGINT
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Command::Quit)
        }
        KeyCode::Left | KeyCode::Char('a') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') => Some(Command::MoveRight),
        KeyCode::Char(' ') => Some(Command::Fire),
        KeyCode::Char('r') => Some(Command::Restart),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}

/// Forward commands from `next_event` into `tx` until `stop` is raised or the
/// receiving side hangs up.
///
/// `next_event` returns `Ok(None)` when nothing arrived within its poll
/// window.  Read errors are skipped and retried on the next poll.
pub fn pump<F>(mut next_event: F, tx: &SyncSender<Command>, stop: &AtomicBool)
where
    F: FnMut() -> io::Result<Option<Event>>,
{
    while !stop.load(Ordering::Relaxed) {
        let key = match next_event() {
            Ok(Some(Event::Key(key))) => key,
            Ok(_) => continue,
            Err(err) => {
                debug!("Input read failed, retrying: {}", err);
                continue;
            }
        };
        if let Some(command) = command_for(&key) {
            if tx.send(command).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    }
}

fn poll_terminal() -> io::Result<Option<Event>> {
    if event::poll(POLL_INTERVAL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Handle to the input thread and the receiving end of its queue.
pub struct InputPump {
    rx: Receiver<Command>,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl InputPump {
    /// Start reading from the terminal.
    pub fn spawn() -> Self {
        Self::spawn_with(poll_terminal)
    }

    /// Start a pump over an arbitrary event source.
    pub fn spawn_with<F>(next_event: F) -> Self
    where
        F: FnMut() -> io::Result<Option<Event>> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(INPUT_QUEUE_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || pump(next_event, &tx, &flag));
        Self { rx, stop, handle }
    }

    /// Wait up to `timeout` for the next command.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Command, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Stop the thread and wait for it to exit.
    pub fn shutdown(self) {
        let InputPump { rx, stop, handle } = self;
        stop.store(true, Ordering::Relaxed);
        // Unblocks a producer stuck on a full queue
        drop(rx);
        if handle.join().is_err() {
            warn!("Input thread panicked");
        }
    }
}
