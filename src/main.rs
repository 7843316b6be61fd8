use std::fs::OpenOptions;
use std::io::{stdout, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use crossterm::{terminal, ExecutableCommand};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use terminal_invaders::display;
use terminal_invaders::game;
use terminal_invaders::input::InputPump;

#[derive(Debug, Parser)]
#[command(name = "terminal_invaders", about = "Shoot down the swarm before it lands")]
struct Cli {
    /// Seed for the alien fire RNG; random (and logged) when omitted
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Append log records to this file.  Nothing is logged otherwise, since
    /// the terminal belongs to the game.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    info!("Starting session with seed {}", seed);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    let mut out = BufWriter::new(stdout());
    let input = InputPump::spawn();

    let result = game::run(&mut out, &input, &mut rng);

    // Always restore the terminal
    input.shutdown();
    let _ = display::finish(&mut out);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("Session ended");
    result.context("running the game loop")
}
