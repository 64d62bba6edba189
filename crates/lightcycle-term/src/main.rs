use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use lightcycle_core::frame_loop::run_loop;
use lightcycle_core::game_trait::FrameGame;
use lightcycle_core::time::FrameClock;
use lightcycle_duel::LightCycleDuel;
use lightcycle_duel::arena::{FIELD_HEIGHT, FIELD_WIDTH};
use lightcycle_term::config::TermConfig;
use lightcycle_term::error::TermError;
use lightcycle_term::terminal::{TerminalBackend, TerminalGuard};

fn main() -> anyhow::Result<()> {
    let config = TermConfig::load().context("loading host config")?;
    init_logging(&config)?;

    tracing::info!(scale = config.scale, "Lightcycle starting");

    let mut game = LightCycleDuel::new();
    let mut clock = FrameClock::new(game.tick_rate());

    let frames = {
        let mut backend = TerminalBackend::stdout(
            FIELD_WIDTH as usize,
            FIELD_HEIGHT as usize,
            config.scale as usize,
        );
        // Restores the terminal on every way out of this block
        let _guard = TerminalGuard::enter(&mut std::io::stdout())?;
        run_loop(&mut game, &mut backend, &mut clock, None)?
    };

    tracing::info!(
        frames,
        skipped = clock.skipped_frames(),
        scores = ?game.scores(),
        "Lightcycle exiting"
    );
    Ok(())
}

/// Log to a file; the terminal belongs to the renderer.
fn init_logging(config: &TermConfig) -> Result<(), TermError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|source| TermError::LogFile {
            path: config.log_file.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
