use crate::canvas::Canvas;
use crate::game_trait::{FrameGame, GameEvent};
use crate::input::InputState;
use crate::time::FrameClock;

/// The window/input side of the frame loop.
pub trait Backend {
    type Error;

    /// Feed this frame's key events into `input`. Must not block.
    fn poll_input(&mut self, input: &mut InputState) -> Result<(), Self::Error>;

    /// Surface the game draws into this frame.
    fn canvas(&mut self) -> &mut dyn Canvas;

    /// Show the finished frame.
    fn present(&mut self) -> Result<(), Self::Error>;

    /// Whether the user asked to leave.
    fn should_quit(&self) -> bool;
}

/// Drive `game` until the backend asks to quit or `max_frames` have run.
///
/// Each frame runs exactly one `update` followed by one `draw`.
/// Returns the number of frames run.
pub fn run_loop<G, B>(
    game: &mut G,
    backend: &mut B,
    clock: &mut FrameClock,
    max_frames: Option<u64>,
) -> Result<u64, B::Error>
where
    G: FrameGame + ?Sized,
    B: Backend + ?Sized,
{
    let mut input = InputState::new();
    let mut frame: u64 = 0;

    tracing::info!(game = %game.metadata().name, tick_rate = game.tick_rate(), "Frame loop starting");

    loop {
        if max_frames.is_some_and(|max| frame >= max) {
            break;
        }

        backend.poll_input(&mut input)?;
        if backend.should_quit() {
            tracing::info!(frame, "Quit requested");
            break;
        }

        let events = game.update(&input);
        for event in &events {
            log_event(frame, event);
        }

        game.draw(backend.canvas(), frame);
        backend.present()?;

        input.end_frame();
        frame += 1;
        clock.wait_next();
    }

    if clock.skipped_frames() > 0 {
        tracing::debug!(skipped = clock.skipped_frames(), "Frames skipped while behind");
    }
    Ok(frame)
}

fn log_event(frame: u64, event: &GameEvent) {
    match event {
        GameEvent::PlayerEliminated { player_id } => {
            tracing::info!(frame, player_id, "Player eliminated");
        },
        GameEvent::ScoreUpdate { player_id, score } => {
            tracing::info!(frame, player_id, score, "Score updated");
        },
        GameEvent::RoundComplete { winner: Some(id) } => {
            tracing::info!(frame, winner = id, "Round complete");
        },
        GameEvent::RoundComplete { winner: None } => {
            tracing::info!(frame, "Round complete: draw");
        },
        GameEvent::MatchReset => tracing::info!(frame, "Match reset"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::test_helpers::{CountingGame, ScriptedBackend};

    #[test]
    fn runs_until_max_frames() {
        let mut game = CountingGame::default();
        let mut backend = ScriptedBackend::new(vec![]);
        let frames = run_loop(&mut game, &mut backend, &mut FrameClock::unthrottled(), Some(5))
            .unwrap();
        assert_eq!(frames, 5);
        assert_eq!(game.updates, 5);
        assert_eq!(backend.presents, 5);
    }

    #[test]
    fn quit_stops_before_update() {
        let mut game = CountingGame::default();
        let mut backend = ScriptedBackend::new(vec![]).quit_after(3);
        let frames = run_loop(&mut game, &mut backend, &mut FrameClock::unthrottled(), None)
            .unwrap();
        assert_eq!(frames, 3);
        assert_eq!(game.updates, 3);
    }

    #[test]
    fn presses_are_edges_for_one_frame() {
        let mut game = CountingGame::default();
        let mut backend = ScriptedBackend::new(vec![vec![Key::R], vec![], vec![Key::R]]);
        run_loop(&mut game, &mut backend, &mut FrameClock::unthrottled(), Some(4)).unwrap();
        assert_eq!(game.presses_seen, vec![0, 2]);
    }

    #[test]
    fn draw_receives_frame_number() {
        let mut game = CountingGame::default();
        let mut backend = ScriptedBackend::new(vec![]);
        run_loop(&mut game, &mut backend, &mut FrameClock::unthrottled(), Some(3)).unwrap();
        assert_eq!(backend.canvas.texts(), vec!["frame 0", "frame 1", "frame 2"]);
    }
}
