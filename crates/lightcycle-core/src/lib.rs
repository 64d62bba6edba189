pub mod canvas;
pub mod color;
pub mod frame_loop;
pub mod game_trait;
pub mod input;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::convert::Infallible;

    use crate::canvas::Canvas;
    use crate::color::Color;
    use crate::frame_loop::Backend;
    use crate::game_trait::{FrameGame, GameEvent, GameMetadata};
    use crate::input::{InputState, Key};

    /// A single recorded drawing call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear(Color),
        Line {
            from: (f32, f32),
            to: (f32, f32),
            color: Color,
        },
        Rect {
            from: (f32, f32),
            to: (f32, f32),
            color: Color,
        },
        Text {
            x: f32,
            y: f32,
            text: String,
            color: Color,
        },
    }

    /// Canvas that records every call instead of drawing.
    #[derive(Debug, Default)]
    pub struct RecordingCanvas {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingCanvas {
        pub fn new() -> Self {
            Self::default()
        }

        /// All text drawn so far, in call order.
        pub fn texts(&self) -> Vec<String> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Text { text, .. } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn lines(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Line { .. }))
                .collect()
        }

        pub fn rects(&self) -> Vec<&DrawCall> {
            self.calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Rect { .. }))
                .collect()
        }
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self, color: Color) {
            self.calls.push(DrawCall::Clear(color));
        }

        fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
            self.calls.push(DrawCall::Line {
                from: (x1, y1),
                to: (x2, y2),
                color,
            });
        }

        fn fill_rect(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
            self.calls.push(DrawCall::Rect {
                from: (x1, y1),
                to: (x2, y2),
                color,
            });
        }

        fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
            self.calls.push(DrawCall::Text {
                x,
                y,
                text: text.to_string(),
                color,
            });
        }
    }

    /// Backend replaying a fixed list of key presses, one entry per frame.
    ///
    /// Keys pressed in a frame are released at the next poll, so every
    /// scripted press is a fresh edge.
    pub struct ScriptedBackend {
        script: VecDeque<Vec<Key>>,
        held: Vec<Key>,
        polls: u64,
        quit_after: Option<u64>,
        pub canvas: RecordingCanvas,
        pub presents: u64,
    }

    impl ScriptedBackend {
        pub fn new(script: Vec<Vec<Key>>) -> Self {
            Self {
                script: script.into(),
                held: Vec::new(),
                polls: 0,
                quit_after: None,
                canvas: RecordingCanvas::new(),
                presents: 0,
            }
        }

        /// Request quit once `frames` frames have run.
        pub fn quit_after(mut self, frames: u64) -> Self {
            self.quit_after = Some(frames);
            self
        }
    }

    impl Backend for ScriptedBackend {
        type Error = Infallible;

        fn poll_input(&mut self, input: &mut InputState) -> Result<(), Infallible> {
            self.polls += 1;
            for key in self.held.drain(..) {
                input.on_key_up(key);
            }
            if let Some(keys) = self.script.pop_front() {
                for &key in &keys {
                    input.on_key_down(key);
                }
                self.held = keys;
            }
            Ok(())
        }

        fn canvas(&mut self) -> &mut dyn Canvas {
            &mut self.canvas
        }

        fn present(&mut self) -> Result<(), Infallible> {
            self.presents += 1;
            Ok(())
        }

        fn should_quit(&self) -> bool {
            self.quit_after.is_some_and(|frames| self.polls > frames)
        }
    }

    /// Minimal game that counts frames and reset-key presses.
    #[derive(Debug, Default)]
    pub struct CountingGame {
        pub updates: u64,
        pub presses_seen: Vec<u64>,
    }

    impl FrameGame for CountingGame {
        fn metadata(&self) -> GameMetadata {
            GameMetadata {
                name: "Counter".to_string(),
                description: "Counts frames".to_string(),
                min_players: 0,
                max_players: 0,
            }
        }

        fn update(&mut self, input: &InputState) -> Vec<GameEvent> {
            if input.is_key_just_pressed(Key::R) {
                self.presses_seen.push(self.updates);
            }
            self.updates += 1;
            Vec::new()
        }

        fn draw(&self, canvas: &mut dyn Canvas, frame: u64) {
            canvas.draw_text(0.0, 0.0, &format!("frame {frame}"), Color::BLACK);
        }
    }

    /// Run N updates with no keys pressed, returning all accumulated events.
    pub fn run_idle_ticks(game: &mut dyn FrameGame, n: usize) -> Vec<GameEvent> {
        let input = InputState::new();
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(&input));
        }
        all_events
    }

    /// Run one update with `keys` freshly pressed.
    pub fn press_keys(game: &mut dyn FrameGame, keys: &[Key]) -> Vec<GameEvent> {
        let mut input = InputState::new();
        for &key in keys {
            input.on_key_down(key);
        }
        game.update(&input)
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every FrameGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules with a fresh instance.

    /// Metadata must be filled in and the tick rate usable by `FrameClock`.
    pub fn contract_metadata_sane(game: &dyn FrameGame) {
        let meta = game.metadata();
        assert!(!meta.name.is_empty(), "metadata name must not be empty");
        assert!(
            meta.min_players <= meta.max_players,
            "min_players must not exceed max_players"
        );
        let rate = game.tick_rate();
        assert!(
            rate.is_finite() && rate > 0.0,
            "tick_rate must be positive, got {rate}"
        );
    }

    /// `draw` must start by clearing the canvas so frames never smear.
    pub fn contract_draw_clears_first(game: &dyn FrameGame) {
        let mut canvas = RecordingCanvas::new();
        game.draw(&mut canvas, 0);
        assert!(
            matches!(canvas.calls.first(), Some(DrawCall::Clear(_))),
            "draw must clear the canvas before anything else, got {:?}",
            canvas.calls.first()
        );
    }

    /// Running idle updates long enough must end the round.
    pub fn contract_round_eventually_completes(game: &mut dyn FrameGame, max_ticks: usize) {
        let input = InputState::new();
        for _ in 0..max_ticks {
            let events = game.update(&input);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::RoundComplete { .. }))
            {
                return;
            }
        }
        panic!("Game must complete a round within {max_ticks} idle ticks");
    }

    /// Once a round is over, further idle updates must not emit events.
    pub fn contract_finished_round_is_quiet(game: &mut dyn FrameGame, max_ticks: usize) {
        contract_round_eventually_completes(game, max_ticks);
        let events = run_idle_ticks(game, 10);
        assert!(
            events.is_empty(),
            "A finished round must stay quiet until reset, got {events:?}"
        );
    }
}
