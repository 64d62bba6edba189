use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::input::InputState;

/// Unique identifier for a player in the game.
pub type PlayerId = u64;

/// Core trait every Lightcycle game implements.
///
/// The frame loop owns the game and calls `update` then `draw` exactly once
/// per frame; the game only handles its own simulation and rendering.
pub trait FrameGame {
    /// Game metadata, used for the window title and logs.
    fn metadata(&self) -> GameMetadata;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        30.0
    }

    /// Advance the simulation by one frame. Returns the game events it produced.
    fn update(&mut self, input: &InputState) -> Vec<GameEvent>;

    /// Render the current state. `frame` counts frames since the loop started.
    fn draw(&self, canvas: &mut dyn Canvas, frame: u64);
}

/// Static description of a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
}

/// Events emitted by a game during update (elimination, scoring, round end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerEliminated { player_id: PlayerId },
    ScoreUpdate { player_id: PlayerId, score: u32 },
    /// The round is over. `None` means nobody survived.
    RoundComplete { winner: Option<PlayerId> },
    MatchReset,
}
