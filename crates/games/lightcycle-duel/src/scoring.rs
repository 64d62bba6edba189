use std::collections::HashMap;

use lightcycle_core::canvas::Canvas;
use lightcycle_core::color::Color;
use lightcycle_core::game_trait::PlayerId;

use crate::vehicle::Vehicle;

/// Points awarded to the last cycle standing.
pub const WIN_POINTS: u32 = 1;
/// Vertical spacing between scoreboard lines, in pixels.
pub const LINE_HEIGHT: f32 = 6.0;

/// One scoreboard line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub player_id: PlayerId,
    pub score: u32,
    pub color: Color,
}

impl Standing {
    pub fn label(&self) -> String {
        format!("Player {}:{}", self.player_id, self.score)
    }
}

/// Standings sorted by ascending score. Ties keep the order given.
pub fn standings<'a>(vehicles: impl IntoIterator<Item = &'a Vehicle>) -> Vec<Standing> {
    let mut lines: Vec<Standing> = vehicles
        .into_iter()
        .map(|v| Standing {
            player_id: v.id,
            score: v.score,
            color: v.color,
        })
        .collect();
    lines.sort_by_key(|s| s.score);
    lines
}

/// Scores to carry into the next round, keyed by player.
pub fn carried_scores<'a>(vehicles: impl IntoIterator<Item = &'a Vehicle>) -> HashMap<PlayerId, u32> {
    vehicles.into_iter().map(|v| (v.id, v.score)).collect()
}

/// Draw standings top-left, one line each.
pub fn draw_scoreboard(canvas: &mut dyn Canvas, standings: &[Standing]) {
    for (i, standing) in standings.iter().enumerate() {
        canvas.draw_text(0.0, i as f32 * LINE_HEIGHT, &standing.label(), standing.color);
    }
}
