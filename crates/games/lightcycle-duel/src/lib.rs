pub mod arena;
pub mod collision;
pub mod config;
pub mod scoring;
pub mod segment;
pub mod trajectory;
pub mod vehicle;

use serde::{Deserialize, Serialize};

use lightcycle_core::canvas::Canvas;
use lightcycle_core::color::Color;
use lightcycle_core::game_trait::{FrameGame, GameEvent, GameMetadata, PlayerId};
use lightcycle_core::input::InputState;

use arena::{FIELD_HEIGHT, FIELD_WIDTH, SPAWN_POINTS};
use collision::Crash;
use config::DuelConfig;
use segment::{Orientation, Point, Segment};
use trajectory::{SegmentHandle, TrajectoryIndex};
use vehicle::Vehicle;

/// Cardinal direction on the field. Up is towards y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Left | Direction::Right => Orientation::Horizontal,
        }
    }

    /// Unit step `(dx, dy)` in this direction.
    pub fn step(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Running,
    Winner(PlayerId),
    Draw,
}

/// Serializable view of a match, for debug dumps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub outcome: Outcome,
    pub vehicles: Vec<VehicleSnapshot>,
    pub vertical: Vec<SegmentHandle>,
    pub horizontal: Vec<SegmentHandle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub id: PlayerId,
    pub score: u32,
    pub position: Point,
    pub direction: Direction,
    pub last_turning_point: Point,
    pub alive: bool,
    pub won: bool,
    pub trail: Vec<Segment>,
}

/// The two-player light-cycle duel.
pub struct LightCycleDuel {
    /// Indexed by slot; player `n` sits in slot `n - 1`.
    vehicles: Vec<Vehicle>,
    /// Slots still riding, in update order.
    alive: Vec<usize>,
    /// Slots in order of elimination.
    dead: Vec<usize>,
    index: TrajectoryIndex,
    config: DuelConfig,
}

impl LightCycleDuel {
    pub fn new() -> Self {
        Self::with_config(DuelConfig::load())
    }

    pub fn with_config(config: DuelConfig) -> Self {
        let vehicles = spawn_vehicles(&config, [0, 0]);
        tracing::info!("Creating players");
        Self {
            alive: (0..vehicles.len()).collect(),
            dead: Vec::new(),
            vehicles,
            index: TrajectoryIndex::new(),
            config,
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: PlayerId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn index(&self) -> &TrajectoryIndex {
        &self.index
    }

    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.alive.iter().map(|&s| self.vehicles[s].id).collect()
    }

    pub fn dead_ids(&self) -> Vec<PlayerId> {
        self.dead.iter().map(|&s| self.vehicles[s].id).collect()
    }

    pub fn outcome(&self) -> Outcome {
        match self.alive.as_slice() {
            [] => Outcome::Draw,
            [winner] => Outcome::Winner(self.vehicles[*winner].id),
            _ => Outcome::Running,
        }
    }

    /// Cumulative score per player, player 1 first.
    pub fn scores(&self) -> Vec<(PlayerId, u32)> {
        self.vehicles.iter().map(|v| (v.id, v.score)).collect()
    }

    /// Start a fresh round, keeping every player's score.
    pub fn reset(&mut self) {
        let carried = scoring::carried_scores(&self.vehicles);
        let scores = [1, 2].map(|id| carried.get(&id).copied().unwrap_or(0));
        tracing::info!(score1 = scores[0], score2 = scores[1], "Creating players");

        self.vehicles = spawn_vehicles(&self.config, scores);
        self.alive = (0..self.vehicles.len()).collect();
        self.dead.clear();
        self.index.clear();
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            outcome: self.outcome(),
            vehicles: self
                .vehicles
                .iter()
                .map(|v| VehicleSnapshot {
                    id: v.id,
                    score: v.score,
                    position: v.position,
                    direction: v.direction,
                    last_turning_point: v.last_turning_point,
                    alive: v.alive,
                    won: v.won,
                    trail: v.trail.clone(),
                })
                .collect(),
            vertical: self.index.vertical().to_vec(),
            horizontal: self.index.horizontal().to_vec(),
        }
    }

    /// Alive slots first, then the dead in elimination order.
    fn roster(&self) -> impl Iterator<Item = &Vehicle> {
        self.alive
            .iter()
            .chain(&self.dead)
            .map(|&slot| &self.vehicles[slot])
    }

    fn eliminate(&mut self, slot: usize, crash: Crash) {
        let player_id = self.vehicles[slot].id;
        match crash {
            Crash::Boundary => tracing::debug!(player_id, "Cycle hit the field edge"),
            Crash::Trail { handle } => {
                let owner = self.vehicles[handle.owner].id;
                tracing::debug!(
                    player_id,
                    owner,
                    segment = handle.index,
                    "Cycle hit a trail"
                );
            },
        }
        tracing::info!(player_id, "Player dies");

        self.vehicles[slot].die();
        self.alive.retain(|&s| s != slot);
        self.dead.push(slot);
    }

    fn dump_snapshot(&self) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        match serde_json::to_string(&self.snapshot()) {
            Ok(json) => tracing::debug!(snapshot = %json, "Round over"),
            Err(e) => tracing::warn!(error = %e, "Failed to encode match snapshot"),
        }
    }
}

impl Default for LightCycleDuel {
    fn default() -> Self {
        Self::with_config(DuelConfig::default())
    }
}

fn spawn_vehicles(config: &DuelConfig, scores: [u32; 2]) -> Vec<Vehicle> {
    SPAWN_POINTS
        .iter()
        .zip(&config.players)
        .zip(scores)
        .enumerate()
        .map(|(slot, ((spawn, player), score))| {
            Vehicle::new(
                slot as PlayerId + 1,
                score,
                Point::new(spawn.x, spawn.y),
                spawn.direction,
                player.keys,
                Color::from_index(player.color_index as u64),
            )
        })
        .collect()
}

impl FrameGame for LightCycleDuel {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Lightcycle Duel".to_string(),
            description: "Ride, leave a wall, and outlast your rival.".to_string(),
            min_players: 2,
            max_players: 2,
        }
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate
    }

    fn update(&mut self, input: &InputState) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if input.is_key_just_pressed(self.config.reset_key) {
            self.reset();
            events.push(GameEvent::MatchReset);
        }

        if self.alive.len() < 2 {
            return events;
        }

        // Move every cycle before checking anyone, so the check sees the whole tick
        for &slot in &self.alive {
            let vehicle = &mut self.vehicles[slot];
            vehicle.update(input);
            self.index.merge_delta(&vehicle.trail_delta(slot));
        }

        let crashes: Vec<(usize, Crash)> = self
            .alive
            .iter()
            .filter_map(|&slot| {
                self.vehicles[slot]
                    .check_collision(&self.index, self.vehicles.as_slice())
                    .map(|crash| (slot, crash))
            })
            .collect();

        for (slot, crash) in crashes {
            let player_id = self.vehicles[slot].id;
            self.eliminate(slot, crash);
            events.push(GameEvent::PlayerEliminated { player_id });
        }

        match self.alive.as_slice() {
            [] => {
                tracing::info!("Round drawn");
                events.push(GameEvent::RoundComplete { winner: None });
                self.dump_snapshot();
            },
            &[slot] => {
                let winner = &mut self.vehicles[slot];
                if winner.win() {
                    tracing::info!(player_id = winner.id, score = winner.score, "Player wins");
                    events.push(GameEvent::ScoreUpdate {
                        player_id: winner.id,
                        score: winner.score,
                    });
                    events.push(GameEvent::RoundComplete {
                        winner: Some(winner.id),
                    });
                }
                self.dump_snapshot();
            },
            _ => {},
        }

        events
    }

    fn draw(&self, canvas: &mut dyn Canvas, frame: u64) {
        canvas.clear(Color::BLACK);

        let banner_x = FIELD_WIDTH / 2.0 - 25.0;
        let banner_y = FIELD_HEIGHT / 2.0 - 10.0;
        let banner_color = Color::from_index(frame);
        match self.outcome() {
            Outcome::Draw => canvas.draw_text(banner_x, banner_y, "Draw", banner_color),
            Outcome::Winner(id) => {
                canvas.draw_text(banner_x, banner_y, &format!("Player {id} wins!"), banner_color)
            },
            Outcome::Running => {
                for vehicle in self.roster() {
                    vehicle.draw(canvas);
                }
            },
        }

        scoring::draw_scoreboard(canvas, &scoring::standings(self.roster()));
    }
}
