use lightcycle_core::canvas::Canvas;
use lightcycle_core::color::Color;
use lightcycle_core::game_trait::PlayerId;
use lightcycle_core::input::InputState;

use crate::Direction;
use crate::arena::{MOTO_LENGTH, MOTO_SPEED, MOTO_WIDTH};
use crate::collision::{self, Crash};
use crate::config::KeyMap;
use crate::scoring::WIN_POINTS;
use crate::segment::{Orientation, Point, Segment};
use crate::trajectory::{SegmentHandle, SegmentSource, TrailDelta, TrajectoryIndex};

/// A light cycle and the trail it has laid.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: PlayerId,
    pub score: u32,
    pub position: Point,
    pub direction: Direction,
    /// Always `direction.orientation()`.
    pub orientation: Orientation,
    pub color: Color,
    pub keys: KeyMap,
    /// Never empty; the last segment is the open one.
    pub trail: Vec<Segment>,
    pub last_turning_point: Point,
    pub alive: bool,
    pub won: bool,
    pub turned_this_tick: bool,
}

impl Vehicle {
    pub fn new(
        id: PlayerId,
        score: u32,
        position: Point,
        direction: Direction,
        keys: KeyMap,
        color: Color,
    ) -> Self {
        let orientation = direction.orientation();
        Self {
            id,
            score,
            position,
            direction,
            orientation,
            color,
            keys,
            trail: vec![Segment::new(position, color, orientation)],
            last_turning_point: position,
            alive: true,
            won: false,
            turned_this_tick: false,
        }
    }

    /// Advance one tick: read a turn, grow the trail, then move.
    pub fn update(&mut self, input: &InputState) {
        if !self.alive {
            return;
        }
        self.check_direction_change(input);
        self.update_trail();
        self.update_position();
    }

    /// Accept at most one turn, polling Up, Down, Left, Right in that order.
    fn check_direction_change(&mut self, input: &InputState) {
        self.turned_this_tick = false;

        let requested = [
            (self.keys.up, Direction::Up),
            (self.keys.down, Direction::Down),
            (self.keys.left, Direction::Left),
            (self.keys.right, Direction::Right),
        ];
        for (key, direction) in requested {
            if input.is_key_just_pressed(key) && self.steer(direction) {
                break;
            }
        }
    }

    /// Turn toward `direction` if it leaves the current axis.
    ///
    /// Reversals and same-axis presses are refused. The turning point is the
    /// position before this tick's move.
    fn steer(&mut self, direction: Direction) -> bool {
        if self.turned_this_tick || direction.orientation() == self.orientation {
            return false;
        }
        self.direction = direction;
        self.orientation = direction.orientation();
        self.turned_this_tick = true;
        self.last_turning_point = self.position;
        true
    }

    fn update_trail(&mut self) {
        let position = self.position;
        self.open_segment_mut().extend(position);
        if self.turned_this_tick {
            self.trail
                .push(Segment::new(position, self.color, self.orientation));
        }
    }

    fn update_position(&mut self) {
        let (dx, dy) = self.direction.step();
        self.position.x += dx * MOTO_SPEED;
        self.position.y += dy * MOTO_SPEED;
    }

    /// The segment still following the cycle.
    pub fn open_segment(&self) -> &Segment {
        debug_assert!(!self.trail.is_empty(), "trail must never be empty");
        &self.trail[self.trail.len() - 1]
    }

    fn open_segment_mut(&mut self) -> &mut Segment {
        debug_assert!(!self.trail.is_empty(), "trail must never be empty");
        let last = self.trail.len() - 1;
        &mut self.trail[last]
    }

    /// Segments changed by the last update: the one just sealed (after a
    /// turn) and the open one. `slot` is this cycle's place in the match.
    pub fn trail_delta(&self, slot: usize) -> Vec<TrailDelta> {
        let changed = if self.turned_this_tick { 2 } else { 1 };
        let start = self.trail.len().saturating_sub(changed);
        self.trail[start..]
            .iter()
            .enumerate()
            .map(|(offset, segment)| TrailDelta {
                handle: SegmentHandle {
                    owner: slot,
                    index: start + offset,
                },
                orientation: segment.orientation,
            })
            .collect()
    }

    /// Test the current position against the field edges and every indexed trail.
    pub fn check_collision<S>(&self, index: &TrajectoryIndex, source: &S) -> Option<Crash>
    where
        S: SegmentSource + ?Sized,
    {
        collision::check_collision(self, index, source)
    }

    /// Credit the round win. Only the first call per round scores.
    pub fn win(&mut self) -> bool {
        if self.won {
            return false;
        }
        self.won = true;
        self.score += WIN_POINTS;
        true
    }

    pub fn die(&mut self) {
        self.alive = false;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for segment in &self.trail {
            segment.draw(canvas);
        }

        if !self.alive {
            return;
        }
        let Point { x, y } = self.position;
        let half = MOTO_WIDTH / 2.0;
        match self.direction {
            Direction::Up => canvas.fill_rect(x - half, y, x + half, y - MOTO_LENGTH, self.color),
            Direction::Down => canvas.fill_rect(x - half, y, x + half, y + MOTO_LENGTH, self.color),
            Direction::Left => canvas.fill_rect(x - MOTO_LENGTH, y - half, x, y + half, self.color),
            Direction::Right => {
                canvas.fill_rect(x + MOTO_LENGTH, y - half, x, y + half, self.color)
            },
        }
    }
}

impl SegmentSource for [Vehicle] {
    fn segment(&self, handle: SegmentHandle) -> Option<&Segment> {
        self.get(handle.owner)?.trail.get(handle.index)
    }
}
