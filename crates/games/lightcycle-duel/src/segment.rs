use serde::{Deserialize, Serialize};

use lightcycle_core::canvas::Canvas;
use lightcycle_core::color::Color;

/// A position on the play field, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis a segment (or a moving cycle) lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// An axis-aligned piece of trail.
///
/// The anchor is where the segment started and never moves; the free end
/// follows the owning cycle until the cycle turns away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub anchor: Point,
    pub free_end: Point,
    pub orientation: Orientation,
    pub color: Color,
}

impl Segment {
    /// A zero-length segment at `anchor`.
    pub fn new(anchor: Point, color: Color, orientation: Orientation) -> Self {
        Self {
            anchor,
            free_end: anchor,
            orientation,
            color,
        }
    }

    /// Move the free end.
    pub fn extend(&mut self, free_end: Point) {
        debug_assert!(
            match self.orientation {
                Orientation::Vertical => free_end.x == self.anchor.x,
                Orientation::Horizontal => free_end.y == self.anchor.y,
            },
            "extending {:?} segment at {:?} off its axis to {:?}",
            self.orientation,
            self.anchor,
            free_end
        );
        self.free_end = free_end;
    }

    /// The coordinate shared by every point of the segment
    /// (x for vertical segments, y for horizontal ones).
    pub fn fixed_coord(&self) -> f32 {
        match self.orientation {
            Orientation::Vertical => self.anchor.x,
            Orientation::Horizontal => self.anchor.y,
        }
    }

    /// The two endpoint coordinates along the free axis, anchor first.
    pub fn free_axis_span(&self) -> (f32, f32) {
        match self.orientation {
            Orientation::Vertical => (self.anchor.y, self.free_end.y),
            Orientation::Horizontal => (self.anchor.x, self.free_end.x),
        }
    }

    /// Whether `coord` lies between the endpoints on the free axis, inclusive.
    pub fn intersects_free_axis(&self, coord: f32) -> bool {
        let (a, b) = self.free_axis_span();
        (coord >= a && coord <= b) || (coord >= b && coord <= a)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_line(
            self.anchor.x,
            self.anchor.y,
            self.free_end.x,
            self.free_end.y,
            self.color,
        );
    }
}
