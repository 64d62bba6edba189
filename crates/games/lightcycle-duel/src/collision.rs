use crate::arena;
use crate::segment::Segment;
use crate::trajectory::{SegmentHandle, SegmentSource, TrajectoryIndex};
use crate::vehicle::Vehicle;

/// What a cycle ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    /// The edge of the play field.
    Boundary,
    /// A trail segment, named by its handle (`handle.owner` is the owner's slot).
    Trail { handle: SegmentHandle },
}

/// Check a cycle's current position against the field edges and every trail.
///
/// Only segments on the cycle's exact row or column can be hit. The segment
/// the cycle last turned off is recognised by its endpoint matching the last
/// turning point and is not counted.
pub fn check_collision<S>(vehicle: &Vehicle, index: &TrajectoryIndex, source: &S) -> Option<Crash>
where
    S: SegmentSource + ?Sized,
{
    let pos = vehicle.position;
    if arena::out_of_bounds(pos.x, pos.y) {
        return Some(Crash::Boundary);
    }

    let turn = vehicle.last_turning_point;

    // Vertical segments on this column, hit along y
    for (handle, segment) in index.vertical_at(pos.x, source) {
        if strikes(vehicle, segment, pos.y, segment.free_end.y, turn.y, segment.anchor.y) {
            return Some(Crash::Trail { handle });
        }
    }

    // Horizontal segments on this row, hit along x
    for (handle, segment) in index.horizontal_at(pos.y, source) {
        if strikes(vehicle, segment, pos.x, segment.free_end.x, turn.x, segment.anchor.x) {
            return Some(Crash::Trail { handle });
        }
    }

    None
}

/// The per-segment rule, written once for both axes. All coordinates are
/// along the segment's free axis.
fn strikes(
    vehicle: &Vehicle,
    segment: &Segment,
    coord: f32,
    free_end: f32,
    turn: f32,
    anchor: f32,
) -> bool {
    let hit = segment.intersects_free_axis(coord);
    if segment.orientation != vehicle.orientation && hit && free_end != turn {
        return true;
    }
    hit && turn != anchor && turn != free_end
}
