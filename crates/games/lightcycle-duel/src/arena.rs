use crate::Direction;

/// Size of one grid cell in pixels.
pub const GRID_SIZE: f32 = 1.0;
/// Play-field width in cells.
pub const GRID_WIDTH: f32 = 150.0;
/// Play-field height in cells.
pub const GRID_HEIGHT: f32 = 150.0;

/// Play-field extent in pixels.
pub const FIELD_WIDTH: f32 = GRID_WIDTH * GRID_SIZE;
pub const FIELD_HEIGHT: f32 = GRID_HEIGHT * GRID_SIZE;

/// Distance a cycle travels per tick. Every position stays on a 1.5px
/// lattice, which is what lets collision compare coordinates exactly.
pub const MOTO_SPEED: f32 = 1.5;
/// Cycle glyph length along its travel direction.
pub const MOTO_LENGTH: f32 = 3.0;
/// Cycle glyph width across its travel direction.
pub const MOTO_WIDTH: f32 = 2.0;

/// A spawn position with starting direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
}

/// Fixed spawns: player 1 on the bottom edge heading up, player 2 on the
/// top edge heading down, both on the centre column.
pub const SPAWN_POINTS: [SpawnPoint; 2] = [
    SpawnPoint {
        x: FIELD_WIDTH / 2.0,
        y: FIELD_HEIGHT,
        direction: Direction::Up,
    },
    SpawnPoint {
        x: FIELD_WIDTH / 2.0,
        y: 0.0,
        direction: Direction::Down,
    },
];

/// Whether `(x, y)` is on or past the edge of the play field.
pub fn out_of_bounds(x: f32, y: f32) -> bool {
    x <= 0.0 || y <= 0.0 || x >= FIELD_WIDTH || y >= FIELD_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_face_each_other() {
        let [p1, p2] = SPAWN_POINTS;
        assert_eq!(p1.x, p2.x, "Both cycles start on the centre column");
        assert_eq!(p1.direction, Direction::Up);
        assert_eq!(p2.direction, Direction::Down);
        assert!(p1.y > p2.y);
    }

    #[test]
    fn edges_are_out_of_bounds() {
        assert!(out_of_bounds(0.0, 75.0));
        assert!(out_of_bounds(FIELD_WIDTH, 75.0));
        assert!(out_of_bounds(75.0, 0.0));
        assert!(out_of_bounds(75.0, FIELD_HEIGHT));
        assert!(out_of_bounds(-1.5, 75.0));
        assert!(!out_of_bounds(1.5, 148.5));
    }

    #[test]
    fn spawns_sit_on_the_speed_lattice() {
        for sp in SPAWN_POINTS {
            assert_eq!((sp.x / MOTO_SPEED).fract(), 0.0);
            assert_eq!((sp.y / MOTO_SPEED).fract(), 0.0);
        }
    }
}
