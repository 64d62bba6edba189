use serde::{Deserialize, Serialize};

/// An RGB color used by every drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The fixed 16-color palette games pick their colors from.
    pub const PALETTE: &[Color] = &[
        Color::rgb(0x00, 0x00, 0x00), // Black
        Color::rgb(0x2b, 0x33, 0x5f), // Navy
        Color::rgb(0x7e, 0x20, 0x72), // Purple
        Color::rgb(0x19, 0x95, 0x9c), // Teal
        Color::rgb(0x8b, 0x48, 0x52), // Brown
        Color::rgb(0x39, 0x5c, 0x98), // Dark blue
        Color::rgb(0xa9, 0xc1, 0xff), // Light blue
        Color::rgb(0xee, 0xee, 0xee), // White
        Color::rgb(0xd4, 0x18, 0x6c), // Red
        Color::rgb(0xd3, 0x84, 0x41), // Orange
        Color::rgb(0xe9, 0xc3, 0x5b), // Yellow
        Color::rgb(0x70, 0xc6, 0xa9), // Green
        Color::rgb(0x76, 0x96, 0xde), // Blue
        Color::rgb(0xa3, 0xa3, 0xa3), // Grey
        Color::rgb(0xff, 0x97, 0x98), // Pink
        Color::rgb(0xed, 0xc7, 0xb0), // Peach
    ];

    /// Palette lookup. Indices wrap, so a frame counter can cycle colors.
    pub fn from_index(index: u64) -> Self {
        Self::PALETTE[(index % Self::PALETTE.len() as u64) as usize]
    }

    /// Whether this is the background color.
    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_sixteen_entries() {
        assert_eq!(Color::PALETTE.len(), 16);
        assert_eq!(Color::PALETTE[0], Color::BLACK);
    }

    #[test]
    fn from_index_wraps() {
        assert_eq!(Color::from_index(12), Color::from_index(28));
        assert_eq!(Color::from_index(16), Color::BLACK);
    }
}
