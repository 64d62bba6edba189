use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A physical key, named by its key-code string (`"KeyW"`, `"ArrowUp"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    /// A letter key, stored uppercase.
    Letter(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    Escape,
}

impl Key {
    pub const W: Key = Key::Letter('W');
    pub const A: Key = Key::Letter('A');
    pub const S: Key = Key::Letter('S');
    pub const D: Key = Key::Letter('D');
    pub const R: Key = Key::Letter('R');

    /// Letter key for `c`, case-insensitive. `None` for non-letters.
    pub fn letter(c: char) -> Option<Self> {
        c.is_ascii_alphabetic()
            .then(|| Key::Letter(c.to_ascii_uppercase()))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Letter(c) => write!(f, "Key{c}"),
            Key::ArrowUp => f.write_str("ArrowUp"),
            Key::ArrowDown => f.write_str("ArrowDown"),
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::Space => f.write_str("Space"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Escape"),
        }
    }
}

/// Error returned when a key-code string names no known key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key code {:?}", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Space" => Key::Space,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            other => {
                let mut chars = other.strip_prefix("Key").unwrap_or_default().chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::letter(c).ok_or_else(|| UnknownKey(s.to_string()))?,
                    _ => return Err(UnknownKey(s.to_string())),
                }
            },
        };
        Ok(key)
    }
}

impl TryFrom<String> for Key {
    type Error = UnknownKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// Keyboard state, updated each frame by the backend.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    pub keys_down: HashSet<Key>,
    /// Keys pressed this frame (cleared each frame).
    pub keys_just_pressed: HashSet<Key>,
    /// Keys released this frame (cleared each frame).
    pub keys_just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key down event. Only the up-to-down transition counts as a press.
    pub fn on_key_down(&mut self, key: Key) {
        if self.keys_down.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Called when a key is released.
    pub fn on_key_up(&mut self, key: Key) {
        if self.keys_down.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    /// Check if a key is currently held.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_just_released(&self, key: Key) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Clear per-frame state. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_and_up() {
        let mut input = InputState::new();
        input.on_key_down(Key::A);
        assert!(input.is_key_down(Key::A));
        assert!(input.is_key_just_pressed(Key::A));

        input.end_frame();
        assert!(input.is_key_down(Key::A));
        assert!(!input.is_key_just_pressed(Key::A));

        input.on_key_up(Key::A);
        assert!(!input.is_key_down(Key::A));
        assert!(input.is_key_just_released(Key::A));
    }

    #[test]
    fn held_key_is_not_pressed_again() {
        let mut input = InputState::new();
        input.on_key_down(Key::ArrowUp);
        input.end_frame();
        input.on_key_down(Key::ArrowUp);
        assert!(
            !input.is_key_just_pressed(Key::ArrowUp),
            "Repeat down events while held must not re-trigger a press"
        );
    }

    #[test]
    fn release_then_press_triggers_again() {
        let mut input = InputState::new();
        input.on_key_down(Key::R);
        input.end_frame();
        input.on_key_up(Key::R);
        input.on_key_down(Key::R);
        assert!(input.is_key_just_pressed(Key::R));
    }

    #[test]
    fn key_codes_parse_and_display() {
        for code in ["KeyW", "ArrowLeft", "Escape", "Space", "Enter"] {
            let key: Key = code.parse().unwrap();
            assert_eq!(key.to_string(), code);
        }
        assert_eq!("Keyw".parse::<Key>().unwrap(), Key::W);
        assert!("Key".parse::<Key>().is_err());
        assert!("KeyWW".parse::<Key>().is_err());
        assert!("Key1".parse::<Key>().is_err());
        assert!("F13".parse::<Key>().is_err());
    }

    #[test]
    fn key_serializes_as_code_string() {
        let json = serde_json::to_string(&Key::ArrowDown).unwrap();
        assert_eq!(json, "\"ArrowDown\"");
        let key: Key = serde_json::from_str("\"KeyD\"").unwrap();
        assert_eq!(key, Key::D);
        assert!(serde_json::from_str::<Key>("\"Nope\"").is_err());
    }
}
