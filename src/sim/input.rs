//! Discrete player input
//!
//! Platform layers translate key codes into [`InputEvent`]s through a
//! [`KeyMapping`]; the session applies them between frames, never mid-step.

use serde::{Deserialize, Serialize};

/// A single player action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// Move one lane toward lane 0
    LaneLeft,
    /// Move one lane toward the last lane
    LaneRight,
    Jump,
    Duck,
    /// "Play again" after a run ends
    ResetRequested,
}

/// How arrow/WASD keys map onto lane directions.
///
/// One build of the game shipped with left and right swapped. It is kept as an
/// explicit policy instead of being folded into `Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyMapping {
    #[default]
    Standard,
    /// ArrowLeft/KeyA move right, ArrowRight/KeyD move left
    Mirrored,
}

impl KeyMapping {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMapping::Standard => "standard",
            KeyMapping::Mirrored => "mirrored",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "normal" => Some(KeyMapping::Standard),
            "mirrored" | "inverted" => Some(KeyMapping::Mirrored),
            _ => None,
        }
    }

    /// Translate a DOM-style key code (`"ArrowLeft"`, `"KeyA"`, `"Space"`, ...)
    pub fn map_key(&self, code: &str) -> Option<InputEvent> {
        let event = match code {
            "ArrowLeft" | "KeyA" => InputEvent::LaneLeft,
            "ArrowRight" | "KeyD" => InputEvent::LaneRight,
            "Space" => InputEvent::Jump,
            "ArrowDown" | "KeyS" => InputEvent::Duck,
            "Enter" => InputEvent::ResetRequested,
            _ => return None,
        };

        Some(match (self, event) {
            (KeyMapping::Mirrored, InputEvent::LaneLeft) => InputEvent::LaneRight,
            (KeyMapping::Mirrored, InputEvent::LaneRight) => InputEvent::LaneLeft,
            _ => event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_mapping() {
        let map = KeyMapping::Standard;
        assert_eq!(map.map_key("ArrowLeft"), Some(InputEvent::LaneLeft));
        assert_eq!(map.map_key("KeyD"), Some(InputEvent::LaneRight));
        assert_eq!(map.map_key("Space"), Some(InputEvent::Jump));
        assert_eq!(map.map_key("KeyS"), Some(InputEvent::Duck));
        assert_eq!(map.map_key("Enter"), Some(InputEvent::ResetRequested));
        assert_eq!(map.map_key("KeyQ"), None);
    }

    #[test]
    fn test_mirrored_mapping_swaps_lanes_only() {
        let map = KeyMapping::Mirrored;
        assert_eq!(map.map_key("ArrowLeft"), Some(InputEvent::LaneRight));
        assert_eq!(map.map_key("KeyA"), Some(InputEvent::LaneRight));
        assert_eq!(map.map_key("ArrowRight"), Some(InputEvent::LaneLeft));
        assert_eq!(map.map_key("Space"), Some(InputEvent::Jump));
        assert_eq!(map.map_key("ArrowDown"), Some(InputEvent::Duck));
    }

    #[test]
    fn test_mapping_names() {
        assert_eq!(KeyMapping::from_str("Mirrored"), Some(KeyMapping::Mirrored));
        assert_eq!(KeyMapping::from_str("standard"), Some(KeyMapping::Standard));
        assert_eq!(KeyMapping::from_str("sideways"), None);
        assert_eq!(KeyMapping::Mirrored.as_str(), "mirrored");
    }
}
