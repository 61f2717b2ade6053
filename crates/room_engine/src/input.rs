use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    Cancel,
    Rotate,
    Pickup,
    ToggleEditMode,
}

const ACTION_COUNT: usize = 4;

impl InputAction {
    /// Default key bindings, matched against host key names.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Cancel),
            "r" | "R" => Some(Self::Rotate),
            "p" | "P" | "Delete" => Some(Self::Pickup),
            "e" | "E" => Some(Self::ToggleEditMode),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            InputAction::Cancel => 0,
            InputAction::Rotate => 1,
            InputAction::Pickup => 2,
            InputAction::ToggleEditMode => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Held-key tracking so auto-repeat does not fire an action twice.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    /// Records the new state and returns true only on the up-to-down edge.
    pub(crate) fn press_edge(&mut self, action: InputAction, is_down: bool) -> bool {
        let was_down = std::mem::replace(&mut self.down[action.index()], is_down);
        is_down && !was_down
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn clear(&mut self) {
        self.down = [false; ACTION_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_every_action() {
        assert_eq!(InputAction::from_key("Escape"), Some(InputAction::Cancel));
        assert_eq!(InputAction::from_key("R"), Some(InputAction::Rotate));
        assert_eq!(InputAction::from_key("Delete"), Some(InputAction::Pickup));
        assert_eq!(InputAction::from_key("e"), Some(InputAction::ToggleEditMode));
        assert_eq!(InputAction::from_key("F5"), None);
    }

    #[test]
    fn repeat_presses_fire_once_until_released() {
        let mut states = ActionStates::default();
        assert!(states.press_edge(InputAction::Rotate, true));
        assert!(!states.press_edge(InputAction::Rotate, true));
        assert!(states.is_down(InputAction::Rotate));
        assert!(!states.press_edge(InputAction::Rotate, false));
        assert!(states.press_edge(InputAction::Rotate, true));
        states.clear();
        assert!(!states.is_down(InputAction::Rotate));
    }
}
