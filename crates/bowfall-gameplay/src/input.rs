//! Input state consumed by the simulation.
//!
//! The simulation never sees raw keyboard events. A collaborator maps its
//! held keys to [`Action`]s and passes the resulting [`ActionState`] to
//! [`crate::game_state::GameState::tick`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Game actions the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Run left
    MoveLeft,
    /// Run right
    MoveRight,
    /// Jump when grounded
    Jump,
    /// Drop through a one-way platform
    Drop,
    /// Fire an arrow, or restart after the run ended
    Fire,
}

/// Set of actions held during the current tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    held: HashSet<Action>,
}

impl ActionState {
    /// Creates an empty state (nothing held).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that marks an action held.
    #[must_use]
    pub fn with(mut self, action: Action) -> Self {
        self.held.insert(action);
        self
    }

    /// Whether `action` is held this tick.
    #[must_use]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Horizontal intent: -1, 0, or +1.
    ///
    /// Right is applied after left, so holding both moves right.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        let mut direction = 0.0;
        if self.is_held(Action::MoveLeft) {
            direction = -1.0;
        }
        if self.is_held(Action::MoveRight) {
            direction = 1.0;
        }
        direction
    }
}

impl FromIterator<Action> for ActionState {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

/// State of a button (pressed, just pressed, released).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the button is currently held down
    pub pressed: bool,
    /// Whether the button was just pressed this tick
    pub just_pressed: bool,
    /// Whether the button was just released this tick
    pub just_released: bool,
}

impl ButtonState {
    /// Create a new button state (not pressed).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: false,
            just_pressed: false,
            just_released: false,
        }
    }

    /// Update the button state based on whether it's currently pressed.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }
}
