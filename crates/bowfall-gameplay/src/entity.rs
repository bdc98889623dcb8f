//! Shared body shape for the player and monsters.

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounded, Rect};

/// Horizontal facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward negative X
    Left,
    /// Facing toward positive X (default)
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Facing that matches the sign of `dx`; zero keeps `self`.
    #[must_use]
    pub fn toward(self, dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }
}

/// A moving collision box.
///
/// `(x, y)` is the top-left of the collision box, which is smaller than
/// whatever sprite the renderer draws around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Collision width
    pub width: f32,
    /// Collision height
    pub height: f32,
    /// Horizontal velocity in units per tick
    pub velocity_x: f32,
    /// Vertical velocity in units per tick (positive = down)
    pub velocity_y: f32,
    /// Resting on a platform or the level floor
    pub on_ground: bool,
    /// Which way the body faces
    pub facing: Facing,
}

impl Body {
    /// Creates a body at rest, facing right.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            velocity_x: 0.0,
            velocity_y: 0.0,
            on_ground: false,
            facing: Facing::Right,
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Moves the body and stops it.
    pub fn teleport(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
    }
}

impl Bounded for Body {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
