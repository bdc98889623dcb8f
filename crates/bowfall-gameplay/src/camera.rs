//! Viewport camera with deadzone follow.
//!
//! The camera position is derived state: it is recomputed from the player
//! and the level bounds every tick and never persisted.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Camera viewport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Viewport width in world units
    pub viewport_width: f32,
    /// Viewport height in world units
    pub viewport_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

/// Top-left of the viewport in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Viewport left edge
    pub x: f32,
    /// Viewport top edge
    pub y: f32,
    viewport_width: f32,
    viewport_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

impl Camera {
    /// Creates a camera at the world origin.
    #[must_use]
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
        }
    }

    /// Moves the camera just enough to keep `target` inside the middle third
    /// of the viewport, then clamps to the level.
    ///
    /// A target that leaves the deadzone ends up on its edge, not centered.
    pub fn follow(&mut self, target: &Rect, level_width: f32, level_height: f32) {
        let zone_left = self.viewport_width / 3.0;
        let zone_right = self.viewport_width * 2.0 / 3.0;
        let zone_top = self.viewport_height / 3.0;
        let zone_bottom = self.viewport_height * 2.0 / 3.0;

        let screen_x = target.x - self.x;
        let screen_y = target.y - self.y;

        if screen_x < zone_left {
            self.x = target.x - zone_left;
        } else if screen_x + target.width > zone_right {
            self.x = target.right() - zone_right;
        }

        if screen_y < zone_top {
            self.y = target.y - zone_top;
        } else if screen_y + target.height > zone_bottom {
            self.y = target.bottom() - zone_bottom;
        }

        self.clamp(level_width, level_height);
    }

    /// Centers the viewport on a world point, then clamps to the level.
    pub fn center_on(&mut self, x: f32, y: f32, level_width: f32, level_height: f32) {
        self.x = x - self.viewport_width / 2.0;
        self.y = y - self.viewport_height / 2.0;
        self.clamp(level_width, level_height);
    }

    /// Keeps the viewport inside the level. When the level is smaller than
    /// the viewport the camera pins to the origin.
    fn clamp(&mut self, level_width: f32, level_height: f32) {
        self.x = self.x.min(level_width - self.viewport_width).max(0.0);
        self.y = self.y.min(level_height - self.viewport_height).max(0.0);
    }
}
