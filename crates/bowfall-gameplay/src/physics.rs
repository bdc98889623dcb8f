//! Body physics: gravity, integration, and platform collision resolution.
//!
//! One call to [`BodyPhysics::step`] advances a body by a single tick:
//!
//! 1. gravity is added to the vertical velocity
//! 2. position is integrated by the velocity
//! 3. X is clamped to the level width
//! 4. every platform is tested in level-array order
//! 5. the level floor acts as an implicit solid platform
//!
//! Collision sides are disambiguated from the pre-move edges, reconstructed
//! as `current - velocity`. That approximation is not sub-tick accurate for
//! fast bodies at platform corners, and the movement tuning depends on it.

use serde::{Deserialize, Serialize};

use crate::entity::Body;
use crate::geometry::Bounded;
use crate::level::{Level, Platform};

/// Which side of a platform a body was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Landed on top
    Top,
    /// Bumped its head on the underside
    Bottom,
    /// Pushed out to the platform's left
    Left,
    /// Pushed out to the platform's right
    Right,
}

/// Physics tuning shared by every body kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyPhysics {
    /// Gravity added to vertical velocity each tick (positive = down)
    pub gravity: f32,
    /// How far below a one-way platform's top the previous feet may be and still land
    pub one_way_tolerance: f32,
    /// How far a drop-through pushes the body down
    pub drop_through_distance: f32,
}

impl Default for BodyPhysics {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            one_way_tolerance: 5.0,
            drop_through_distance: 10.0,
        }
    }
}

impl BodyPhysics {
    /// Creates the default physics configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances `body` by one tick and resolves it against `level`.
    ///
    /// Returns the index of the platform the body ended up standing on, if any.
    /// Only the first top contact in array order is reported; landing on the
    /// level floor reports `None`.
    pub fn step(&self, body: &mut Body, level: &Level) -> Option<usize> {
        body.velocity_y += self.gravity;

        body.x += body.velocity_x;
        body.y += body.velocity_y;

        Self::clamp_horizontal(body, level.width);
        let resting = self.resolve_platforms(body, &level.platforms);
        Self::clamp_floor(body, level.height);

        resting
    }

    /// Keeps the body within `[0, level_width - body.width]`.
    pub fn clamp_horizontal(body: &mut Body, level_width: f32) {
        if body.x < 0.0 {
            body.x = 0.0;
        }
        if body.x + body.width > level_width {
            body.x = level_width - body.width;
        }
    }

    /// Treats the bottom of the level as solid ground.
    pub fn clamp_floor(body: &mut Body, level_height: f32) {
        if body.y + body.height > level_height {
            body.y = level_height - body.height;
            body.velocity_y = 0.0;
            body.on_ground = true;
        }
    }

    /// Resolves overlap with each platform in order.
    ///
    /// Clears `on_ground` first; it is set again by any top contact.
    pub fn resolve_platforms(&self, body: &mut Body, platforms: &[Platform]) -> Option<usize> {
        body.on_ground = false;
        let mut resting = None;

        for (index, platform) in platforms.iter().enumerate() {
            if !body.overlaps(platform) {
                continue;
            }

            let contact = if platform.solid {
                Self::resolve_solid(body, platform)
            } else {
                self.resolve_one_way(body, platform)
            };

            if contact == Some(Contact::Top) && resting.is_none() {
                resting = Some(index);
            }
        }

        resting
    }

    /// Solid platform: landing beats head-bump, which beats side pushes.
    fn resolve_solid(body: &mut Body, platform: &Platform) -> Option<Contact> {
        let rect = platform.bounds;
        let prev_bottom = body.y + body.height - body.velocity_y;
        let prev_top = body.y - body.velocity_y;
        let prev_right = body.x + body.width - body.velocity_x;
        let prev_left = body.x - body.velocity_x;

        if body.velocity_y > 0.0 && prev_bottom <= rect.y {
            body.y = rect.y - body.height;
            body.velocity_y = 0.0;
            body.on_ground = true;
            Some(Contact::Top)
        } else if body.velocity_y < 0.0 && prev_top >= rect.bottom() {
            body.y = rect.bottom();
            body.velocity_y = 0.0;
            Some(Contact::Bottom)
        } else if body.velocity_x < 0.0 && prev_left >= rect.right() {
            body.x = rect.right();
            body.velocity_x = 0.0;
            Some(Contact::Right)
        } else if body.velocity_x > 0.0 && prev_right <= rect.x {
            body.x = rect.x - body.width;
            body.velocity_x = 0.0;
            Some(Contact::Left)
        } else {
            None
        }
    }

    /// One-way platform: only a falling body whose feet were at or above the top lands.
    fn resolve_one_way(&self, body: &mut Body, platform: &Platform) -> Option<Contact> {
        let rect = platform.bounds;
        let prev_bottom = body.y + body.height - body.velocity_y;

        if body.velocity_y > 0.0 && prev_bottom <= rect.y + self.one_way_tolerance {
            body.y = rect.y - body.height;
            body.velocity_y = 0.0;
            body.on_ground = true;
            Some(Contact::Top)
        } else {
            None
        }
    }

    /// Pushes a grounded body down through the platform it stands on.
    ///
    /// Only permitted when the body is grounded, `standing_on` names a
    /// platform, and that platform is one-way. On success the body's feet
    /// move down by [`BodyPhysics::drop_through_distance`], `on_ground` is
    /// cleared, and `standing_on` is reset. Returns whether the drop happened.
    pub fn drop_through(
        &self,
        body: &mut Body,
        standing_on: &mut Option<usize>,
        platforms: &[Platform],
    ) -> bool {
        let one_way = standing_on
            .and_then(|index| platforms.get(index))
            .is_some_and(|platform| !platform.solid);

        if !(body.on_ground && one_way) {
            return false;
        }

        body.y += self.drop_through_distance;
        body.on_ground = false;
        *standing_on = None;
        true
    }
}
