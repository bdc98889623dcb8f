//! Monster AI.
//!
//! Each tick a monster is in exactly one of three modes, checked in order:
//!
//! - **Knockback**: counting down after an arrow hit, sliding under friction
//! - **Chasing**: the player is within detection range
//! - **Patrolling**: walking between its patrol limits
//!
//! Movement then goes through the same [`BodyPhysics`] step as the player.

use serde::{Deserialize, Serialize};

use crate::entity::{Body, Facing};
use crate::geometry::{Bounded, Rect};
use crate::level::{Level, MonsterSpawn};
use crate::physics::BodyPhysics;

/// Monster tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Collision width
    pub width: f32,
    /// Collision height
    pub height: f32,
    /// Walking speed in units per tick
    pub speed: f32,
    /// Jump velocity (negative = up)
    pub jump_velocity: f32,
    /// Distance at which a monster starts chasing
    pub detection_range: f32,
    /// Horizontal gap inside which a chasing monster stands still
    pub chase_deadband: f32,
    /// How far above the monster the player must be to trigger a jump
    pub jump_trigger_height: f32,
    /// Horizontal knockback speed from an arrow hit
    pub knockback_speed: f32,
    /// Vertical velocity from an arrow hit (negative = up)
    pub knockback_lift: f32,
    /// Ticks of suspended AI after a hit
    pub knockback_ticks: u32,
    /// Horizontal velocity multiplier per knockback tick
    pub knockback_friction: f32,
    /// Starting and maximum health
    pub max_health: u32,
    /// Ticks between animation frames
    pub animation_ticks: u32,
    /// Frames in the walk cycle
    pub animation_frames: u32,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 40.0,
            speed: 2.0,
            jump_velocity: -10.0,
            detection_range: 600.0,
            chase_deadband: 10.0,
            jump_trigger_height: 50.0,
            knockback_speed: 8.0,
            knockback_lift: -3.0,
            knockback_ticks: 15,
            knockback_friction: 0.8,
            max_health: 3,
            animation_ticks: 10,
            animation_frames: 4,
        }
    }
}

/// A live monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    /// Collision body
    pub body: Body,
    /// Remaining health
    pub health: u32,
    /// Left patrol limit
    pub patrol_min_x: f32,
    /// Right patrol limit
    pub patrol_max_x: f32,
    /// Current patrol heading
    pub patrol_direction: Facing,
    /// Whether the player was in range last update
    pub is_chasing: bool,
    /// Ticks of knockback left
    pub knockback_ticks: u32,
    /// Walk cycle frame
    pub anim_frame: u32,
    /// Ticks since the last frame change
    pub anim_timer: u32,
}

impl Monster {
    /// Creates a monster at full health from a level spawn entry.
    #[must_use]
    pub fn from_spawn(spawn: &MonsterSpawn, config: &MonsterConfig) -> Self {
        Self {
            body: Body::new(spawn.x, spawn.y, config.width, config.height),
            health: config.max_health,
            patrol_min_x: spawn.patrol_min_x,
            patrol_max_x: spawn.patrol_max_x,
            patrol_direction: Facing::Right,
            is_chasing: false,
            knockback_ticks: 0,
            anim_frame: 0,
            anim_timer: 0,
        }
    }

    /// Builds the roster for a freshly loaded level.
    #[must_use]
    pub fn spawn_all(level: &Level, config: &MonsterConfig) -> Vec<Self> {
        level
            .monsters
            .iter()
            .map(|spawn| Self::from_spawn(spawn, config))
            .collect()
    }

    /// Runs AI, physics and animation for one tick.
    ///
    /// Returns whether the monster overlaps `player` afterwards; the caller
    /// decides what contact damage means.
    pub fn update(
        &mut self,
        player: &Body,
        level: &Level,
        physics: &BodyPhysics,
        config: &MonsterConfig,
    ) -> bool {
        if self.knockback_ticks > 0 {
            self.knockback_ticks -= 1;
            self.body.velocity_x *= config.knockback_friction;
        } else {
            let dx = player.x - self.body.x;
            let dy = player.y - self.body.y;

            if dx.hypot(dy) < config.detection_range {
                self.is_chasing = true;
                self.chase(dx, dy, config);
            } else {
                self.is_chasing = false;
                self.patrol(config);
            }
        }

        physics.step(&mut self.body, level);

        self.anim_timer += 1;
        if self.anim_timer > config.animation_ticks {
            self.anim_timer = 0;
            self.anim_frame = (self.anim_frame + 1) % config.animation_frames.max(1);
        }

        self.body.overlaps(player)
    }

    fn chase(&mut self, dx: f32, dy: f32, config: &MonsterConfig) {
        if dx > config.chase_deadband {
            self.body.velocity_x = config.speed;
            self.body.facing = Facing::Right;
        } else if dx < -config.chase_deadband {
            self.body.velocity_x = -config.speed;
            self.body.facing = Facing::Left;
        } else {
            self.body.velocity_x = 0.0;
        }

        if dy < -config.jump_trigger_height && self.body.on_ground {
            self.body.velocity_y = config.jump_velocity;
            self.body.on_ground = false;
        }
    }

    /// Velocity follows the current heading; the heading flips afterwards
    /// when a patrol limit has been reached.
    fn patrol(&mut self, config: &MonsterConfig) {
        self.body.velocity_x = config.speed * self.patrol_direction.sign();
        self.body.facing = self.patrol_direction;

        if self.body.x <= self.patrol_min_x {
            self.patrol_direction = Facing::Right;
        } else if self.body.x + self.body.width >= self.patrol_max_x {
            self.patrol_direction = Facing::Left;
        }
    }

    /// Applies one arrow hit travelling in `direction`.
    pub fn apply_hit(&mut self, direction: Facing, config: &MonsterConfig) {
        self.health = self.health.saturating_sub(1);
        self.body.velocity_x = direction.sign() * config.knockback_speed;
        self.body.velocity_y = config.knockback_lift;
        self.knockback_ticks = config.knockback_ticks;
    }

    /// Whether the monster should leave the roster.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Health as a fraction of the maximum, for health bars.
    #[must_use]
    pub fn health_fraction(&self, config: &MonsterConfig) -> f32 {
        if config.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / config.max_health as f32
    }
}

impl Bounded for Monster {
    fn bounds(&self) -> Rect {
        self.body.bounds()
    }
}
