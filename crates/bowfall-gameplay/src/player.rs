//! Player controller.
//!
//! This module handles:
//! - Run, jump and drop-through from the held action set
//! - Fire requests through the player's [`Quiver`]
//! - Damage, invincibility and potion pickups
//! - Exit, end point and message zone checks
//! - The sprite animation state machine

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SimulationConfig;
use crate::entity::Body;
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{Bounded, Rect};
use crate::input::{Action, ActionState};
use crate::level::{Exit, Level};
use crate::projectile::Quiver;

/// Frame counts of each sprite strip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationFrames {
    /// Idle loop
    pub idle: u32,
    /// Run cycle
    pub running: u32,
    /// Jump strip, looped while airborne
    pub jumping: u32,
    /// Landing strip, also played backwards for standing
    pub landing: u32,
    /// Shooting strip
    pub shooting: u32,
    /// Standing hold
    pub standing: u32,
}

impl Default for AnimationFrames {
    fn default() -> Self {
        Self {
            idle: 4,
            running: 8,
            jumping: 6,
            landing: 9,
            shooting: 12,
            standing: 1,
        }
    }
}

/// Player tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collision width
    pub width: f32,
    /// Collision height
    pub height: f32,
    /// Horizontal speed in units per tick
    pub move_speed: f32,
    /// Jump velocity (negative = up)
    pub jump_velocity: f32,
    /// Health cap for potions
    pub max_health: u32,
    /// Health after a load or restart
    pub start_health: u32,
    /// Invincibility after a hit, in ms
    pub invincibility_ms: u64,
    /// Blink half-period while invincible, in ms
    pub blink_interval_ms: u64,
    /// Minimum time between animation frames, in ms
    pub frame_ms: u64,
    /// How long the shooting pose is held, in ms
    pub shooting_duration_ms: u64,
    /// Fraction of a spike's width that hurts, centered
    pub spike_hitbox_fraction: f32,
    /// Sprite strip lengths
    pub frames: AnimationFrames,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 48.0,
            height: 56.0,
            move_speed: 5.0,
            jump_velocity: -12.0,
            max_health: 5,
            start_health: 3,
            invincibility_ms: 1000,
            blink_interval_ms: 100,
            frame_ms: 80,
            shooting_duration_ms: 400,
            spike_hitbox_fraction: 0.5,
            frames: AnimationFrames::default(),
        }
    }
}

/// Sprite animation selected for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    /// Before the first grounded tick
    #[default]
    Idle,
    /// Moving on the ground
    Running,
    /// Airborne
    Jumping,
    /// One-shot touchdown
    Landing,
    /// At rest
    Standing,
    /// Bow drawn
    Shooting,
}

impl AnimationState {
    /// Number of frames in this state's strip.
    #[must_use]
    pub fn frame_count(self, frames: &AnimationFrames) -> u32 {
        let count = match self {
            Self::Idle => frames.idle,
            Self::Running => frames.running,
            Self::Jumping => frames.jumping,
            Self::Landing => frames.landing,
            Self::Standing => frames.standing,
            Self::Shooting => frames.shooting,
        };
        count.max(1)
    }
}

/// Result of a damage attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible or already dead
    Ignored,
    /// Lost a point and became invincible
    Hurt,
    /// Lost the last point
    Died,
}

/// What the player ran into this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerReport {
    /// Health dropped to zero
    pub died: bool,
    /// First exit touched; the player has already been moved to its spawn
    pub exit: Option<Exit>,
    /// Touched the end point
    pub reached_end: bool,
    /// Index of the first overlapping message block
    pub message_block: Option<usize>,
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Collision body
    pub body: Body,
    /// Current health
    pub health: u32,
    /// Ignoring damage
    pub invincible: bool,
    /// When invincibility started
    pub invincible_since: u64,
    /// Platform stood on after the last physics step, by level index
    pub current_platform: Option<usize>,
    /// Selected animation
    pub animation_state: AnimationState,
    /// Frame within the animation
    pub animation_frame: u32,
    /// When the frame last changed
    pub animation_timer: u64,
    /// When the last fire request was accepted
    pub shooting_started_at: Option<u64>,
    /// Airborne at the end of the previous tick
    pub was_airborne: bool,
    /// Fire request state
    pub quiver: Quiver,
}

impl Player {
    /// Creates a player at `(x, y)` with starting health.
    #[must_use]
    pub fn new(x: f32, y: f32, config: &PlayerConfig) -> Self {
        Self {
            body: Body::new(x, y, config.width, config.height),
            health: config.start_health,
            invincible: false,
            invincible_since: 0,
            current_platform: None,
            animation_state: AnimationState::Idle,
            animation_frame: 0,
            animation_timer: 0,
            shooting_started_at: None,
            was_airborne: false,
            quiver: Quiver::new(),
        }
    }

    /// Puts the player back to a fresh state at `(x, y)`.
    pub fn reset_to(&mut self, x: f32, y: f32, config: &PlayerConfig) {
        *self = Self::new(x, y, config);
    }

    /// Moves the player into a newly installed level, keeping health and
    /// invincibility.
    pub fn place_at(&mut self, x: f32, y: f32) {
        self.body.teleport(x, y);
        self.body.on_ground = false;
        self.current_platform = None;
    }

    /// Takes one point of damage unless invincible or already dead.
    pub fn damage(&mut self, now: u64, events: &mut EventQueue) -> DamageOutcome {
        if self.invincible || self.health == 0 {
            return DamageOutcome::Ignored;
        }

        self.health -= 1;
        if self.health == 0 {
            debug!("Player died");
            events.push(GameEvent::PlayerDied);
            DamageOutcome::Died
        } else {
            self.invincible = true;
            self.invincible_since = now;
            debug!("Player damaged, {} health left", self.health);
            events.push(GameEvent::PlayerDamaged {
                health: self.health,
            });
            DamageOutcome::Hurt
        }
    }

    /// Runs one tick of player logic against `level`.
    ///
    /// Potions picked up are marked collected in `level`. Exits end the
    /// update early: the end point and message zones of the old level are
    /// not checked once the player has been sent elsewhere.
    pub fn update(
        &mut self,
        input: &ActionState,
        now: u64,
        level: &mut Level,
        config: &SimulationConfig,
        events: &mut EventQueue,
    ) -> PlayerReport {
        let tuning = &config.player;
        let mut report = PlayerReport::default();

        if self.invincible && now.saturating_sub(self.invincible_since) > tuning.invincibility_ms {
            self.invincible = false;
        }

        if input.is_held(Action::Fire) && self.quiver.try_nock(now, &config.arrow) {
            self.shooting_started_at = Some(now);
        }

        let direction = input.horizontal();
        self.body.velocity_x = direction * tuning.move_speed;
        self.body.facing = self.body.facing.toward(direction);

        if input.is_held(Action::Drop) {
            config
                .physics
                .drop_through(&mut self.body, &mut self.current_platform, &level.platforms);
        }

        if input.is_held(Action::Jump) && self.body.on_ground {
            self.body.velocity_y = tuning.jump_velocity;
            self.body.on_ground = false;
        }

        self.current_platform = config.physics.step(&mut self.body, level);

        for spike in &level.spikes {
            if self.body.overlaps(&spike.narrowed(tuning.spike_hitbox_fraction))
                && self.damage(now, events) == DamageOutcome::Died
            {
                report.died = true;
            }
        }

        self.collect_potions(level, tuning.max_health, events);

        if let Some(exit) = level.exits.iter().find(|exit| self.body.overlaps(*exit)) {
            debug!("Player reached exit to level {}", exit.to_level);
            self.body.teleport(exit.spawn_x, exit.spawn_y);
            events.push(GameEvent::LevelExit {
                to_level: exit.to_level,
            });
            report.exit = Some(exit.clone());
            return report;
        }

        report.reached_end = level
            .end_point
            .is_some_and(|end| self.body.overlaps(&end));

        report.message_block = level
            .message_blocks
            .iter()
            .position(|block| self.body.overlaps(block));

        self.animate(now, tuning);

        report
    }

    fn collect_potions(&mut self, level: &mut Level, max_health: u32, events: &mut EventQueue) {
        for (index, potion) in level.health_potions.iter_mut().enumerate() {
            if potion.collected || !self.body.overlaps(&potion.bounds) {
                continue;
            }
            if self.health > 0 && self.health < max_health {
                potion.collected = true;
                self.health += 1;
                debug!("Potion {} collected, health now {}", index, self.health);
                events.push(GameEvent::PotionCollected {
                    index,
                    health: self.health,
                });
            }
        }
    }

    /// Picks the animation for this tick and advances its frame.
    fn animate(&mut self, now: u64, config: &PlayerConfig) {
        let just_landed = self.was_airborne && self.body.on_ground;
        self.was_airborne = !self.body.on_ground;

        let shooting = self
            .shooting_started_at
            .is_some_and(|started| now.saturating_sub(started) < config.shooting_duration_ms);

        let next = if shooting {
            AnimationState::Shooting
        } else if !self.body.on_ground {
            AnimationState::Jumping
        } else if self.body.velocity_x != 0.0 {
            AnimationState::Running
        } else if just_landed && self.animation_state != AnimationState::Landing {
            AnimationState::Landing
        } else if self.animation_state == AnimationState::Landing {
            let last = AnimationState::Landing.frame_count(&config.frames) - 1;
            if self.animation_frame >= last {
                AnimationState::Standing
            } else {
                AnimationState::Landing
            }
        } else {
            AnimationState::Standing
        };

        if next != self.animation_state {
            self.animation_state = next;
            self.animation_frame = 0;
            self.animation_timer = now;
        }

        if now.saturating_sub(self.animation_timer) > config.frame_ms {
            self.animation_timer = now;
            let count = self.animation_state.frame_count(&config.frames);
            self.animation_frame = (self.animation_frame + 1) % count;
        }
    }

    /// Sprite column to draw. Standing plays the landing strip backwards.
    #[must_use]
    pub fn sprite_frame(&self, config: &PlayerConfig) -> u32 {
        match self.animation_state {
            AnimationState::Standing => {
                let landing = AnimationState::Landing.frame_count(&config.frames);
                landing - 1 - (self.animation_frame % landing)
            },
            _ => self.animation_frame,
        }
    }

    /// Whether the renderer should skip drawing this frame.
    #[must_use]
    pub fn is_blinking(&self, now: u64, config: &PlayerConfig) -> bool {
        self.invincible && (now / config.blink_interval_ms.max(1)) % 2 == 0
    }

    /// Collision box in world space.
    #[must_use]
    pub fn hitbox(&self) -> Rect {
        self.body.bounds()
    }
}
