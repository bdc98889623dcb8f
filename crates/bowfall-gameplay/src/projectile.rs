//! Arrows: fire scheduling, arc flight, and monster hits.
//!
//! Firing is split in two phases. [`Quiver::try_nock`] latches a request
//! when the cooldown allows it, and [`Quiver::take_due`] releases it once
//! the windup delay has passed. Only one request is ever pending, so
//! holding the fire key produces one arrow per cooldown period.
//!
//! Arrows ignore platforms. They fly under reduced gravity until they leave
//! the level or strike a monster.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Body, Facing};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{Bounded, Rect};
use crate::monster::{Monster, MonsterConfig};

/// Arrow tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowConfig {
    /// Horizontal launch speed in units per tick
    pub speed: f32,
    /// Initial vertical velocity (negative = up)
    pub launch_lift: f32,
    /// Fraction of body gravity applied to arrows
    pub gravity_scale: f32,
    /// Minimum time between fire requests in ms
    pub cooldown_ms: u64,
    /// Windup between the request and the arrow appearing in ms
    pub delay_ms: u64,
    /// Collision width
    pub width: f32,
    /// Collision height
    pub height: f32,
    /// Spawn height below the shooter's top edge
    pub spawn_offset_y: f32,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            launch_lift: -3.0,
            gravity_scale: 0.4,
            cooldown_ms: 500,
            delay_ms: 200,
            width: 15.0,
            height: 3.0,
            spawn_offset_y: 46.0,
        }
    }
}

/// A flying arrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal velocity
    pub velocity_x: f32,
    /// Vertical velocity
    pub velocity_y: f32,
    /// Collision width
    pub width: f32,
    /// Collision height
    pub height: f32,
    /// Flight direction
    pub direction: Facing,
}

impl Arrow {
    /// Spawns an arrow from the shooter's facing side at chest height.
    #[must_use]
    pub fn spawn(shooter: &Body, config: &ArrowConfig) -> Self {
        let x = match shooter.facing {
            Facing::Right => shooter.x + shooter.width,
            Facing::Left => shooter.x - config.width,
        };

        Self {
            x,
            y: shooter.y + config.spawn_offset_y,
            velocity_x: config.speed * shooter.facing.sign(),
            velocity_y: config.launch_lift,
            width: config.width,
            height: config.height,
            direction: shooter.facing,
        }
    }

    /// Advances one tick under `gravity`, already scaled for arrows.
    pub fn advance(&mut self, gravity: f32) {
        self.velocity_y += gravity;
        self.x += self.velocity_x;
        self.y += self.velocity_y;
    }

    /// Whether the arrow's origin is inside `[0, width] x [0, height]`.
    #[must_use]
    pub fn in_level(&self, width: f32, height: f32) -> bool {
        (0.0..=width).contains(&self.x) && (0.0..=height).contains(&self.y)
    }
}

impl Bounded for Arrow {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Fire-request bookkeeping for a shooter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiver {
    last_fired_at: Option<u64>,
    pending_since: Option<u64>,
}

impl Quiver {
    /// Creates an idle quiver that may fire immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches a fire request at `now` if the cooldown has elapsed and
    /// nothing is pending. Returns whether a request was latched.
    pub fn try_nock(&mut self, now: u64, config: &ArrowConfig) -> bool {
        if self.pending_since.is_some() {
            return false;
        }
        let cooled = self
            .last_fired_at
            .map_or(true, |last| now.saturating_sub(last) >= config.cooldown_ms);
        if !cooled {
            return false;
        }

        self.pending_since = Some(now);
        self.last_fired_at = Some(now);
        true
    }

    /// Clears and reports the pending request once its delay has elapsed.
    pub fn take_due(&mut self, now: u64, config: &ArrowConfig) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_sub(since) >= config.delay_ms => {
                self.pending_since = None;
                true
            },
            _ => false,
        }
    }
}

/// Moves every arrow and removes those that left the level.
pub fn update_arrows(
    arrows: &mut Vec<Arrow>,
    body_gravity: f32,
    config: &ArrowConfig,
    level_width: f32,
    level_height: f32,
) {
    let gravity = body_gravity * config.gravity_scale;
    for arrow in arrows.iter_mut() {
        arrow.advance(gravity);
    }
    arrows.retain(|arrow| arrow.in_level(level_width, level_height));
}

/// Resolves arrow-vs-monster hits.
///
/// Arrows are tested in order against live monsters in roster order. The
/// first monster hit takes one point of damage and knockback, the arrow is
/// consumed, and a monster with no health left leaves the roster at once so
/// later arrows this tick cannot hit it.
pub fn resolve_hits(
    arrows: &mut Vec<Arrow>,
    monsters: &mut Vec<Monster>,
    config: &MonsterConfig,
    events: &mut EventQueue,
) {
    let mut index = 0;
    while index < arrows.len() {
        let arrow = &arrows[index];
        let Some(target) = monsters.iter().position(|monster| arrow.overlaps(monster)) else {
            index += 1;
            continue;
        };

        let direction = arrow.direction;
        arrows.remove(index);

        let monster = &mut monsters[target];
        monster.apply_hit(direction, config);

        if monster.is_dead() {
            debug!("Monster {} killed", target);
            monsters.remove(target);
            events.push(GameEvent::MonsterKilled { index: target });
        } else {
            debug!("Monster {} hit, {} health left", target, monster.health);
            events.push(GameEvent::MonsterHit {
                index: target,
                health: monster.health,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::MonsterSpawn;

    fn monster_at(x: f32, y: f32, config: &MonsterConfig) -> Monster {
        Monster::from_spawn(
            &MonsterSpawn {
                x,
                y,
                patrol_min_x: 0.0,
                patrol_max_x: 1000.0,
            },
            config,
        )
    }

    #[test]
    fn test_spawn_on_facing_side() {
        let config = ArrowConfig::default();
        let mut shooter = Body::new(100.0, 200.0, 48.0, 56.0);

        let right = Arrow::spawn(&shooter, &config);
        assert_eq!(right.x, 148.0);
        assert_eq!(right.y, 246.0);
        assert_eq!(right.velocity_x, 8.0);
        assert_eq!(right.velocity_y, -3.0);

        shooter.facing = Facing::Left;
        let left = Arrow::spawn(&shooter, &config);
        assert_eq!(left.x, 85.0);
        assert_eq!(left.velocity_x, -8.0);
        assert_eq!(left.direction, Facing::Left);
    }

    #[test]
    fn test_arrow_arcs_under_reduced_gravity() {
        let config = ArrowConfig::default();
        let shooter = Body::new(100.0, 200.0, 48.0, 56.0);
        let mut arrows = vec![Arrow::spawn(&shooter, &config)];

        update_arrows(&mut arrows, 0.5, &config, 1000.0, 1000.0);

        assert_eq!(arrows[0].velocity_y, -2.8);
        assert_eq!(arrows[0].x, 156.0);
    }

    #[test]
    fn test_arrow_removed_outside_level() {
        let config = ArrowConfig::default();
        let mut shooter = Body::new(2.0, 200.0, 48.0, 56.0);
        shooter.facing = Facing::Left;
        let mut arrows = vec![Arrow::spawn(&shooter, &config)];

        update_arrows(&mut arrows, 0.5, &config, 1000.0, 1000.0);

        assert!(arrows.is_empty());
    }

    #[test]
    fn test_quiver_cooldown_and_single_pending() {
        let config = ArrowConfig::default();
        let mut quiver = Quiver::new();

        assert!(quiver.try_nock(1_000, &config));
        // Already pending
        assert!(!quiver.try_nock(1_050, &config));
        assert!(!quiver.take_due(1_199, &config));
        assert!(quiver.take_due(1_200, &config));
        assert!(!quiver.take_due(1_300, &config));

        // Still cooling down
        assert!(!quiver.try_nock(1_400, &config));
        assert!(quiver.try_nock(1_500, &config));
    }

    #[test]
    fn test_held_trigger_yields_one_arrow_per_request() {
        let config = ArrowConfig::default();
        let mut quiver = Quiver::new();
        let mut spawned = 0;

        // Trigger held from t=0 for 450ms at 16ms ticks
        let mut now = 0;
        while now < 450 {
            if quiver.take_due(now, &config) {
                spawned += 1;
            }
            quiver.try_nock(now, &config);
            now += 16;
        }

        assert_eq!(spawned, 1);
    }

    #[test]
    fn test_hit_damages_first_monster_and_consumes_arrow() {
        let monster_config = MonsterConfig::default();
        let mut monsters = vec![
            monster_at(200.0, 100.0, &monster_config),
            monster_at(200.0, 100.0, &monster_config),
        ];
        let mut arrows = vec![Arrow {
            x: 210.0,
            y: 110.0,
            velocity_x: 8.0,
            velocity_y: 0.0,
            width: 15.0,
            height: 3.0,
            direction: Facing::Right,
        }];
        let mut events = EventQueue::new();

        resolve_hits(&mut arrows, &mut monsters, &monster_config, &mut events);

        assert!(arrows.is_empty());
        assert_eq!(monsters[0].health, 2);
        assert_eq!(monsters[1].health, 3);
        assert_eq!(monsters[0].body.velocity_x, 8.0);
        assert_eq!(monsters[0].body.velocity_y, -3.0);
        assert_eq!(monsters[0].knockback_ticks, 15);
        assert_eq!(
            events.drain(),
            vec![GameEvent::MonsterHit { index: 0, health: 2 }]
        );
    }

    #[test]
    fn test_final_hit_removes_monster_same_tick() {
        let monster_config = MonsterConfig::default();
        let mut monster = monster_at(200.0, 100.0, &monster_config);
        monster.health = 1;
        let mut monsters = vec![monster];
        let arrow = Arrow {
            x: 210.0,
            y: 110.0,
            velocity_x: -8.0,
            velocity_y: 0.0,
            width: 15.0,
            height: 3.0,
            direction: Facing::Left,
        };
        let mut arrows = vec![arrow.clone(), arrow];
        let mut events = EventQueue::new();

        resolve_hits(&mut arrows, &mut monsters, &monster_config, &mut events);

        assert!(monsters.is_empty());
        // Second arrow had nothing left to hit
        assert_eq!(arrows.len(), 1);
        assert_eq!(events.drain(), vec![GameEvent::MonsterKilled { index: 0 }]);
    }

    #[test]
    fn test_each_arrow_hits_at_most_once() {
        let monster_config = MonsterConfig::default();
        let mut monsters = vec![monster_at(200.0, 100.0, &monster_config)];
        let arrow = Arrow {
            x: 210.0,
            y: 110.0,
            velocity_x: 8.0,
            velocity_y: 0.0,
            width: 15.0,
            height: 3.0,
            direction: Facing::Right,
        };
        let mut arrows = vec![arrow.clone(), arrow];
        let mut events = EventQueue::new();

        resolve_hits(&mut arrows, &mut monsters, &monster_config, &mut events);

        assert!(arrows.is_empty());
        assert_eq!(monsters[0].health, 1);
    }
}
