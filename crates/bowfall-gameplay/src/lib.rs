//! # Bowfall Gameplay
//!
//! Simulation core for the Bowfall platformer.
//!
//! This crate provides the per-tick simulation with no rendering or I/O:
//! - AABB geometry and the level schema
//! - Body physics with solid and one-way platforms
//! - Player controller with animation state machine
//! - Monster patrol, chase and knockback AI
//! - Arrow scheduling, flight and hits
//! - Deadzone camera
//! - Game state with pending level loads
//! - Event queue for drivers and presentation layers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod camera;
pub mod clock;
pub mod config;
pub mod entity;
pub mod events;
pub mod game_state;
pub mod geometry;
pub mod input;
pub mod level;
pub mod monster;
pub mod physics;
pub mod player;
pub mod projectile;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::*;
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::entity::*;
    pub use crate::events::*;
    pub use crate::game_state::*;
    pub use crate::geometry::*;
    pub use crate::input::*;
    pub use crate::level::*;
    pub use crate::monster::*;
    pub use crate::physics::*;
    pub use crate::player::*;
    pub use crate::projectile::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falling_player_comes_to_rest() {
        let mut level = Level::empty(1000.0, 1000.0, Point { x: 100.0, y: 100.0 });
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, 200.0, 400.0, 20.0), true));
        let config = SimulationConfig::default();
        let mut player = Player::new(100.0, 100.0, &config.player);
        let mut events = EventQueue::new();

        let clock = ManualClock::new(0);
        for _ in 0..60 {
            clock.advance(16);
            player.update(&ActionState::new(), clock.now_ms(), &mut level, &config, &mut events);
        }

        assert!(player.body.on_ground);
        assert_eq!(player.body.y, 200.0 - player.body.height);
        assert_eq!(player.current_platform, Some(0));
    }

    #[test]
    fn test_full_session_round_trip() {
        let json = r#"{
            "width": 1200, "height": 800,
            "playerStart": { "x": 50, "y": 700 },
            "platforms": [ { "x": 0, "y": 780, "width": 1200, "height": 20, "solid": true } ],
            "spikes": [],
            "healthPotions": [],
            "endPoint": { "x": 400, "y": 700, "width": 40, "height": 80 }
        }"#;
        let level = Level::from_json(1, json).expect("level parses");
        let source = StaticLevelSource::new().with_level(1, level);
        let mut state = GameState::new(1, SimulationConfig::default());
        state.service_pending_load(&source);

        let run = ActionState::new().with(Action::MoveRight);
        let mut now = 0;
        while !state.is_level_complete() {
            now += 16;
            assert_eq!(state.tick(&run, now), TickStatus::Running);
            assert!(now < 5_000, "player never reached the end point");
        }

        assert!(state.player().body.x > 300.0);
    }
}
