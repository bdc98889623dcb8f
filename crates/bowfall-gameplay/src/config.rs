//! Aggregate tuning for a simulation.

use serde::{Deserialize, Serialize};

use crate::camera::CameraConfig;
use crate::monster::MonsterConfig;
use crate::physics::BodyPhysics;
use crate::player::PlayerConfig;
use crate::projectile::ArrowConfig;

/// Every tuning value the simulation reads, grouped by system.
///
/// Missing sections deserialize to their defaults, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Gravity and platform resolution
    pub physics: BodyPhysics,
    /// Player movement, health and animation
    pub player: PlayerConfig,
    /// Monster AI
    pub monster: MonsterConfig,
    /// Arrow flight and fire timing
    pub arrow: ArrowConfig,
    /// Viewport size
    pub camera: CameraConfig,
}
