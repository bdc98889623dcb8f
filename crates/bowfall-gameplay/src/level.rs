//! Level schema, load-time validation, and the level source seam.
//!
//! Levels arrive as JSON records with camelCase field names. Required fields
//! are enforced by serde; structural rules (positive world size, sane
//! rectangles, ordered patrol ranges) are checked by [`Level::validate`].
//! Array order inside a level is significant: the first matching platform,
//! exit, or message block wins, so it is preserved exactly as loaded.

use std::collections::HashMap;

use bowfall_common::{LevelLoadError, LevelLoadResult, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::geometry::{Bounded, Rect};

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

/// Static level geometry the bodies collide with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Collision box
    #[serde(flatten)]
    pub bounds: Rect,
    /// Solid platforms block from all sides; others are one-way from above
    pub solid: bool,
    /// Render color, opaque to the simulation
    #[serde(default)]
    pub color: String,
}

impl Platform {
    /// Creates a platform without a color.
    #[must_use]
    pub fn new(bounds: Rect, solid: bool) -> Self {
        Self {
            bounds,
            solid,
            color: String::new(),
        }
    }
}

impl Bounded for Platform {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A health pickup. Consumed at most once per level load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthPotion {
    /// Pickup box
    #[serde(flatten)]
    pub bounds: Rect,
    /// Set once the player has picked it up
    #[serde(default)]
    pub collected: bool,
}

impl Bounded for HealthPotion {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A zone that moves the player into another level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exit {
    /// Trigger box
    #[serde(flatten)]
    pub bounds: Rect,
    /// Destination level number
    pub to_level: u32,
    /// Player X in the destination level
    pub spawn_x: f32,
    /// Player Y in the destination level
    pub spawn_y: f32,
}

impl Bounded for Exit {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Where a monster appears and the horizontal range it patrols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterSpawn {
    /// Initial X
    pub x: f32,
    /// Initial Y
    pub y: f32,
    /// Left patrol limit
    pub patrol_min_x: f32,
    /// Right patrol limit
    pub patrol_max_x: f32,
}

/// A region that shows a message while the player stands in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBlock {
    /// Trigger box
    #[serde(flatten)]
    pub bounds: Rect,
    /// Text shown to the player
    pub message: String,
}

impl Bounded for MessageBlock {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A complete level record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Schema version the level was authored against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<SchemaVersion>,
    /// World width in pixels
    pub width: f32,
    /// World height in pixels
    pub height: f32,
    /// Player spawn (top-left of the collision box)
    pub player_start: Point,
    /// Platforms, in tie-break order
    pub platforms: Vec<Platform>,
    /// Damaging regions
    pub spikes: Vec<Rect>,
    /// Health pickups
    pub health_potions: Vec<HealthPotion>,
    /// Level exits, first match wins
    #[serde(default)]
    pub exits: Vec<Exit>,
    /// Reaching this completes the level
    #[serde(default)]
    pub end_point: Option<Rect>,
    /// Monster spawn list
    #[serde(default)]
    pub monsters: Vec<MonsterSpawn>,
    /// Message regions, first match wins
    #[serde(default)]
    pub message_blocks: Vec<MessageBlock>,
}

impl Level {
    /// Creates an empty level of the given size with the player at `start`.
    #[must_use]
    pub fn empty(width: f32, height: f32, start: Point) -> Self {
        Self {
            format_version: None,
            width,
            height,
            player_start: start,
            platforms: Vec::new(),
            spikes: Vec::new(),
            health_potions: Vec::new(),
            exits: Vec::new(),
            end_point: None,
            monsters: Vec::new(),
            message_blocks: Vec::new(),
        }
    }

    /// Parses and validates a level from JSON text.
    pub fn from_json(level: u32, json: &str) -> LevelLoadResult<Self> {
        let parsed: Self = serde_json::from_str(json)
            .map_err(|source| LevelLoadError::Parse { level, source })?;
        parsed.validate(level)?;
        Ok(parsed)
    }

    /// Checks the structural rules serde cannot express.
    pub fn validate(&self, level: u32) -> LevelLoadResult<()> {
        if let Some(found) = self.format_version {
            let expected = SchemaVersion::LEVEL_FORMAT;
            if !expected.is_compatible_with(&found) {
                return Err(LevelLoadError::UnsupportedVersion {
                    level,
                    found,
                    expected,
                });
            }
        }

        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(LevelLoadError::invalid(level, "width must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(LevelLoadError::invalid(level, "height must be positive"));
        }

        let start = self.player_start;
        if !(0.0..=self.width).contains(&start.x) || !(0.0..=self.height).contains(&start.y) {
            return Err(LevelLoadError::invalid(
                level,
                format!(
                    "player start ({}, {}) lies outside the level",
                    start.x, start.y
                ),
            ));
        }

        let rects = self
            .platforms
            .iter()
            .map(|p| ("platform", p.bounds))
            .chain(self.spikes.iter().map(|s| ("spike", *s)))
            .chain(self.health_potions.iter().map(|p| ("health potion", p.bounds)))
            .chain(self.exits.iter().map(|e| ("exit", e.bounds)))
            .chain(self.end_point.iter().map(|e| ("end point", *e)))
            .chain(self.message_blocks.iter().map(|m| ("message block", m.bounds)));
        for (kind, rect) in rects {
            if !rect.is_well_formed() {
                return Err(LevelLoadError::invalid(
                    level,
                    format!("{kind} has a malformed rectangle: {rect:?}"),
                ));
            }
        }

        for (index, spawn) in self.monsters.iter().enumerate() {
            if spawn.patrol_min_x > spawn.patrol_max_x {
                return Err(LevelLoadError::invalid(
                    level,
                    format!(
                        "monster {index} patrol range {}..{} is reversed",
                        spawn.patrol_min_x, spawn.patrol_max_x
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Produces level records by number.
///
/// Implementations may read files, fetch over a network, or serve fixtures.
/// The simulation treats a call as the completion of an outstanding load.
pub trait LevelSource {
    /// Loads the level with the given number.
    fn load(&self, level: u32) -> LevelLoadResult<Level>;
}

/// In-memory level source, used for tests and embedded levels.
#[derive(Debug, Default, Clone)]
pub struct StaticLevelSource {
    levels: HashMap<u32, Level>,
}

impl StaticLevelSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a level.
    pub fn insert(&mut self, number: u32, level: Level) {
        self.levels.insert(number, level);
    }

    /// Builder-style [`StaticLevelSource::insert`].
    #[must_use]
    pub fn with_level(mut self, number: u32, level: Level) -> Self {
        self.insert(number, level);
        self
    }
}

impl LevelSource for StaticLevelSource {
    fn load(&self, level: u32) -> LevelLoadResult<Level> {
        let found = self
            .levels
            .get(&level)
            .cloned()
            .ok_or(LevelLoadError::NotFound { level })?;
        found.validate(level)?;
        Ok(found)
    }
}
