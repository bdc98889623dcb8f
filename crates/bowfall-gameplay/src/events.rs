//! Gameplay events raised during a tick.
//!
//! Systems push events as they happen; the driver drains the queue after
//! each tick to log them or hand them to audio and rendering layers.

use serde::{Deserialize, Serialize};

/// Event types raised by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A level finished loading and is now active
    LevelInstalled {
        /// Level number
        level: u32,
    },
    /// An arrow left the bow
    ArrowFired {
        /// Spawn X
        x: f32,
        /// Spawn Y
        y: f32,
        /// -1 left, +1 right
        direction: f32,
    },
    /// The player lost health
    PlayerDamaged {
        /// Health after the hit
        health: u32,
    },
    /// The player's health reached zero
    PlayerDied,
    /// The player picked up a health potion
    PotionCollected {
        /// Index into the level's potion list
        index: usize,
        /// Health after pickup
        health: u32,
    },
    /// An arrow hit a monster that survived
    MonsterHit {
        /// Index into the live monster roster at the time of the hit
        index: usize,
        /// Monster health after the hit
        health: u32,
    },
    /// An arrow killed a monster
    MonsterKilled {
        /// Index into the live monster roster at the time of the kill
        index: usize,
    },
    /// The player walked into a level exit
    LevelExit {
        /// Destination level
        to_level: u32,
    },
    /// The player reached the end point
    LevelCompleted {
        /// Level number
        level: u32,
    },
}

/// FIFO queue of events raised since the last drain.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
