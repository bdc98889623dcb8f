//! Central game state management.
//!
//! [`GameState`] is the simulation context: it owns the installed level, the
//! player, monsters, arrows, camera and session flags, and every system is
//! called through it. Nothing lives in globals.
//!
//! Level loading is the one asynchronous boundary. Any load (the first one,
//! a restart, or an exit into another level) is recorded as a pending
//! request. While a request is outstanding [`GameState::tick`] does nothing
//! and reports [`TickStatus::NotReady`]. A collaborator fulfils the request
//! with [`GameState::complete_load`], which swaps in the new level and
//! rebuilds every entity in one step so nothing from the previous level
//! survives into the next tick.

use bowfall_common::LevelLoadResult;
use tracing::{debug, error, info, warn};

use crate::camera::Camera;
use crate::config::SimulationConfig;
use crate::events::{EventQueue, GameEvent};
use crate::input::{Action, ActionState, ButtonState};
use crate::level::{Level, LevelSource};
use crate::monster::Monster;
use crate::player::{DamageOutcome, Player};
use crate::projectile::{resolve_hits, update_arrows, Arrow};

/// What a call to [`GameState::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// No level installed or a load is outstanding; nothing was updated
    NotReady,
    /// The run is over (game over or level complete); only restart input is read
    Halted,
    /// A full simulation step ran
    Running,
}

/// Why a level is being loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadKind {
    /// First load of a session
    Initial,
    /// Reload of the current level after game over or completion
    Restart,
    /// Entering another level through an exit
    Transition {
        /// Player X in the destination level
        spawn_x: f32,
        /// Player Y in the destination level
        spawn_y: f32,
    },
}

/// An outstanding level load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadRequest {
    /// Level number to load
    pub level: u32,
    /// What to do with the player once it arrives
    pub kind: LoadKind,
}

/// Central game state containing all simulation data.
#[derive(Debug)]
pub struct GameState {
    config: SimulationConfig,
    level_number: u32,
    level: Option<Level>,
    pending: Option<LoadRequest>,
    player: Player,
    monsters: Vec<Monster>,
    arrows: Vec<Arrow>,
    camera: Camera,
    game_over: bool,
    level_complete: bool,
    active_message: Option<String>,
    fire_button: ButtonState,
    events: EventQueue,
}

impl GameState {
    /// Creates a game state waiting for `start_level` to load.
    #[must_use]
    pub fn new(start_level: u32, config: SimulationConfig) -> Self {
        let player = Player::new(0.0, 0.0, &config.player);
        let camera = Camera::new(&config.camera);
        Self {
            config,
            level_number: start_level,
            level: None,
            pending: Some(LoadRequest {
                level: start_level,
                kind: LoadKind::Initial,
            }),
            player,
            monsters: Vec::new(),
            arrows: Vec::new(),
            camera,
            game_over: false,
            level_complete: false,
            active_message: None,
            fire_button: ButtonState::new(),
            events: EventQueue::new(),
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// `now` is a monotonic timestamp in milliseconds used for cooldowns,
    /// invincibility and animation timing.
    pub fn tick(&mut self, input: &ActionState, now: u64) -> TickStatus {
        self.fire_button.update(input.is_held(Action::Fire));

        if self.pending.is_some() {
            return TickStatus::NotReady;
        }
        let Some(level) = self.level.as_mut() else {
            return TickStatus::NotReady;
        };

        if self.game_over || self.level_complete {
            if self.fire_button.just_pressed {
                self.request_restart();
            }
            return TickStatus::Halted;
        }

        if self.player.quiver.take_due(now, &self.config.arrow) {
            let arrow = Arrow::spawn(&self.player.body, &self.config.arrow);
            debug!("Arrow fired at ({}, {})", arrow.x, arrow.y);
            self.events.push(GameEvent::ArrowFired {
                x: arrow.x,
                y: arrow.y,
                direction: arrow.direction.sign(),
            });
            self.arrows.push(arrow);
        }

        let report = self
            .player
            .update(input, now, level, &self.config, &mut self.events);
        if report.died {
            self.game_over = true;
        }

        if let Some(exit) = report.exit {
            info!("Leaving level {} for level {}", self.level_number, exit.to_level);
            self.active_message = None;
            self.request_load(
                exit.to_level,
                LoadKind::Transition {
                    spawn_x: exit.spawn_x,
                    spawn_y: exit.spawn_y,
                },
            );
            return TickStatus::Running;
        }

        if report.reached_end && !self.level_complete {
            info!("Level {} complete", self.level_number);
            self.level_complete = true;
            self.events.push(GameEvent::LevelCompleted {
                level: self.level_number,
            });
        }

        self.active_message = report
            .message_block
            .and_then(|index| level.message_blocks.get(index))
            .map(|block| block.message.clone());

        update_arrows(
            &mut self.arrows,
            self.config.physics.gravity,
            &self.config.arrow,
            level.width,
            level.height,
        );

        for monster in &mut self.monsters {
            let touching =
                monster.update(&self.player.body, level, &self.config.physics, &self.config.monster);
            if touching && self.player.damage(now, &mut self.events) == DamageOutcome::Died {
                self.game_over = true;
            }
        }

        resolve_hits(
            &mut self.arrows,
            &mut self.monsters,
            &self.config.monster,
            &mut self.events,
        );

        self.camera
            .follow(&self.player.hitbox(), level.width, level.height);

        TickStatus::Running
    }

    /// Deals one point of damage to the player, honouring invincibility.
    ///
    /// This is the only path that ends the run with a game over.
    pub fn damage_player(&mut self, now: u64) -> DamageOutcome {
        let outcome = self.player.damage(now, &mut self.events);
        if outcome == DamageOutcome::Died {
            self.game_over = true;
        }
        outcome
    }

    /// Requests a reload of the current level.
    ///
    /// Also used to retry after a failed load.
    pub fn request_restart(&mut self) {
        info!("Restarting level {}", self.level_number);
        self.request_load(self.level_number, LoadKind::Restart);
    }

    fn request_load(&mut self, level: u32, kind: LoadKind) {
        self.level_number = level;
        self.level = None;
        self.pending = Some(LoadRequest { level, kind });
    }

    /// Level number of the outstanding load, if any.
    #[must_use]
    pub fn pending_load(&self) -> Option<u32> {
        self.pending.map(|request| request.level)
    }

    /// The outstanding load request, if any.
    #[must_use]
    pub fn pending_request(&self) -> Option<LoadRequest> {
        self.pending
    }

    /// Fulfils the outstanding load request.
    ///
    /// A failed load is logged and leaves the state not ready; it is not
    /// retried until [`GameState::request_restart`] is called.
    pub fn complete_load(&mut self, result: LevelLoadResult<Level>) {
        let Some(request) = self.pending.take() else {
            warn!("Level load completed with no request outstanding; ignoring");
            return;
        };

        match result {
            Ok(level) => self.install(request, level),
            Err(err) => {
                error!("Failed to load level {}: {}", request.level, err);
                self.level = None;
            },
        }
    }

    /// Loads the pending level from `source`, if a load is outstanding.
    ///
    /// Returns whether a load was attempted.
    pub fn service_pending_load<S: LevelSource + ?Sized>(&mut self, source: &S) -> bool {
        let Some(request) = self.pending else {
            return false;
        };
        let result = source.load(request.level);
        self.complete_load(result);
        true
    }

    fn install(&mut self, request: LoadRequest, level: Level) {
        let (x, y) = match request.kind {
            LoadKind::Initial | LoadKind::Restart => {
                let start = level.player_start;
                self.player.reset_to(start.x, start.y, &self.config.player);
                self.game_over = false;
                self.level_complete = false;
                (start.x, start.y)
            },
            LoadKind::Transition { spawn_x, spawn_y } => {
                self.player.place_at(spawn_x, spawn_y);
                (spawn_x, spawn_y)
            },
        };

        self.arrows.clear();
        self.monsters = Monster::spawn_all(&level, &self.config.monster);
        self.active_message = None;
        self.camera.center_on(x, y, level.width, level.height);

        info!(
            "Installed level {} ({}x{}, {} platforms, {} monsters)",
            request.level,
            level.width,
            level.height,
            level.platforms.len(),
            self.monsters.len()
        );
        self.level_number = request.level;
        self.level = Some(level);
        self.events.push(GameEvent::LevelInstalled {
            level: request.level,
        });
    }

    /// Whether a level is installed and no load is outstanding.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.level.is_some() && self.pending.is_none()
    }

    /// Number of the current (or loading) level.
    #[must_use]
    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    /// Installed level.
    #[must_use]
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Live monsters in roster order.
    #[must_use]
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// Arrows in flight.
    #[must_use]
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Whether the player has died.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Whether the end point has been reached.
    #[must_use]
    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    /// Text of the message block the player stands in.
    #[must_use]
    pub fn active_message(&self) -> Option<&str> {
        self.active_message.as_deref()
    }

    /// Tuning in use.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Removes and returns events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Facing;
    use crate::geometry::Rect;
    use crate::level::{Exit, MessageBlock, MonsterSpawn, Platform, Point, StaticLevelSource};
    use bowfall_common::LevelLoadError;

    const TICK_MS: u64 = 20;

    fn base_level() -> Level {
        let mut level = Level::empty(2000.0, 1000.0, Point { x: 100.0, y: 844.0 });
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, 900.0, 2000.0, 100.0), true));
        level
    }

    fn ready_state(level: Level) -> GameState {
        let source = StaticLevelSource::new().with_level(1, level);
        let mut state = GameState::new(1, SimulationConfig::default());
        assert!(state.service_pending_load(&source));
        assert!(state.is_ready());
        state.drain_events();
        state
    }

    fn idle() -> ActionState {
        ActionState::new()
    }

    #[test]
    fn test_not_ready_until_loaded() {
        let mut state = GameState::new(1, SimulationConfig::default());
        assert_eq!(state.pending_load(), Some(1));
        assert_eq!(state.tick(&idle(), 0), TickStatus::NotReady);

        let source = StaticLevelSource::new().with_level(1, base_level());
        state.service_pending_load(&source);

        assert!(state.is_ready());
        assert_eq!(state.player().body.x, 100.0);
        assert_eq!(state.player().health, 3);
        assert_eq!(state.camera().x, 0.0);
        assert_eq!(state.camera().y, 400.0);
        assert_eq!(state.drain_events(), vec![GameEvent::LevelInstalled { level: 1 }]);
        assert_eq!(state.tick(&idle(), 0), TickStatus::Running);
    }

    #[test]
    fn test_failed_load_stays_not_ready_until_retry() {
        let mut state = GameState::new(1, SimulationConfig::default());
        let empty = StaticLevelSource::new();

        state.service_pending_load(&empty);
        assert!(!state.is_ready());
        assert_eq!(state.pending_load(), None);
        assert_eq!(state.tick(&idle(), 0), TickStatus::NotReady);
        // No automatic retry
        assert!(!state.service_pending_load(&empty));

        state.request_restart();
        let source = StaticLevelSource::new().with_level(1, base_level());
        state.service_pending_load(&source);
        assert!(state.is_ready());
    }

    #[test]
    fn test_completion_without_request_is_ignored() {
        let mut state = ready_state(base_level());
        let mut other = base_level();
        other.width = 500.0;

        state.complete_load(Ok(other));

        assert_eq!(state.level().map(|level| level.width), Some(2000.0));
    }

    #[test]
    fn test_failed_load_error_leaves_level_empty() {
        let mut state = GameState::new(4, SimulationConfig::default());

        state.complete_load(Err(LevelLoadError::NotFound { level: 4 }));

        assert!(state.level().is_none());
        assert_eq!(state.level_number(), 4);
    }

    #[test]
    fn test_spike_death_then_restart() {
        let mut level = base_level();
        level.spikes.push(Rect::new(90.0, 880.0, 80.0, 20.0));
        let mut state = ready_state(level.clone());
        state.player.health = 1;
        let fire = idle().with(Action::Fire);

        // Dies while holding fire
        assert_eq!(state.tick(&fire, 0), TickStatus::Running);
        assert_eq!(state.player().health, 0);
        assert!(state.is_game_over());

        // Still held: no restart
        assert_eq!(state.tick(&fire, 20), TickStatus::Halted);
        assert_eq!(state.pending_load(), None);

        assert_eq!(state.tick(&idle(), 40), TickStatus::Halted);
        assert_eq!(state.tick(&fire, 60), TickStatus::Halted);
        assert_eq!(state.pending_load(), Some(1));
        assert_eq!(state.tick(&fire, 80), TickStatus::NotReady);

        let source = StaticLevelSource::new().with_level(1, level);
        state.service_pending_load(&source);

        assert!(!state.is_game_over());
        assert_eq!(state.player().health, 3);
        assert_eq!(state.player().body.x, 100.0);
        assert_eq!(state.level_number(), 1);
    }

    #[test]
    fn test_damage_player_twice_within_window() {
        let mut state = ready_state(base_level());

        assert_eq!(state.damage_player(1_000), DamageOutcome::Hurt);
        assert_eq!(state.damage_player(1_999), DamageOutcome::Ignored);
        assert_eq!(state.player().health, 2);
    }

    #[test]
    fn test_damage_player_to_zero_ends_run() {
        let mut state = ready_state(base_level());
        state.player.health = 1;

        assert_eq!(state.damage_player(0), DamageOutcome::Died);
        assert!(state.is_game_over());
        assert_eq!(state.tick(&idle(), 20), TickStatus::Halted);
    }

    #[test]
    fn test_message_block_follows_player() {
        let mut level = base_level();
        level.message_blocks.push(MessageBlock {
            bounds: Rect::new(50.0, 800.0, 150.0, 100.0),
            message: "Hello".to_string(),
        });
        let mut state = ready_state(level);

        state.tick(&idle(), 0);
        assert_eq!(state.active_message(), Some("Hello"));

        state.player.body.x = 600.0;
        state.tick(&idle(), 20);
        assert_eq!(state.active_message(), None);
    }

    #[test]
    fn test_held_fire_spawns_one_arrow_after_delay() {
        let mut state = ready_state(base_level());
        let fire = idle().with(Action::Fire);

        let mut fired_at = Vec::new();
        let mut now = 1_000;
        while now < 1_450 {
            state.tick(&fire, now);
            for event in state.drain_events() {
                if matches!(event, GameEvent::ArrowFired { .. }) {
                    fired_at.push(now);
                }
            }
            now += TICK_MS;
        }

        assert_eq!(fired_at, vec![1_200]);
        assert_eq!(state.arrows().len(), 1);
        assert_eq!(state.arrows()[0].direction, Facing::Right);
    }

    #[test]
    fn test_arrow_kills_weakened_monster() {
        let mut level = base_level();
        level.monsters.push(MonsterSpawn {
            x: 1500.0,
            y: 860.0,
            patrol_min_x: 1400.0,
            patrol_max_x: 1700.0,
        });
        let mut state = ready_state(level);
        let fire = idle().with(Action::Fire);

        let mut now = 1_000;
        while now < 1_200 {
            state.tick(&fire, now);
            now += TICK_MS;
        }
        assert!(state.arrows().is_empty());

        state.monsters[0].body.x = 150.0;
        state.monsters[0].body.y = 860.0;
        state.monsters[0].health = 1;

        state.tick(&idle(), now);

        assert!(state.monsters().is_empty());
        assert!(state.arrows().is_empty());
        assert!(state
            .drain_events()
            .contains(&GameEvent::MonsterKilled { index: 0 }));
    }

    #[test]
    fn test_monster_contact_respects_invincibility() {
        let mut level = base_level();
        level.monsters.push(MonsterSpawn {
            x: 100.0,
            y: 860.0,
            patrol_min_x: 0.0,
            patrol_max_x: 500.0,
        });
        let mut state = ready_state(level);

        state.tick(&idle(), 0);
        assert_eq!(state.player().health, 2);

        state.tick(&idle(), 500);
        assert_eq!(state.player().health, 2);

        state.tick(&idle(), 1_100);
        assert_eq!(state.player().health, 1);
    }

    #[test]
    fn test_end_point_completes_level() {
        let mut level = base_level();
        level.end_point = Some(Rect::new(120.0, 820.0, 40.0, 80.0));
        let mut state = ready_state(level);

        assert_eq!(state.tick(&idle(), 0), TickStatus::Running);
        assert!(state.is_level_complete());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LevelCompleted { level: 1 }]
        );
        assert_eq!(state.tick(&idle(), 20), TickStatus::Halted);
    }

    #[test]
    fn test_exit_transition_installs_destination() {
        let mut first = base_level();
        first.player_start = Point { x: 280.0, y: 844.0 };
        first.exits.push(Exit {
            bounds: Rect::new(300.0, 800.0, 50.0, 100.0),
            to_level: 2,
            spawn_x: 60.0,
            spawn_y: 400.0,
        });
        let mut second = Level::empty(1500.0, 800.0, Point { x: 10.0, y: 10.0 });
        second.monsters.push(MonsterSpawn {
            x: 900.0,
            y: 700.0,
            patrol_min_x: 800.0,
            patrol_max_x: 1200.0,
        });
        second.monsters.push(MonsterSpawn {
            x: 1300.0,
            y: 700.0,
            patrol_min_x: 1250.0,
            patrol_max_x: 1450.0,
        });
        let source = StaticLevelSource::new()
            .with_level(1, first)
            .with_level(2, second);

        let mut state = GameState::new(1, SimulationConfig::default());
        state.service_pending_load(&source);
        state.player.health = 4;
        state.arrows.push(Arrow::spawn(&state.player.body, &state.config.arrow));

        assert_eq!(state.tick(&idle(), 0), TickStatus::Running);
        assert_eq!(state.pending_load(), Some(2));
        assert_eq!(
            state.pending_request().map(|request| request.kind),
            Some(LoadKind::Transition {
                spawn_x: 60.0,
                spawn_y: 400.0
            })
        );
        assert_eq!(state.tick(&idle(), 20), TickStatus::NotReady);

        state.service_pending_load(&source);

        assert!(state.is_ready());
        assert_eq!(state.level_number(), 2);
        assert_eq!((state.player().body.x, state.player().body.y), (60.0, 400.0));
        assert_eq!(state.player().health, 4);
        assert_eq!(state.player().current_platform, None);
        assert!(state.arrows().is_empty());
        assert_eq!(state.monsters().len(), 2);
        assert_eq!(state.camera().x, 0.0);
        assert_eq!(state.camera().y, 100.0);
    }
}
