//! Headless session driver.
//!
//! Owns a [`GameState`], services its level loads from a [`LevelSource`],
//! feeds it scripted input, and logs the events each tick raises.

use std::fmt;

use bowfall_gameplay::{
    Clock, GameEvent, GameState, LevelSource, ManualClock, SimulationConfig, SystemClock,
    TickStatus,
};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::script::InputScript;
use crate::timing::FrameTiming;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Tick budget used up
    TickLimit,
    /// A level failed to load and nothing is pending
    Stalled,
}

/// End-of-run snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Why the run stopped
    pub reason: StopReason,
    /// Ticks executed
    pub ticks: u64,
    /// Level number at the end
    pub level: u32,
    /// Player health at the end
    pub health: u32,
    /// Player position at the end
    pub position: (f32, f32),
    /// Monsters still alive
    pub monsters: usize,
    /// Player died
    pub game_over: bool,
    /// End point reached
    pub level_complete: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} after {} ticks: level {}, health {}, player at ({:.1}, {:.1}), {} monsters left",
            self.reason,
            self.ticks,
            self.level,
            self.health,
            self.position.0,
            self.position.1,
            self.monsters
        )?;
        if self.game_over {
            write!(f, ", game over")?;
        }
        if self.level_complete {
            write!(f, ", level complete")?;
        }
        Ok(())
    }
}

/// One simulation run.
#[derive(Debug)]
pub struct Session<S: LevelSource> {
    state: GameState,
    source: S,
    script: InputScript,
    ticks: u64,
}

impl<S: LevelSource> Session<S> {
    /// Creates a session that will load `start_level` on its first step.
    pub fn new(start_level: u32, config: SimulationConfig, source: S, script: InputScript) -> Self {
        Self {
            state: GameState::new(start_level, config),
            source,
            script,
            ticks: 0,
        }
    }

    /// Services any pending load, then runs one tick at `now`.
    pub fn step(&mut self, now: u64) -> TickStatus {
        self.state.service_pending_load(&self.source);

        let input = self.script.actions_at(self.ticks);
        let status = self.state.tick(&input, now);
        self.ticks += 1;

        for event in self.state.drain_events() {
            log_event(&event);
        }

        status
    }

    /// Whether the session can make no further progress.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        !self.state.is_ready() && self.state.pending_load().is_none()
    }

    /// Snapshot of the session.
    #[must_use]
    pub fn summary(&self, reason: StopReason) -> RunSummary {
        let player = self.state.player();
        RunSummary {
            reason,
            ticks: self.ticks,
            level: self.state.level_number(),
            health: player.health,
            position: (player.body.x, player.body.y),
            monsters: self.state.monsters().len(),
            game_over: self.state.is_game_over(),
            level_complete: self.state.is_level_complete(),
        }
    }

    /// Runs up to `max_ticks` ticks, `tick_ms` simulated ms apart.
    pub fn run_fixed(&mut self, max_ticks: u64, tick_ms: u64) -> RunSummary {
        let clock = ManualClock::new(0);
        while self.ticks < max_ticks {
            self.step(clock.now_ms());
            if self.is_stalled() {
                warn!("Simulation stalled on level {}", self.state.level_number());
                return self.summary(StopReason::Stalled);
            }
            clock.advance(tick_ms);
        }
        self.summary(StopReason::TickLimit)
    }

    /// Runs against the wall clock, pacing frames with `timing`.
    pub fn run_realtime(&mut self, max_ticks: u64, timing: &mut FrameTiming) -> RunSummary {
        let clock = SystemClock::new();
        timing.reset();
        while self.ticks < max_ticks {
            let dt = timing.delta_ms();
            let due = timing.accumulate(dt);
            for _ in 0..due {
                self.step(clock.now_ms());
                if self.is_stalled() {
                    warn!("Simulation stalled on level {}", self.state.level_number());
                    return self.summary(StopReason::Stalled);
                }
            }
            timing.sleep_remainder();
        }
        self.summary(StopReason::TickLimit)
    }
}

/// Runs a session as configured.
pub fn run<S: LevelSource>(config: &EngineConfig, source: S, script: InputScript) -> RunSummary {
    info!(
        "Starting at level {} ({} mode, {} tick budget)",
        config.start_level,
        if config.realtime { "realtime" } else { "fixed-step" },
        config.max_ticks
    );

    let mut session = Session::new(config.start_level, config.simulation.clone(), source, script);
    if config.realtime {
        let mut timing = FrameTiming::new(config.target_fps, config.tick_ms);
        debug!("Pacing to {} fps, {}ms per tick", timing.target_fps(), timing.tick_ms());
        let summary = session.run_realtime(config.max_ticks, &mut timing);
        debug!("Average frame time {:.2}ms", timing.average_frame_time_ms());
        summary
    } else {
        session.run_fixed(config.max_ticks, config.tick_ms)
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::LevelInstalled { level } => info!("Level {level} ready"),
        GameEvent::LevelExit { to_level } => info!("Exit taken to level {to_level}"),
        GameEvent::LevelCompleted { level } => info!("Level {level} completed"),
        GameEvent::PlayerDied => info!("Player died"),
        other => debug!("{other:?}"),
    }
}
