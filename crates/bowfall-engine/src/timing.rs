//! Frame timing for the realtime driver.
//!
//! Converts wall-clock frame deltas into a whole number of fixed simulation
//! ticks and paces the loop to the target frame rate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Most ticks run for a single frame; the rest of a long stall is dropped.
const MAX_TICKS_PER_FRAME: u32 = 10;

/// Frame timing manager.
#[derive(Debug)]
pub struct FrameTiming {
    /// Target frames per second
    target_fps: u32,
    /// Time budget per frame
    frame_budget: Duration,
    /// Time of last frame start
    last_frame: Instant,
    /// Milliseconds not yet consumed by ticks
    accumulator_ms: f64,
    /// Simulated milliseconds per tick
    tick_ms: u64,
    /// Largest frame delta accepted, in ms
    max_dt_ms: f64,
    /// Recent frame times for averaging, in ms
    frame_times: VecDeque<f64>,
    /// Maximum samples for averaging
    max_samples: usize,
}

impl FrameTiming {
    /// Create a new frame timing manager.
    #[must_use]
    pub fn new(target_fps: u32, tick_ms: u64) -> Self {
        let target_fps = target_fps.max(1);
        Self {
            target_fps,
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            last_frame: Instant::now(),
            accumulator_ms: 0.0,
            tick_ms: tick_ms.max(1),
            max_dt_ms: 250.0,
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
        }
    }

    /// Simulated milliseconds per tick.
    #[must_use]
    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    /// Milliseconds since the previous call, clamped to the maximum delta.
    pub fn delta_ms(&mut self) -> f64 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f64() * 1000.0;
        self.last_frame = now;

        let clamped = dt.min(self.max_dt_ms);

        self.frame_times.push_back(clamped);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }

        clamped
    }

    /// Accumulates `dt_ms` and returns how many ticks to run this frame.
    pub fn accumulate(&mut self, dt_ms: f64) -> u32 {
        let tick = self.tick_ms as f64;
        self.accumulator_ms += dt_ms;
        let mut count = 0;

        while self.accumulator_ms >= tick && count < MAX_TICKS_PER_FRAME {
            self.accumulator_ms -= tick;
            count += 1;
        }

        // Still behind after the cap: drop the backlog
        if self.accumulator_ms > tick * 2.0 {
            self.accumulator_ms = 0.0;
        }

        count
    }

    /// Sleep for the remainder of the frame budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Average frame time in milliseconds over recent frames.
    #[must_use]
    pub fn average_frame_time_ms(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
    }

    /// Get the target FPS.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Reset timing (call after a load stall).
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
        self.accumulator_ms = 0.0;
        self.frame_times.clear();
    }
}
