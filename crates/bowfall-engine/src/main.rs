//! # Bowfall Engine
//!
//! Headless driver for the Bowfall platformer simulation.
//!
//! This binary ties the simulation to the outside world:
//! - Configuration from `bowfall.toml` (or a path given as the first argument)
//! - Levels read from `<levels_dir>/<n>.json`
//! - Input replayed from an optional JSON script
//! - Fixed-step or realtime tick scheduling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod level_source;
mod runner;
mod script;
mod timing;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::EngineConfig;
use crate::level_source::JsonLevelSource;
use crate::runner::StopReason;
use crate::script::InputScript;

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("bowfall=info".parse()?))
        .init();

    info!("Bowfall starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.validate();

    let script = match &config.input_script {
        Some(path) => InputScript::load(path)
            .with_context(|| format!("loading input script {}", path.display()))?,
        None => InputScript::default(),
    };
    if script.is_empty() {
        info!("No input script; the player will stand idle");
    } else {
        info!("Input script has {} keyframes", script.len());
    }

    let source = JsonLevelSource::new(&config.levels_dir);
    let summary = runner::run(&config, source, script);
    info!("{summary}");

    if summary.reason == StopReason::Stalled {
        bail!(
            "level {} could not be loaded from {}",
            summary.level,
            config.levels_dir.display()
        );
    }

    info!("Bowfall shutdown complete");
    Ok(())
}
