//! Engine configuration.
//!
//! Provides the driver's run settings plus the full simulation tuning.
//! Configuration is loaded from a TOML file; anything missing keeps its default.

use bowfall_gameplay::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "bowfall.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Levels ===
    /// Directory holding `<n>.json` level files
    pub levels_dir: PathBuf,
    /// Level number to start on
    pub start_level: u32,

    // === Timing ===
    /// Target frames per second in realtime mode
    pub target_fps: u32,
    /// Simulated milliseconds per tick
    pub tick_ms: u64,
    /// Stop after this many ticks
    pub max_ticks: u64,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,

    // === Input ===
    /// Optional JSON input script
    pub input_script: Option<PathBuf>,

    // === Simulation ===
    /// Gameplay tuning
    pub simulation: SimulationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("levels"),
            start_level: 1,

            target_fps: 60,
            tick_ms: 16,
            max_ticks: 3_600,
            realtime: false,

            input_script: None,

            simulation: SimulationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        self.target_fps = self.target_fps.clamp(1, 240);
        self.tick_ms = self.tick_ms.clamp(1, 100);
        self.max_ticks = self.max_ticks.max(1);

        let camera = &mut self.simulation.camera;
        camera.viewport_width = camera.viewport_width.max(1.0);
        camera.viewport_height = camera.viewport_height.max(1.0);

        let player = &mut self.simulation.player;
        player.max_health = player.max_health.max(1);
        player.start_health = player.start_health.clamp(1, player.max_health);

        self.simulation.monster.max_health = self.simulation.monster.max_health.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.start_level, 1);
        assert_eq!(config.tick_ms, 16);
        assert!(!config.realtime);
        assert!(config.input_script.is_none());
        assert_eq!(config.simulation.player.max_health, 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        config.tick_ms = 0;
        config.target_fps = 1_000;
        config.simulation.player.start_health = 9;
        config.simulation.camera.viewport_width = -4.0;

        config.validate();

        assert_eq!(config.tick_ms, 1);
        assert_eq!(config.target_fps, 240);
        assert_eq!(config.simulation.player.start_health, 5);
        assert_eq!(config.simulation.camera.viewport_width, 1.0);
    }

    #[test]
    fn test_config_round_trips_through_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bowfall.toml");

        let mut config = EngineConfig::default();
        config.start_level = 3;
        config.realtime = true;
        config.input_script = Some(PathBuf::from("scripts/demo.json"));
        config.simulation.arrow.cooldown_ms = 250;

        let contents = toml::to_string_pretty(&config).expect("config serializes");
        fs::write(&config_path, contents).expect("write config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.start_level, 3);
        assert!(loaded.realtime);
        assert_eq!(loaded.input_script, Some(PathBuf::from("scripts/demo.json")));
        assert_eq!(loaded.simulation.arrow.cooldown_ms, 250);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/bowfall.toml");
        assert_eq!(config.max_ticks, 3_600);
    }

    #[test]
    fn test_config_load_invalid_file_falls_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bowfall.toml");
        fs::write(&config_path, "start_level = \"one\"").expect("write config");

        let config = EngineConfig::load_from(&config_path);

        assert_eq!(config.start_level, 1);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            start_level = 2

            [simulation.player]
            move_speed = 6.0
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.start_level, 2);
        assert_eq!(config.simulation.player.move_speed, 6.0);
        assert_eq!(config.simulation.player.jump_velocity, -12.0);
        assert_eq!(config.tick_ms, 16);
    }
}
