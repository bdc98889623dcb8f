//! Scripted input for headless runs.
//!
//! A script is a JSON array of keyframes. Each keyframe names the actions
//! held from its tick onward, until the next keyframe replaces them:
//!
//! ```json
//! [
//!   { "frame": 0,  "held": ["moveRight"] },
//!   { "frame": 40, "held": ["moveRight", "jump"] },
//!   { "frame": 45, "held": [] }
//! ]
//! ```

use std::fs;
use std::path::Path;

use bowfall_gameplay::{Action, ActionState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur loading an input script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The file could not be read
    #[error("Failed to read input script: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid script
    #[error("Failed to parse input script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One keyframe of held actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Tick at which this keyframe takes effect
    pub frame: u64,
    /// Actions held from this tick on
    #[serde(default)]
    pub held: Vec<Action>,
}

/// A sorted list of keyframes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputScript {
    keyframes: Vec<Keyframe>,
}

impl InputScript {
    /// Builds a script, sorting keyframes by tick.
    #[must_use]
    pub fn new(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by_key(|keyframe| keyframe.frame);
        Self { keyframes }
    }

    /// Parses a script from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let keyframes: Vec<Keyframe> = serde_json::from_str(json)?;
        Ok(Self::new(keyframes))
    }

    /// Reads a script from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Actions held at `frame`. Nothing is held before the first keyframe.
    #[must_use]
    pub fn actions_at(&self, frame: u64) -> ActionState {
        let upto = self.keyframes.partition_point(|keyframe| keyframe.frame <= frame);
        upto.checked_sub(1)
            .and_then(|index| self.keyframes.get(index))
            .map(|keyframe| keyframe.held.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of keyframes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the script has no keyframes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keyframes_hold_until_replaced() {
        let script = InputScript::from_json(
            r#"[
                { "frame": 40, "held": ["moveRight", "jump"] },
                { "frame": 10, "held": ["moveRight"] },
                { "frame": 45 }
            ]"#,
        )
        .expect("script parses");

        assert_eq!(script.len(), 3);
        assert_eq!(script.actions_at(0), ActionState::new());
        assert!(script.actions_at(10).is_held(Action::MoveRight));
        assert!(!script.actions_at(39).is_held(Action::Jump));
        assert!(script.actions_at(44).is_held(Action::Jump));
        assert_eq!(script.actions_at(1_000), ActionState::new());
    }

    #[test]
    fn test_empty_script_holds_nothing() {
        let script = InputScript::default();
        assert!(script.is_empty());
        assert_eq!(script.actions_at(5), ActionState::new());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("demo.json");
        fs::write(&path, r#"[{ "frame": 0, "held": ["fire"] }]"#).expect("write script");

        let script = InputScript::load(&path).expect("script loads");

        assert!(script.actions_at(0).is_held(Action::Fire));
    }

    #[test]
    fn test_unknown_action_is_parse_error() {
        let result = InputScript::from_json(r#"[{ "frame": 0, "held": ["teleport"] }]"#);
        assert!(matches!(result, Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = InputScript::load("/nonexistent/script.json");
        assert!(matches!(result, Err(ScriptError::Io(_))));
    }
}
