//! Level files on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bowfall_common::{LevelLoadError, LevelLoadResult};
use bowfall_gameplay::{Level, LevelSource};
use tracing::debug;

/// Reads levels from `<dir>/<n>.json`.
#[derive(Debug, Clone)]
pub struct JsonLevelSource {
    dir: PathBuf,
}

impl JsonLevelSource {
    /// Creates a source rooted at `dir`.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File a level number maps to.
    #[must_use]
    pub fn path_for(&self, level: u32) -> PathBuf {
        self.dir.join(format!("{level}.json"))
    }
}

impl LevelSource for JsonLevelSource {
    fn load(&self, level: u32) -> LevelLoadResult<Level> {
        let path = self.path_for(level);
        debug!("Reading level {} from {}", level, path.display());

        let json = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LevelLoadError::NotFound { level }
            } else {
                LevelLoadError::Read { level, source }
            }
        })?;

        Level::from_json(level, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEVEL: &str = r#"{
        "width": 800, "height": 600,
        "playerStart": { "x": 10, "y": 10 },
        "platforms": [ { "x": 0, "y": 580, "width": 800, "height": 20, "solid": true } ],
        "spikes": [],
        "healthPotions": []
    }"#;

    #[test]
    fn test_loads_numbered_file() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("1.json"), LEVEL).expect("write level");
        let source = JsonLevelSource::new(dir.path());

        let level = source.load(1).expect("level loads");

        assert_eq!(level.width, 800.0);
        assert_eq!(level.platforms.len(), 1);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().expect("temp dir");
        let source = JsonLevelSource::new(dir.path());

        assert!(matches!(
            source.load(7),
            Err(LevelLoadError::NotFound { level: 7 })
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("2.json"), "{ \"width\": 800 ").expect("write level");
        let source = JsonLevelSource::new(dir.path());

        assert!(matches!(
            source.load(2),
            Err(LevelLoadError::Parse { level: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("3.json"), LEVEL.replace("\"width\": 800", "\"width\": -1"))
            .expect("write level");
        let source = JsonLevelSource::new(dir.path());

        assert!(matches!(
            source.load(3),
            Err(LevelLoadError::Invalid { level: 3, .. })
        ));
    }
}
