//! Error types for Bowfall.

use thiserror::Error;

use crate::version::SchemaVersion;

/// Failure to obtain a playable level.
///
/// A load failure never crashes the simulation: the game state logs it and
/// stays "not ready" until a later load succeeds.
#[derive(Debug, Error)]
pub enum LevelLoadError {
    /// No level data exists for the requested number
    #[error("Level {level} not found")]
    NotFound {
        /// Requested level number
        level: u32,
    },

    /// Level data exists but could not be read
    #[error("Failed to read level {level}: {source}")]
    Read {
        /// Requested level number
        level: u32,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Level data is not well-formed JSON or is missing required fields
    #[error("Failed to parse level {level}: {source}")]
    Parse {
        /// Requested level number
        level: u32,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Level data parsed but violates a structural rule
    #[error("Level {level} is invalid: {reason}")]
    Invalid {
        /// Requested level number
        level: u32,
        /// Which rule was violated
        reason: String,
    },

    /// Level was written for an incompatible schema
    #[error("Level {level} uses format {found}, expected {expected}")]
    UnsupportedVersion {
        /// Requested level number
        level: u32,
        /// Version declared by the level
        found: SchemaVersion,
        /// Version this build reads
        expected: SchemaVersion,
    },
}

impl LevelLoadError {
    /// Shorthand for an [`LevelLoadError::Invalid`] error.
    pub fn invalid(level: u32, reason: impl Into<String>) -> Self {
        Self::Invalid {
            level,
            reason: reason.into(),
        }
    }
}

/// Result type alias for level loading.
pub type LevelLoadResult<T> = Result<T, LevelLoadError>;
