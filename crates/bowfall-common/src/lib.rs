//! # Bowfall Common
//!
//! Shared types for the Bowfall workspace.
//!
//! This crate provides the pieces both the simulation core and the engine
//! driver need to agree on:
//! - Level loading error taxonomy
//! - Schema version information for the level format
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::version::*;
}

pub use prelude::*;
