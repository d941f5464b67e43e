//! Configuration module for snapkeep
//!
//! - Config file resolution
//! - Settings loading, saving, and validation

pub mod paths;
pub mod settings;

pub use paths::SnapkeepPaths;
pub use settings::{ExternalSettings, InternalSettings, Settings, TaskSettings};
