//! Display formatting for terminal output

pub mod snapshot;

pub use snapshot::{dir_size, format_duration, format_size, format_snapshot_list, SnapshotListing};
