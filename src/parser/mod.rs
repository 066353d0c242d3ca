//! Snapshot parsing and schema definitions.
//!
//! This module handles:
//! - Reading repository snapshots (JSON from the data source or a file)
//! - Validating star timestamps
//! - Defining the core data model and the output schema

pub mod schema;
pub mod snapshot;

// Re-export main types
pub use schema::{Report, Repository, StarEvent};
pub use snapshot::{
    load_snapshot, parse_snapshot, parse_timestamp, RawMember, RawRepository, RawStarEvent,
    Snapshot,
};
