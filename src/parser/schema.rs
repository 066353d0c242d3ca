//! Core data model and output JSON schema definitions.
//!
//! `StarEvent` and `Repository` are the validated form of what the data
//! source delivers. `Report` is the structure of JSON files we write to disk;
//! it is versioned to allow future evolution.

use crate::aggregator::OrganizationSummary;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A single star given to a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarEvent {
    /// Login of the user who starred the repository
    pub actor_id: String,

    /// When the star was given
    pub starred_at: DateTime<Utc>,
}

impl StarEvent {
    pub fn new(actor_id: impl Into<String>, starred_at: DateTime<Utc>) -> Self {
        Self {
            actor_id: actor_id.into(),
            starred_at,
        }
    }
}

/// A repository together with the page of star events fetched for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,

    /// Star count reported by the API, which covers all history
    pub total_star_count: u64,

    /// Star events, most recent first as delivered
    pub events: Vec<StarEvent>,
}

impl Repository {
    pub fn new(name: impl Into<String>, total_star_count: u64, events: Vec<StarEvent>) -> Self {
        Self {
            name: name.into(),
            total_star_count,
            events,
        }
    }

    /// Most recent star, independent of delivery order
    pub fn last_starred_at(&self) -> Option<DateTime<Utc>> {
        self.events.iter().map(|e| e.starred_at).max()
    }
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Organization login the data was collected for
    pub organization: String,

    /// Instant the weeks were anchored to
    pub reference_instant: DateTime<FixedOffset>,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Aggregated weekly counts
    pub summary: OrganizationSummary,
}
