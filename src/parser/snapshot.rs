//! Repository snapshots as delivered by the data source.
//!
//! A snapshot is the boundary between fetching and aggregation. It carries
//! timestamps as ISO-8601 strings; converting it into [`Repository`] values
//! parses every one of them and fails on the first that is not an instant.
//! An unparseable timestamp is a contract violation upstream, so it is never
//! folded into the "other week" bucket.

use super::schema::{Repository, StarEvent};
use crate::aggregator::MemberSet;
use crate::utils::error::ParseError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Star event with its timestamp still in wire form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStarEvent {
    pub starred_at: String,
    pub actor_id: String,
}

/// Repository entry of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRepository {
    pub name: String,
    pub total_star_count: u64,
    #[serde(default)]
    pub events: Vec<RawStarEvent>,
}

/// Organization member entry of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    pub actor_id: String,
}

/// Everything the aggregator needs, exactly as fetched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Organization login, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    pub repositories: Vec<RawRepository>,

    /// Present only when member exclusion was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<RawMember>>,
}

impl Snapshot {
    /// Convert to validated repositories, preserving repository and event order
    ///
    /// # Errors
    /// * `ParseError::MalformedInput` - first event whose timestamp cannot be parsed
    pub fn to_repositories(&self) -> Result<Vec<Repository>, ParseError> {
        self.repositories
            .iter()
            .map(|repo| {
                let events = repo
                    .events
                    .iter()
                    .map(|event| {
                        let starred_at = parse_timestamp(&event.starred_at).ok_or_else(|| {
                            ParseError::MalformedInput {
                                repository: repo.name.clone(),
                                actor: event.actor_id.clone(),
                                value: event.starred_at.clone(),
                            }
                        })?;
                        Ok(StarEvent::new(event.actor_id.clone(), starred_at))
                    })
                    .collect::<Result<Vec<_>, ParseError>>()?;

                Ok(Repository::new(repo.name.clone(), repo.total_star_count, events))
            })
            .collect()
    }

    /// Member logins, if members were part of the snapshot
    pub fn member_set(&self) -> Option<MemberSet> {
        self.members
            .as_ref()
            .map(|members| members.iter().map(|m| m.actor_id.clone()).collect())
    }

    /// Total number of star events across all repositories
    pub fn event_count(&self) -> usize {
        self.repositories.iter().map(|r| r.events.len()).sum()
    }
}

/// Parse an ISO-8601 timestamp into a UTC instant
///
/// Accepts RFC 3339 (`2024-01-08T09:30:00Z`, `2024-01-08T10:30:00+01:00`) and,
/// as GraphQL servers occasionally emit, a naive date-time read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a snapshot from a JSON string
pub fn parse_snapshot(json: &str) -> Result<Snapshot, ParseError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    debug!(
        "Parsed snapshot: {} repositories, {} events",
        snapshot.repositories.len(),
        snapshot.event_count()
    );
    Ok(snapshot)
}

/// Load a snapshot from a JSON file
pub fn load_snapshot(input_path: impl AsRef<Path>) -> Result<Snapshot, ParseError> {
    let input_path = input_path.as_ref();

    info!("Loading snapshot from: {}", input_path.display());

    let file = File::open(input_path)?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;

    debug!(
        "Snapshot loaded: {} repositories, {} events",
        snapshot.repositories.len(),
        snapshot.event_count()
    );

    Ok(snapshot)
}
