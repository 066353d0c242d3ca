use crate::output::{SortKey, SortOrder};
use crate::utils::config::{DEFAULT_GRAPHQL_ENDPOINT, DEFAULT_ORGANIZATION};
use chrono::{DateTime, FixedOffset};
use std::path::PathBuf;

/// Where the repository snapshot comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Query the GraphQL API
    GraphQl {
        endpoint: String,
        organization: String,
        /// Bearer token forwarded as-is
        token: Option<String>,
    },

    /// Read a snapshot JSON file
    Snapshot(PathBuf),
}

/// Arguments for the report and aggregate commands
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Source of repositories and star events
    pub source: DataSource,

    /// Also count stars from non-members only
    pub exclude_members: bool,

    /// Instant the weeks are anchored to (None = now)
    pub reference: Option<DateTime<FixedOffset>>,

    /// Use the local time zone for "now" instead of UTC
    pub local_time: bool,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Table ordering
    pub sort_key: SortKey,
    pub sort_order: SortOrder,

    /// Print the table to stdout
    pub print_table: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            source: DataSource::GraphQl {
                endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
                organization: DEFAULT_ORGANIZATION.to_string(),
                token: None,
            },
            exclude_members: false,
            reference: None,
            local_time: false,
            output_json: None,
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            print_table: true,
        }
    }
}
