//! Aggregation of star events into weekly counts and trends.
//!
//! This module transforms repository snapshots into:
//! - Per-week star counts (this week, last week, two weeks ago)
//! - Non-member counts when organization members are excluded
//! - Trend indicators per repository and for the organization

pub mod weeks;
pub mod metrics;

// Re-export main types and functions
pub use weeks::{bucket_counts, classify_week, WeekBucketCounts, WeekLabel, WeekLabels, WeekWindow};
pub use metrics::{
    aggregate_organization, filter_by_exclusion, trend, MemberSet, OrganizationSummary, RepositoryRow,
    TrendSymbol,
};
