//! Organization-wide star metrics.
//!
//! Builds one row per repository (weekly counts, optional non-member counts,
//! trend) and the organization totals. Everything here is a pure function of
//! the repositories and the reference instant passed in.

use super::weeks::{WeekBucketCounts, WeekLabels, WeekWindow};
use crate::parser::schema::{Repository, StarEvent};
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// Logins excluded from the non-member counts
pub type MemberSet = HashSet<String>;

/// Direction of this week's stars compared to last week's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSymbol {
    Up,
    Down,
    Flat,
}

impl TrendSymbol {
    /// Marker shown next to a count on the dashboard
    pub fn symbol(&self) -> &'static str {
        match self {
            TrendSymbol::Up => "💚",
            TrendSymbol::Down => "🔻",
            TrendSymbol::Flat => "",
        }
    }
}

impl fmt::Display for TrendSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Compare two counts
pub fn trend<T: Ord>(current: T, previous: T) -> TrendSymbol {
    match current.cmp(&previous) {
        Ordering::Greater => TrendSymbol::Up,
        Ordering::Less => TrendSymbol::Down,
        Ordering::Equal => TrendSymbol::Flat,
    }
}

/// Events whose actor is not in `excluded`, in input order
pub fn filter_by_exclusion<'a>(events: &'a [StarEvent], excluded: &MemberSet) -> Vec<&'a StarEvent> {
    events
        .iter()
        .filter(|event| !excluded.contains(&event.actor_id))
        .collect()
}

/// Aggregated view of one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRow {
    pub name: String,

    pub total_star_count: u64,

    /// Most recent star in the fetched page
    pub last_starred_at: Option<DateTime<Utc>>,

    pub counts: WeekBucketCounts,

    /// Counts without organization members, when exclusion was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_counts: Option<WeekBucketCounts>,

    /// This week against last week
    pub trend: TrendSymbol,
}

/// Aggregated view of the whole organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    /// ISO weeks the buckets refer to
    pub weeks: WeekLabels,

    /// Sum of every repository's all-time star count
    pub total_stars: u64,

    /// One row per repository, in input order
    pub repositories: Vec<RepositoryRow>,

    pub totals: WeekBucketCounts,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_totals: Option<WeekBucketCounts>,

    /// Summed this week against summed last week
    pub overall_trend: TrendSymbol,
}

impl OrganizationSummary {
    pub fn is_filtered(&self) -> bool {
        self.filtered_totals.is_some()
    }
}

/// Aggregate every repository against the weeks around `reference`
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `repositories` - Repositories with their star events
/// * `reference` - Instant considered "now"; its time zone defines the weeks
/// * `excluded_members` - When given, non-member counts are computed alongside
///
/// # Returns
/// Rows in input order plus organization totals. The overall trend compares
/// summed counts, it is not derived from the per-repository trends.
pub fn aggregate_organization<Tz: TimeZone>(
    repositories: &[Repository],
    reference: &DateTime<Tz>,
    excluded_members: Option<&MemberSet>,
) -> OrganizationSummary {
    debug!(
        "Aggregating {} repositories (member exclusion: {})",
        repositories.len(),
        excluded_members.map_or(0, |m| m.len())
    );

    let window = WeekWindow::anchored_at(reference);

    let rows: Vec<RepositoryRow> = repositories
        .iter()
        .map(|repo| aggregate_repository(repo, &window, excluded_members))
        .collect();

    let totals: WeekBucketCounts = rows.iter().map(|row| row.counts).sum();
    let filtered_totals = excluded_members.map(|_| {
        rows.iter()
            .filter_map(|row| row.filtered_counts)
            .sum::<WeekBucketCounts>()
    });

    OrganizationSummary {
        weeks: window.labels(),
        total_stars: repositories.iter().map(|r| r.total_star_count).sum(),
        overall_trend: trend(totals.this_week, totals.last_week),
        repositories: rows,
        totals,
        filtered_totals,
    }
}

fn aggregate_repository<Tz: TimeZone>(
    repo: &Repository,
    window: &WeekWindow<Tz>,
    excluded_members: Option<&MemberSet>,
) -> RepositoryRow {
    let counts = window.bucket_counts(&repo.events);
    let filtered_counts =
        excluded_members.map(|members| window.bucket_counts(filter_by_exclusion(&repo.events, members)));

    RepositoryRow {
        name: repo.name.clone(),
        total_star_count: repo.total_star_count,
        last_starred_at: repo.last_starred_at(),
        counts,
        filtered_counts,
        trend: trend(counts.this_week, counts.last_week),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn reference() -> DateTime<Utc> {
        // Wednesday, 2024-W02
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn this_week() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 9, 8, 0, 0).unwrap()
    }

    fn last_week() -> DateTime<Utc> {
        this_week() - Duration::weeks(1)
    }

    fn repo_with(name: &str, this: usize, last: usize) -> Repository {
        let mut events = Vec::new();
        for i in 0..this {
            events.push(StarEvent::new(format!("{}-new-{}", name, i), this_week()));
        }
        for i in 0..last {
            events.push(StarEvent::new(format!("{}-old-{}", name, i), last_week()));
        }
        Repository::new(name, (this + last) as u64 + 100, events)
    }

    fn members(logins: &[&str]) -> MemberSet {
        logins.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_trend() {
        assert_eq!(trend(3, 1), TrendSymbol::Up);
        assert_eq!(trend(1, 3), TrendSymbol::Down);
        assert_eq!(trend(0, 0), TrendSymbol::Flat);
        assert_eq!(trend(-2, -5), TrendSymbol::Up);
        assert_eq!(trend(i64::MIN, i64::MAX), TrendSymbol::Down);
    }

    #[test]
    fn test_trend_symbols() {
        assert_eq!(TrendSymbol::Up.to_string(), "💚");
        assert_eq!(TrendSymbol::Down.to_string(), "🔻");
        assert_eq!(TrendSymbol::Flat.to_string(), "");
    }

    #[test]
    fn test_filter_by_exclusion_preserves_order() {
        let events = vec![
            StarEvent::new("alice", this_week()),
            StarEvent::new("bot1", this_week()),
            StarEvent::new("carol", last_week()),
            StarEvent::new("bot1", last_week()),
        ];

        let kept = filter_by_exclusion(&events, &members(&["bot1"]));
        let actors: Vec<&str> = kept.iter().map(|e| e.actor_id.as_str()).collect();

        assert_eq!(actors, vec!["alice", "carol"]);
    }

    #[test]
    fn test_filter_by_exclusion_empty_set_keeps_all() {
        let events = vec![StarEvent::new("alice", this_week())];
        assert_eq!(filter_by_exclusion(&events, &MemberSet::new()).len(), 1);
    }

    #[test]
    fn test_totals_and_flat_overall_trend() {
        let repos = vec![repo_with("a", 5, 2), repo_with("b", 1, 4)];

        let summary = aggregate_organization(&repos, &reference(), None);

        assert_eq!(summary.repositories[0].trend, TrendSymbol::Up);
        assert_eq!(summary.repositories[1].trend, TrendSymbol::Down);
        assert_eq!(summary.totals, WeekBucketCounts::new(6, 6, 0));
        assert_eq!(summary.overall_trend, TrendSymbol::Flat);
        assert_eq!(summary.total_stars, 7 + 100 + 5 + 100);
        assert!(summary.filtered_totals.is_none());
        assert!(!summary.is_filtered());
    }

    #[test]
    fn test_member_exclusion() {
        let repos = vec![Repository::new(
            "stream-chat",
            2,
            vec![
                StarEvent::new("bot1", this_week()),
                StarEvent::new("alice", this_week()),
            ],
        )];

        let summary = aggregate_organization(&repos, &reference(), Some(&members(&["bot1"])));
        let row = &summary.repositories[0];

        assert_eq!(row.counts.this_week, 2);
        assert_eq!(row.filtered_counts.map(|c| c.this_week), Some(1));
        assert_eq!(summary.filtered_totals, Some(WeekBucketCounts::new(1, 0, 0)));
    }

    #[test]
    fn test_preserves_input_order() {
        let repos = vec![repo_with("zeta", 0, 0), repo_with("alpha", 9, 0), repo_with("mid", 1, 1)];
        let summary = aggregate_organization(&repos, &reference(), None);
        let names: Vec<&str> = summary.repositories.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_last_starred_and_empty_repo() {
        let repos = vec![repo_with("busy", 1, 1), Repository::new("quiet", 0, Vec::new())];
        let summary = aggregate_organization(&repos, &reference(), None);

        assert_eq!(summary.repositories[0].last_starred_at, Some(this_week()));
        assert_eq!(summary.repositories[1].last_starred_at, None);
        assert_eq!(summary.repositories[1].counts, WeekBucketCounts::default());
        assert_eq!(summary.repositories[1].trend, TrendSymbol::Flat);
    }

    #[test]
    fn test_empty_organization() {
        let summary = aggregate_organization(&[], &reference(), Some(&MemberSet::new()));
        assert_eq!(summary.totals, WeekBucketCounts::default());
        assert_eq!(summary.filtered_totals, Some(WeekBucketCounts::default()));
        assert_eq!(summary.overall_trend, TrendSymbol::Flat);
        assert_eq!(summary.weeks.this_week, "2024-W02");
    }
}
