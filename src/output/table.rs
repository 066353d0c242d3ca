//! Plain-text star table.
//!
//! Renders the organization headline and one line per repository. Sorting
//! happens on a view of the rows; the summary itself is never reordered.

use crate::aggregator::{OrganizationSummary, RepositoryRow};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::cmp::Ordering;

/// Column to sort the table by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Keep the order the API returned (most starred first)
    #[default]
    Input,
    Name,
    Stars,
    ThisWeek,
    LastWeek,
    TwoWeeksAgo,
    /// Non-member stars this week
    NonMembers,
    LastStarred,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Rows of `summary` ordered by `key`; ties keep input order
pub fn sorted_rows(summary: &OrganizationSummary, key: SortKey, order: SortOrder) -> Vec<&RepositoryRow> {
    let mut rows: Vec<&RepositoryRow> = summary.repositories.iter().collect();

    if key == SortKey::Input {
        return rows;
    }

    rows.sort_by(|a, b| {
        let ordering = compare_rows(a, b, key);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });

    rows
}

fn compare_rows(a: &RepositoryRow, b: &RepositoryRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Input => Ordering::Equal,
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Stars => a.total_star_count.cmp(&b.total_star_count),
        SortKey::ThisWeek => a.counts.this_week.cmp(&b.counts.this_week),
        SortKey::LastWeek => a.counts.last_week.cmp(&b.counts.last_week),
        SortKey::TwoWeeksAgo => a.counts.two_weeks_ago.cmp(&b.counts.two_weeks_ago),
        SortKey::NonMembers => {
            let non_members = |row: &RepositoryRow| row.filtered_counts.map(|c| c.this_week);
            non_members(a).cmp(&non_members(b))
        }
        // Never starred sorts as oldest
        SortKey::LastStarred => a.last_starred_at.cmp(&b.last_starred_at),
    }
}

/// Render the headline totals and the repository table
///
/// **Public** - main entry point for text output
///
/// # Arguments
/// * `summary` - Aggregated counts
/// * `now` - Instant "Last Starred" is measured from
/// * `key`, `order` - Display order of the rows
pub fn render_table(
    summary: &OrganizationSummary,
    now: DateTime<Utc>,
    key: SortKey,
    order: SortOrder,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} stars\n", summary.total_stars));
    out.push_str(&format!(
        "This Week ({}): +{}{}\n",
        summary.weeks.this_week, summary.totals.this_week, summary.overall_trend
    ));
    out.push_str(&format!(
        "Last Week ({}): +{}\n",
        summary.weeks.last_week, summary.totals.last_week
    ));
    out.push_str(&format!(
        "Two Weeks Ago ({}): +{}\n",
        summary.weeks.two_weeks_ago, summary.totals.two_weeks_ago
    ));
    if let Some(filtered) = summary.filtered_totals {
        out.push_str(&format!(
            "Non-members: +{} / +{} / +{}\n",
            filtered.this_week, filtered.last_week, filtered.two_weeks_ago
        ));
    }
    out.push('\n');

    let mut header = vec!["Name", "Stars", "This Week", "Last Week", "Two Weeks Ago"];
    if summary.is_filtered() {
        header.push("Non-members");
    }
    header.push("Last Starred");

    let body: Vec<Vec<String>> = sorted_rows(summary, key, order)
        .into_iter()
        .map(|row| {
            let mut cells = vec![
                row.name.clone(),
                row.total_star_count.to_string(),
                format!("{}{}", row.counts.this_week, row.trend),
                row.counts.last_week.to_string(),
                row.counts.two_weeks_ago.to_string(),
            ];
            if summary.is_filtered() {
                cells.push(
                    row.filtered_counts
                        .map(|c| c.this_week.to_string())
                        .unwrap_or_default(),
                );
            }
            cells.push(match row.last_starred_at {
                Some(at) => humanize_since(now, at),
                None => "Never".to_string(),
            });
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| display_width(h)).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(display_width(cell));
        }
    }

    write_line(&mut out, header.iter().copied(), &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, separator.iter().map(String::as_str), &widths);
    for cells in &body {
        write_line(&mut out, cells.iter().map(String::as_str), &widths);
    }

    out
}

fn write_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        let padding = width.saturating_sub(display_width(cell));
        out.push_str(&format!(" {}{} |", cell, " ".repeat(padding)));
    }
    out.push('\n');
}

/// Terminal columns taken by `s`; the trend emoji are double width
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if c as u32 >= 0x1F000 { 2 } else { 1 }).sum()
}

/// Describe how long ago `then` was, e.g. "3 days ago" or "in 2 hours"
pub fn humanize_since(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let seconds = delta.num_seconds().unsigned_abs();
    let minutes = (seconds + 30) / 60;
    let hours = (minutes + 30) / 60;
    let days = (hours + 12) / 24;

    let phrase = if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days)
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", (days + 15) / 30)
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", (days + 182) / 365)
    };

    if delta.num_seconds() < 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{TrendSymbol, WeekBucketCounts, WeekLabels};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap()
    }

    fn row(name: &str, stars: u64, counts: WeekBucketCounts, last: Option<DateTime<Utc>>) -> RepositoryRow {
        RepositoryRow {
            name: name.to_string(),
            total_star_count: stars,
            last_starred_at: last,
            counts,
            filtered_counts: None,
            trend: crate::aggregator::trend(counts.this_week, counts.last_week),
        }
    }

    fn summary() -> OrganizationSummary {
        let repositories = vec![
            row("beta", 50, WeekBucketCounts::new(5, 2, 1), Some(now() - Duration::days(3))),
            row("Alpha", 900, WeekBucketCounts::new(1, 4, 0), Some(now() - Duration::hours(2))),
            row("gamma", 10, WeekBucketCounts::new(0, 0, 0), None),
        ];
        OrganizationSummary {
            weeks: WeekLabels {
                this_week: "2024-W02".to_string(),
                last_week: "2024-W01".to_string(),
                two_weeks_ago: "2023-W52".to_string(),
            },
            total_stars: 960,
            totals: WeekBucketCounts::new(6, 6, 1),
            filtered_totals: None,
            overall_trend: TrendSymbol::Flat,
            repositories,
        }
    }

    fn names(rows: &[&RepositoryRow]) -> Vec<String> {
        rows.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_sort_input_order() {
        let s = summary();
        assert_eq!(names(&sorted_rows(&s, SortKey::Input, SortOrder::Descending)), ["beta", "Alpha", "gamma"]);
    }

    #[test]
    fn test_sort_by_columns() {
        let s = summary();
        assert_eq!(names(&sorted_rows(&s, SortKey::Name, SortOrder::Ascending)), ["Alpha", "beta", "gamma"]);
        assert_eq!(names(&sorted_rows(&s, SortKey::Stars, SortOrder::Descending)), ["Alpha", "beta", "gamma"]);
        assert_eq!(names(&sorted_rows(&s, SortKey::ThisWeek, SortOrder::Descending)), ["beta", "Alpha", "gamma"]);
        assert_eq!(names(&sorted_rows(&s, SortKey::LastWeek, SortOrder::Ascending)), ["gamma", "beta", "Alpha"]);
        assert_eq!(names(&sorted_rows(&s, SortKey::LastStarred, SortOrder::Descending)), ["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_sort_does_not_touch_summary() {
        let s = summary();
        let before = s.clone();
        let _ = sorted_rows(&s, SortKey::Stars, SortOrder::Ascending);
        assert_eq!(s, before);
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&summary(), now(), SortKey::Input, SortOrder::Descending);

        assert!(table.starts_with("960 stars\n"));
        assert!(table.contains("This Week (2024-W02): +6\n"));
        assert!(table.contains("Last Week (2024-W01): +6\n"));
        assert!(table.contains("| 5💚 "));
        assert!(table.contains("| 1🔻 "));
        assert!(table.contains("3 days ago"));
        assert!(table.contains("2 hours ago"));
        assert!(table.contains("Never"));
        assert!(!table.contains("Non-members"));
    }

    #[test]
    fn test_render_filtered_column() {
        let mut s = summary();
        s.filtered_totals = Some(WeekBucketCounts::new(4, 6, 1));
        s.repositories[0].filtered_counts = Some(WeekBucketCounts::new(4, 2, 1));
        s.repositories[1].filtered_counts = Some(WeekBucketCounts::new(0, 4, 0));
        s.repositories[2].filtered_counts = Some(WeekBucketCounts::default());

        let table = render_table(&s, now(), SortKey::NonMembers, SortOrder::Descending);

        assert!(table.contains("Non-members: +4 / +6 / +1"));
        assert!(table.contains("| Non-members |"));
        let beta = table.find("| beta").unwrap();
        let alpha = table.find("| Alpha").unwrap();
        assert!(beta < alpha);
    }

    #[test]
    fn test_headline_and_row_text() {
        let mut s = summary();
        s.filtered_totals = Some(WeekBucketCounts::new(4, 6, 1));
        let table = render_table(&s, now(), SortKey::Input, SortOrder::Descending);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(
            lines[..6],
            [
                "960 stars",
                "This Week (2024-W02): +6",
                "Last Week (2024-W01): +6",
                "Two Weeks Ago (2023-W52): +1",
                "Non-members: +4 / +6 / +1",
                "",
            ]
        );
        assert!(lines[6].starts_with("| Name  | Stars | This Week |"));
        assert!(lines[7].starts_with("| ----- | ----- | --------- |"));
        assert!(table.ends_with("|\n"));
    }

    #[test]
    fn test_columns_align() {
        let table = render_table(&summary(), now(), SortKey::Input, SortOrder::Descending);
        let widths: Vec<usize> = table
            .lines()
            .filter(|l| l.starts_with('|'))
            .map(display_width)
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_humanize_since() {
        let n = now();
        assert_eq!(humanize_since(n, n - Duration::seconds(10)), "a few seconds ago");
        assert_eq!(humanize_since(n, n - Duration::seconds(60)), "a minute ago");
        assert_eq!(humanize_since(n, n - Duration::minutes(5)), "5 minutes ago");
        assert_eq!(humanize_since(n, n - Duration::minutes(60)), "an hour ago");
        assert_eq!(humanize_since(n, n - Duration::hours(5)), "5 hours ago");
        assert_eq!(humanize_since(n, n - Duration::hours(30)), "a day ago");
        assert_eq!(humanize_since(n, n - Duration::days(3)), "3 days ago");
        assert_eq!(humanize_since(n, n - Duration::days(30)), "a month ago");
        assert_eq!(humanize_since(n, n - Duration::days(90)), "3 months ago");
        assert_eq!(humanize_since(n, n - Duration::days(400)), "a year ago");
        assert_eq!(humanize_since(n, n - Duration::days(1100)), "3 years ago");
        assert_eq!(humanize_since(n, n + Duration::hours(2)), "in 2 hours");
    }
}
