//! Classify star timestamps into ISO calendar weeks.
//!
//! Weeks run Monday 00:00:00 to Sunday 23:59:59 in the time zone of the
//! reference instant. Comparison uses the ISO week-year together with the
//! week number, so late-December dates that belong to week 1 of the next
//! year (and early-January dates that belong to week 52/53 of the previous
//! one) land in the right bucket.

use crate::parser::schema::StarEvent;
use chrono::{DateTime, Datelike, Days, IsoWeek, TimeZone};
use log::debug;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// Which reporting bucket a timestamp falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekLabel {
    CurrentWeek,
    PriorWeek,
    TwoWeeksPrior,
    Other,
}

/// Star counts for the three reported weeks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucketCounts {
    pub this_week: u64,
    pub last_week: u64,
    pub two_weeks_ago: u64,
}

impl WeekBucketCounts {
    pub fn new(this_week: u64, last_week: u64, two_weeks_ago: u64) -> Self {
        Self {
            this_week,
            last_week,
            two_weeks_ago,
        }
    }

    /// Stars counted across all three weeks
    pub fn total(&self) -> u64 {
        self.this_week + self.last_week + self.two_weeks_ago
    }

    fn record(mut self, label: WeekLabel) -> Self {
        match label {
            WeekLabel::CurrentWeek => self.this_week += 1,
            WeekLabel::PriorWeek => self.last_week += 1,
            WeekLabel::TwoWeeksPrior => self.two_weeks_ago += 1,
            WeekLabel::Other => {}
        }
        self
    }
}

impl Add for WeekBucketCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            this_week: self.this_week + other.this_week,
            last_week: self.last_week + other.last_week,
            two_weeks_ago: self.two_weeks_ago + other.two_weeks_ago,
        }
    }
}

impl Sum for WeekBucketCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// The three ISO weeks reported relative to a reference instant
///
/// Built once per aggregation so every event is compared against the same
/// weeks. The earlier weeks are found by stepping back on the calendar date,
/// not by subtracting hours, so a daylight-saving change in the reference
/// time zone cannot skip or repeat a week.
#[derive(Debug, Clone)]
pub struct WeekWindow<Tz: TimeZone> {
    tz: Tz,
    current: IsoWeek,
    prior: Option<IsoWeek>,
    two_prior: Option<IsoWeek>,
}

impl<Tz: TimeZone> WeekWindow<Tz> {
    pub fn anchored_at(reference: &DateTime<Tz>) -> Self {
        let date = reference.date_naive();
        let weeks_back = |n: u64| date.checked_sub_days(Days::new(7 * n)).map(|d| d.iso_week());

        Self {
            tz: reference.timezone(),
            current: date.iso_week(),
            prior: weeks_back(1),
            two_prior: weeks_back(2),
        }
    }

    /// Bucket for `timestamp`, viewed in the reference time zone
    pub fn classify<Tz2: TimeZone>(&self, timestamp: &DateTime<Tz2>) -> WeekLabel {
        let week = timestamp.with_timezone(&self.tz).iso_week();

        if week == self.current {
            WeekLabel::CurrentWeek
        } else if Some(week) == self.prior {
            WeekLabel::PriorWeek
        } else if Some(week) == self.two_prior {
            WeekLabel::TwoWeeksPrior
        } else {
            WeekLabel::Other
        }
    }

    pub fn bucket_counts<'a>(&self, events: impl IntoIterator<Item = &'a StarEvent>) -> WeekBucketCounts {
        events
            .into_iter()
            .map(|event| self.classify(&event.starred_at))
            .fold(WeekBucketCounts::default(), WeekBucketCounts::record)
    }

    /// `YYYY-Www` labels for this week, last week and two weeks ago
    pub fn labels(&self) -> WeekLabels {
        WeekLabels {
            this_week: format_iso_week(Some(self.current)),
            last_week: format_iso_week(self.prior),
            two_weeks_ago: format_iso_week(self.two_prior),
        }
    }
}

/// Human-readable names of the reported weeks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLabels {
    pub this_week: String,
    pub last_week: String,
    pub two_weeks_ago: String,
}

fn format_iso_week(week: Option<IsoWeek>) -> String {
    match week {
        Some(w) => format!("{}-W{:02}", w.year(), w.week()),
        None => "n/a".to_string(),
    }
}

/// Classify a single timestamp against the weeks around `reference`
pub fn classify_week<Tz, Tz2>(reference: &DateTime<Tz>, timestamp: &DateTime<Tz2>) -> WeekLabel
where
    Tz: TimeZone,
    Tz2: TimeZone,
{
    WeekWindow::anchored_at(reference).classify(timestamp)
}

/// Count events per reported week; events outside the three weeks are ignored
pub fn bucket_counts<'a, Tz: TimeZone>(
    events: impl IntoIterator<Item = &'a StarEvent>,
    reference: &DateTime<Tz>,
) -> WeekBucketCounts {
    let counts = WeekWindow::anchored_at(reference).bucket_counts(events);
    debug!(
        "Bucketed stars: {} this week, {} last week, {} two weeks ago",
        counts.this_week, counts.last_week, counts.two_weeks_ago
    );
    counts
}
