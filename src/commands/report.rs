//! Report command implementation.
//!
//! The report command:
//! 1. Resolves the reference instant
//! 2. Loads a snapshot (GraphQL API or file)
//! 3. Validates star timestamps
//! 4. Aggregates weekly counts
//! 5. Prints the table and writes the JSON report

use super::models::{DataSource, ReportArgs};
use crate::aggregator::{aggregate_organization, MemberSet, OrganizationSummary};
use crate::graphql::GraphQlClient;
use crate::output::{render_table, write_report};
use crate::parser::{load_snapshot, Report, Repository, Snapshot};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * GraphQL request failures
/// * Snapshot files that cannot be read
/// * Star timestamps that cannot be parsed (`MalformedInput`)
/// * File write errors
pub fn execute_report(args: ReportArgs) -> Result<Report> {
    let start_time = Instant::now();

    // Step 1: Anchor the weeks
    let reference = resolve_reference(args.reference, args.local_time);
    info!("Step 1/5: Reference instant: {}", reference.fixed_offset().to_rfc3339());

    // Step 2: Load snapshot
    info!("Step 2/5: Loading repository snapshot...");
    let snapshot = load(&args.source, args.exclude_members)?;

    debug!(
        "Snapshot: {} repositories, {} star events",
        snapshot.repositories.len(),
        snapshot.event_count()
    );

    // Step 3: Validate timestamps
    info!("Step 3/5: Validating star timestamps...");
    let repositories = snapshot
        .to_repositories()
        .context("Snapshot contains malformed star data")?;

    let members = if args.exclude_members {
        let members = snapshot
            .member_set()
            .context("Member exclusion requested but the snapshot has no members")?;
        info!("Excluding {} organization members", members.len());
        Some(members)
    } else {
        None
    };

    // Step 4: Aggregate
    info!("Step 4/5: Aggregating weekly counts...");
    let summary = reference.aggregate(&repositories, members.as_ref());

    info!(
        "This week: {}, last week: {}, two weeks ago: {}",
        summary.totals.this_week, summary.totals.last_week, summary.totals.two_weeks_ago
    );

    let organization = match (&args.source, &snapshot.organization) {
        (DataSource::GraphQl { organization, .. }, _) => organization.clone(),
        (DataSource::Snapshot(_), Some(organization)) => organization.clone(),
        (DataSource::Snapshot(path), None) => {
            warn!("Snapshot {} does not name its organization", path.display());
            "unknown".to_string()
        }
    };

    let report = Report {
        version: SCHEMA_VERSION.to_string(),
        organization,
        reference_instant: reference.fixed_offset(),
        generated_at: Utc::now().to_rfc3339(),
        summary,
    };

    // Step 5: Outputs
    info!("Step 5/5: Writing outputs...");

    if args.print_table {
        println!(
            "\n{}",
            render_table(
                &report.summary,
                reference.utc(),
                args.sort_key,
                args.sort_order
            )
        );
    }

    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Fetch or read the snapshot
///
/// **Private** - internal helper for execute_report
fn load(source: &DataSource, include_members: bool) -> Result<Snapshot> {
    match source {
        DataSource::GraphQl {
            endpoint,
            organization,
            token,
        } => {
            if token.is_none() {
                warn!("No API token given; GitHub rejects unauthenticated GraphQL requests");
            }
            let client = GraphQlClient::new(endpoint.clone(), token.clone())
                .context("Failed to create GraphQL client")?;
            client
                .fetch_snapshot(organization, include_members)
                .with_context(|| format!("Failed to fetch stargazers for {}", organization))
        }
        DataSource::Snapshot(path) => {
            load_snapshot(path).with_context(|| format!("Failed to read snapshot {}", path.display()))
        }
    }
}

/// The instant considered "now", together with the time zone its weeks are read in
///
/// `Local` keeps the system time zone rules, so a daylight-saving change
/// between the reference and an event still moves the event's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceInstant {
    /// `--at` value, weeks follow its offset
    Fixed(DateTime<FixedOffset>),
    Local(DateTime<Local>),
    Utc(DateTime<Utc>),
}

impl ReferenceInstant {
    /// Offset form stored in the report
    pub fn fixed_offset(&self) -> DateTime<FixedOffset> {
        match self {
            ReferenceInstant::Fixed(dt) => *dt,
            ReferenceInstant::Local(dt) => dt.fixed_offset(),
            ReferenceInstant::Utc(dt) => dt.fixed_offset(),
        }
    }

    pub fn utc(&self) -> DateTime<Utc> {
        match self {
            ReferenceInstant::Fixed(dt) => dt.with_timezone(&Utc),
            ReferenceInstant::Local(dt) => dt.with_timezone(&Utc),
            ReferenceInstant::Utc(dt) => *dt,
        }
    }

    /// Aggregate with week boundaries in this instant's own time zone
    pub fn aggregate(&self, repositories: &[Repository], members: Option<&MemberSet>) -> OrganizationSummary {
        match self {
            ReferenceInstant::Fixed(dt) => aggregate_organization(repositories, dt, members),
            ReferenceInstant::Local(dt) => aggregate_organization(repositories, dt, members),
            ReferenceInstant::Utc(dt) => aggregate_organization(repositories, dt, members),
        }
    }
}

/// The instant considered "now"
///
/// An explicit reference keeps its own offset; otherwise the current time in
/// UTC, or in the local time zone when requested.
pub fn resolve_reference(reference: Option<DateTime<FixedOffset>>, local_time: bool) -> ReferenceInstant {
    match reference {
        Some(reference) => ReferenceInstant::Fixed(reference),
        None if local_time => ReferenceInstant::Local(Local::now()),
        None => ReferenceInstant::Utc(Utc::now()),
    }
}

/// Parse a `--at` value: RFC 3339, or a bare date meaning midnight UTC
pub fn parse_reference_instant(value: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
        .ok_or_else(|| format!("'{}' is not an RFC 3339 timestamp or YYYY-MM-DD date", value))
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    match &args.source {
        DataSource::GraphQl {
            endpoint,
            organization,
            ..
        } => {
            if endpoint.is_empty() {
                anyhow::bail!("GraphQL endpoint cannot be empty");
            }

            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                anyhow::bail!("GraphQL endpoint must start with http:// or https://");
            }

            validate_organization(organization)?;
        }
        DataSource::Snapshot(path) => {
            if path.as_os_str().is_empty() {
                anyhow::bail!("Snapshot path cannot be empty");
            }
        }
    }

    Ok(())
}

/// GitHub logins: 1-39 alphanumerics or single hyphens, no leading/trailing hyphen
fn validate_organization(organization: &str) -> Result<()> {
    if organization.is_empty() {
        anyhow::bail!("Organization cannot be empty");
    }

    if organization.len() > 39 {
        anyhow::bail!("Organization login is too long (max 39 characters)");
    }

    if !organization.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        || organization.starts_with('-')
        || organization.ends_with('-')
        || organization.contains("--")
    {
        anyhow::bail!("Organization login contains invalid characters: {}", organization);
    }

    Ok(())
}
