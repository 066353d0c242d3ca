use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;
    let summary = &report.summary;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Organization: {}", report.organization);
    println!("  Reference: {}", report.reference_instant.to_rfc3339());
    println!("  Repositories: {}", summary.repositories.len());
    println!("  Total Stars: {}", summary.total_stars);
    println!(
        "  This Week: +{}{}  Last Week: +{}  Two Weeks Ago: +{}",
        summary.totals.this_week,
        summary.overall_trend,
        summary.totals.last_week,
        summary.totals.two_weeks_ago
    );
    if let Some(filtered) = summary.filtered_totals {
        println!("  Non-member This Week: +{}", filtered.this_week);
    }

    if report.version != SCHEMA_VERSION {
        println!("  ! Schema version differs from current ({})", SCHEMA_VERSION);
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Org Stars Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string              - Schema version (e.g., '1.0.0')");
        println!("  organization: string         - Organization login");
        println!("  reference_instant: string    - RFC 3339 instant the weeks are anchored to");
        println!("  generated_at: string         - ISO 8601 timestamp");
        println!("  summary: object");
        println!("    weeks: object              - ISO week labels (this_week, last_week, two_weeks_ago)");
        println!("    total_stars: number        - All-time stars across repositories");
        println!("    repositories: array");
        println!("      name: string");
        println!("      total_star_count: number");
        println!("      last_starred_at: string? - Most recent star");
        println!("      counts: object           - this_week, last_week, two_weeks_ago");
        println!("      filtered_counts: object? - Counts without organization members");
        println!("      trend: string            - up | down | flat");
        println!("    totals: object             - Sum of repository counts");
        println!("    filtered_totals: object?   - Sum of filtered counts");
        println!("    overall_trend: string      - Summed this week vs last week");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Org Stars v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Weekly star activity for a GitHub organization's repositories.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_report() {
        assert!(validate_report_file(PathBuf::from("/no/such/report.json")).is_err());
    }
}
