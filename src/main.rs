//! Org Stars CLI
//!
//! Weekly star activity dashboard for a GitHub organization.
//! Prints a sortable table and optionally writes a JSON report.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use org_stars::commands::{
    display_schema, display_version, execute_report, parse_reference_instant, validate_args,
    validate_report_file, DataSource, ReportArgs,
};
use org_stars::output::{SortKey, SortOrder};
use org_stars::utils::config::{DEFAULT_GRAPHQL_ENDPOINT, DEFAULT_ORGANIZATION, TOKEN_ENV_VAR};

/// Org Stars - weekly star activity for a GitHub organization
#[derive(Parser, Debug)]
#[command(name = "org-stars")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Options shared by the report and aggregate commands
#[derive(Args, Debug)]
struct AggregationOptions {
    /// Also count stars from non-members only
    #[arg(long)]
    exclude_members: bool,

    /// Reference instant (RFC 3339 or YYYY-MM-DD); defaults to now
    #[arg(long, value_parser = parse_reference_instant)]
    at: Option<DateTime<FixedOffset>>,

    /// Use the local time zone for week boundaries when --at is not given
    #[arg(long)]
    local: bool,

    /// Output path for JSON report (optional)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Column to sort the table by
    #[arg(long, value_enum, default_value_t = SortKey::Input)]
    sort: SortKey,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = SortOrder::Descending)]
    order: SortOrder,

    /// Do not print the table
    #[arg(long)]
    quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch star history from the GraphQL API and report it
    Report {
        /// Organization login
        #[arg(long, default_value = DEFAULT_ORGANIZATION)]
        org: String,

        /// GraphQL endpoint URL
        #[arg(short, long, default_value = DEFAULT_GRAPHQL_ENDPOINT)]
        endpoint: String,

        /// API token sent as a bearer token
        #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
        token: Option<String>,

        #[command(flatten)]
        options: AggregationOptions,
    },

    /// Report on a previously fetched snapshot file
    Aggregate {
        /// Path to snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        #[command(flatten)]
        options: AggregationOptions,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Report {
            org,
            endpoint,
            token,
            options,
        } => {
            let source = DataSource::GraphQl {
                endpoint,
                organization: org,
                token,
            };
            run_report(source, options)?;
        }

        Commands::Aggregate { snapshot, options } => {
            run_report(DataSource::Snapshot(snapshot), options)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

fn run_report(source: DataSource, options: AggregationOptions) -> Result<()> {
    let args = ReportArgs {
        source,
        exclude_members: options.exclude_members,
        reference: options.at,
        local_time: options.local,
        output_json: options.output,
        sort_key: options.sort,
        sort_order: options.order,
        print_table: !options.quiet,
    };

    // Validate args first
    validate_args(&args)?;

    execute_report(args)?;

    Ok(())
}
