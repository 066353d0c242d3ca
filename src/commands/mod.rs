//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod report;
pub mod utils;

// Re-export main command functions
pub use models::{DataSource, ReportArgs};
pub use report::{
    execute_report, parse_reference_instant, resolve_reference, validate_args, ReferenceInstant,
};
pub use utils::{display_schema, display_version, validate_report_file};
