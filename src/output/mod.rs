//! Output writers for star reports.
//!
//! This module handles:
//! - JSON reports on disk
//! - The text table printed to stdout

pub mod json;
pub mod table;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use table::{humanize_since, render_table, sorted_rows, SortKey, SortOrder};
