//! Org Stars
//!
//! Weekly star activity for a GitHub organization's repositories.
//!
//! The core is [`aggregator`]: given repositories with their star events and
//! an explicit reference instant, it counts stars in the current ISO week,
//! the week before and the week before that, optionally without the
//! organization's own members, and compares this week against last week.
//! The other modules fetch the data, validate it and print it.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install org-stars
//! GITHUB_TOKEN=... org-stars report --org getstream
//! ```

pub mod aggregator;
pub mod commands;
pub mod graphql;
pub mod output;
pub mod parser;
pub mod utils;
