//! GraphQL communication with the GitHub API.

pub mod client;
pub mod types;

pub use client::GraphQlClient;
