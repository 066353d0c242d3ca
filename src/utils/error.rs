//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while talking to the GraphQL API
#[derive(Error, Debug)]
pub enum GraphQlError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid GraphQL response: {0}")]
    InvalidResponse(String),

    #[error("GraphQL query failed: {0}")]
    QueryFailed(String),

    #[error("Organization not found: {0}")]
    OrganizationNotFound(String),
}

/// Errors that can occur while reading a repository snapshot
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The upstream collaborator delivered a timestamp that is not an instant
    #[error("Malformed input in repository '{repository}': star by '{actor}' has unparseable timestamp '{value}'")]
    MalformedInput {
        repository: String,
        actor: String,
        value: String,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
