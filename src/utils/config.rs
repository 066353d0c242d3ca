//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for GraphQL requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// GitHub's GraphQL endpoint
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// Organization queried when none is given on the command line
pub const DEFAULT_ORGANIZATION: &str = "getstream";

// GitHub caps connection pages at 100 nodes; we fetch one page and stop
pub const REPOSITORY_PAGE_SIZE: u32 = 100;
pub const STARGAZER_PAGE_SIZE: u32 = 100;
pub const MEMBER_PAGE_SIZE: u32 = 100;

/// GitHub rejects GraphQL requests without a User-Agent
pub const USER_AGENT: &str = concat!("org-stars/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the bearer token forwarded to the API
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
