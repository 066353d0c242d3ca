//! HTTP client for the GitHub GraphQL endpoint.
//!
//! One request per query, one page per connection. Failures are returned to
//! the caller as they happen; nothing is retried.

use super::types::{
    GraphQlErrorMessage, GraphQlRequest, GraphQlResponse, MembersData, StargazersData,
    MEMBERS_QUERY, STARGAZERS_QUERY,
};
use crate::parser::snapshot::{RawMember, RawRepository, Snapshot};
use crate::utils::config::{
    DEFAULT_REQUEST_TIMEOUT, MEMBER_PAGE_SIZE, REPOSITORY_PAGE_SIZE, STARGAZER_PAGE_SIZE, USER_AGENT,
};
use crate::utils::error::GraphQlError;
use log::{debug, info};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

/// GraphQL client for fetching stargazer data
pub struct GraphQlClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl GraphQlClient {
    /// Create a new client; `token` is sent as a bearer token when present
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self, GraphQlError> {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(GraphQlError::RequestFailed)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }

    /// Fetch the organization's repositories and their most recent stargazers
    pub fn fetch_stargazers(&self, organization: &str) -> Result<Vec<RawRepository>, GraphQlError> {
        info!("Fetching stargazers for organization: {}", organization);

        let variables = serde_json::json!({
            "login": organization,
            "repositories": REPOSITORY_PAGE_SIZE,
            "stargazers": STARGAZER_PAGE_SIZE,
        });

        let data: StargazersData = self.execute(STARGAZERS_QUERY, variables, organization)?;
        let org = data
            .organization
            .ok_or_else(|| GraphQlError::OrganizationNotFound(organization.to_string()))?;

        let repositories: Vec<RawRepository> =
            org.repositories.nodes.into_iter().map(Into::into).collect();

        debug!("Fetched {} repositories", repositories.len());

        Ok(repositories)
    }

    /// Fetch the logins of the organization's members
    pub fn fetch_members(&self, organization: &str) -> Result<Vec<RawMember>, GraphQlError> {
        info!("Fetching members of organization: {}", organization);

        let variables = serde_json::json!({
            "login": organization,
            "members": MEMBER_PAGE_SIZE,
        });

        let data: MembersData = self.execute(MEMBERS_QUERY, variables, organization)?;
        let org = data
            .organization
            .ok_or_else(|| GraphQlError::OrganizationNotFound(organization.to_string()))?;

        let members: Vec<RawMember> = org.members_with_role.nodes.into_iter().map(Into::into).collect();

        debug!("Fetched {} members", members.len());

        Ok(members)
    }

    /// Fetch everything the aggregator needs in one snapshot
    pub fn fetch_snapshot(&self, organization: &str, include_members: bool) -> Result<Snapshot, GraphQlError> {
        let repositories = self.fetch_stargazers(organization)?;
        let members = if include_members {
            Some(self.fetch_members(organization)?)
        } else {
            None
        };

        Ok(Snapshot {
            organization: Some(organization.to_string()),
            repositories,
            members,
        })
    }

    /// Post a query and unwrap the GraphQL envelope
    fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        organization: &str,
    ) -> Result<T, GraphQlError> {
        let request = GraphQlRequest { query, variables };

        debug!("GraphQL variables: {}", request.variables);

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().map_err(GraphQlError::RequestFailed)?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(GraphQlError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let body: GraphQlResponse<T> = response.json().map_err(GraphQlError::RequestFailed)?;

        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            return Err(map_graphql_errors(&errors, organization));
        }

        body.data
            .ok_or_else(|| GraphQlError::InvalidResponse("Missing data field".to_string()))
    }
}

/// Map GraphQL errors to our error type
fn map_graphql_errors(errors: &[GraphQlErrorMessage], organization: &str) -> GraphQlError {
    if errors.iter().any(|e| e.kind.as_deref() == Some("NOT_FOUND")) {
        return GraphQlError::OrganizationNotFound(organization.to_string());
    }

    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    GraphQlError::QueryFailed(messages.join("; "))
}
