//! Types for GraphQL communication with the GitHub API.
//!
//! Response structs mirror the two queries below field for field; they are
//! converted into snapshot types before anything else looks at them.

use crate::parser::snapshot::{RawMember, RawRepository, RawStarEvent};
use serde::{Deserialize, Serialize};

/// Public, owned, non-fork repositories with their latest stargazers
pub const STARGAZERS_QUERY: &str = r#"
query OrganizationStargazers($login: String!, $repositories: Int!, $stargazers: Int!) {
  organization(login: $login) {
    repositories(first: $repositories, isFork: false, isLocked: false, privacy: PUBLIC, ownerAffiliations: [OWNER], orderBy: {field: STARGAZERS, direction: DESC}) {
      nodes {
        name
        stargazers(first: $stargazers, orderBy: {field: STARRED_AT, direction: DESC}) {
          totalCount
          edges {
            starredAt
            node {
              login
            }
          }
        }
      }
    }
  }
}
"#;

/// Logins of the organization's members
pub const MEMBERS_QUERY: &str = r#"
query OrganizationMembers($login: String!, $members: Int!) {
  organization(login: $login) {
    membersWithRole(first: $members) {
      nodes {
        login
      }
    }
  }
}
"#;

/// GraphQL request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlErrorMessage>>,
}

/// Entry of the GraphQL `errors` array
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorMessage {
    pub message: String,
    /// GitHub sets this to e.g. `NOT_FOUND`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StargazersData {
    pub organization: Option<OrganizationRepositories>,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationRepositories {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Vec<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryNode {
    pub name: String,
    pub stargazers: StargazerConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerConnection {
    pub total_count: u64,
    #[serde(default)]
    pub edges: Vec<StargazerEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerEdge {
    pub starred_at: String,
    pub node: ActorNode,
}

#[derive(Debug, Deserialize)]
pub struct ActorNode {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct MembersData {
    pub organization: Option<OrganizationMembers>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMembers {
    pub members_with_role: MemberConnection,
}

#[derive(Debug, Deserialize)]
pub struct MemberConnection {
    #[serde(default)]
    pub nodes: Vec<ActorNode>,
}

impl From<RepositoryNode> for RawRepository {
    fn from(node: RepositoryNode) -> Self {
        RawRepository {
            name: node.name,
            total_star_count: node.stargazers.total_count,
            events: node
                .stargazers
                .edges
                .into_iter()
                .map(|edge| RawStarEvent {
                    starred_at: edge.starred_at,
                    actor_id: edge.node.login,
                })
                .collect(),
        }
    }
}

impl From<ActorNode> for RawMember {
    fn from(node: ActorNode) -> Self {
        RawMember { actor_id: node.login }
    }
}
