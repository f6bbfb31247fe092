//! Remote hosting-service abstraction
//!
//! Every classroom operation goes through the [`Forge`] trait so the command
//! flows can run against GitHub or against an in-memory fake in tests.

pub mod github;
#[cfg(test)]
pub mod memory;

pub use github::GithubClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File mode for regular (non-executable) blobs in a tree
pub const BLOB_MODE: &str = "100644";

/// Role assigned to invited students
pub const INVITE_ROLE: &str = "direct_member";

/// Organization member
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    pub login: String,
}

/// Organization repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub private: bool,
}

/// User lookup result
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
}

/// Pending organization invitation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Invitation {
    pub id: u64,
    /// Null when the invitation was sent to an email address
    pub login: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Invitation {
    /// Login if present, otherwise the invited email
    pub fn invitee(&self) -> &str {
        self.login
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("<unknown>")
    }
}

/// Head commit of a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCommit {
    pub sha: String,
    pub tree_sha: Option<String>,
}

/// Commit created through the Git data API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommit {
    pub sha: String,
    pub message: String,
    pub author_name: Option<String>,
}

/// One entry of a tree to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub sha: String,
}

impl TreeEntry {
    /// Regular file entry pointing at an existing blob
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode: BLOB_MODE,
            kind: "blob",
            sha: sha.into(),
        }
    }
}

/// Errors that can occur while talking to the hosting service
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    #[error("{method} {path} returned {status}: {message}")]
    Status {
        method: String,
        path: String,
        status: u16,
        message: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing field: {0}")]
    MissingField(&'static str),
}

impl ForgeError {
    /// HTTP status of the failed call, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::Status { status, .. } => Some(*status),
            ForgeError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Operations the classroom commands need from the hosting service
///
/// All calls block until the service answers. Listing calls return every
/// page.
pub trait Forge {
    fn list_members(&self, org: &str) -> Result<Vec<Member>, ForgeError>;

    fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>, ForgeError>;

    fn create_repo(&self, org: &str, name: &str, private: bool) -> Result<Repository, ForgeError>;

    /// Create a file on the default branch via the contents API
    fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
    ) -> Result<(), ForgeError>;

    fn delete_repo(&self, owner: &str, repo: &str) -> Result<(), ForgeError>;

    fn get_user(&self, login: &str) -> Result<User, ForgeError>;

    fn create_org_invitation(&self, org: &str, invitee_id: u64, role: &str)
        -> Result<(), ForgeError>;

    fn list_pending_invitations(&self, org: &str) -> Result<Vec<Invitation>, ForgeError>;

    fn get_branch_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BaseCommit, ForgeError>;

    /// Upload a blob and return its sha
    fn create_blob(&self, owner: &str, repo: &str, content: &[u8]) -> Result<String, ForgeError>;

    /// Create a tree on top of `base_tree` and return its sha
    fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, ForgeError>;

    fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<NewCommit, ForgeError>;

    /// Move `refs/heads/<branch>` to `sha` (non-forced)
    fn update_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError>;
}
