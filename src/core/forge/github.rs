//! GitHub REST API client
//!
//! Blocking client over `reqwest`. Authenticates with a bearer token and
//! talks to `api.github.com` or a GitHub Enterprise API root.

use base64ct::{Base64, Encoding};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{
    BaseCommit, Forge, ForgeError, Invitation, Member, NewCommit, Repository, TreeEntry, User,
};

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("krozek/", env!("CARGO_PKG_VERSION"));

/// Page size for list endpoints (GitHub maximum)
const PER_PAGE: usize = 100;

/// GitHub implementation of [`Forge`]
pub struct GithubClient {
    client: Client,
    api_url: String,
}

impl GithubClient {
    /// Build a client for the given API root
    pub fn new(token: &str, api_url: &str) -> Result<Self, ForgeError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| ForgeError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Send a request and turn non-success responses into [`ForgeError::Status`]
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response, ForgeError> {
        debug!(%method, path, "github request");

        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().unwrap_or_default();
        let message = error_message(&text);
        warn!(%method, path, status = status.as_u16(), %message, "github request failed");
        Err(ForgeError::Status {
            method: method.to_string(),
            path: path.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ForgeError> {
        let text = self.send(method, path, body)?.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch every page of a list endpoint
    fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ForgeError> {
        collect_pages(|page| self.request_json(Method::GET, &paged(path, page), None))
    }
}

/// Call `fetch` with page numbers starting at 1 until a page comes back short
fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>, ForgeError>
where
    F: FnMut(usize) -> Result<Vec<T>, ForgeError>,
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch(page)?;
        let last = batch.len() < PER_PAGE;
        items.extend(batch);
        if last {
            break;
        }
        page += 1;
    }
    Ok(items)
}

/// Append pagination parameters to a path
fn paged(path: &str, page: usize) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}per_page={PER_PAGE}&page={page}")
}

/// Pull the `message` field out of a GitHub error body, falling back to the raw text
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Deserialize)]
struct ShaOnly {
    sha: Option<String>,
}

/// Decode a "get a commit" response into the commit and its tree SHA
fn base_commit(body: &str) -> Result<BaseCommit, ForgeError> {
    #[derive(Deserialize)]
    struct CommitResponse {
        sha: String,
        commit: Option<CommitDetail>,
    }
    #[derive(Deserialize)]
    struct CommitDetail {
        tree: Option<ShaOnly>,
    }

    let data: CommitResponse = serde_json::from_str(body)?;
    Ok(BaseCommit {
        sha: data.sha,
        tree_sha: data.commit.and_then(|c| c.tree).and_then(|t| t.sha),
    })
}

impl Forge for GithubClient {
    fn list_members(&self, org: &str) -> Result<Vec<Member>, ForgeError> {
        // https://docs.github.com/en/rest/orgs/members#list-organization-members
        self.get_all(&format!("/orgs/{org}/members"))
    }

    fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>, ForgeError> {
        // https://docs.github.com/en/rest/repos/repos#list-organization-repositories
        self.get_all(&format!("/orgs/{org}/repos?type=all"))
    }

    fn create_repo(&self, org: &str, name: &str, private: bool) -> Result<Repository, ForgeError> {
        // https://docs.github.com/en/rest/repos/repos#create-an-organization-repository
        let body = json!({ "name": name, "private": private });
        self.request_json(Method::POST, &format!("/orgs/{org}/repos"), Some(&body))
    }

    fn create_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        content: &[u8],
    ) -> Result<(), ForgeError> {
        // https://docs.github.com/en/rest/repos/contents#create-or-update-file-contents
        let body = json!({
            "message": message,
            "content": Base64::encode_string(content),
        });
        self.send(
            Method::PUT,
            &format!("/repos/{owner}/{repo}/contents/{path}"),
            Some(&body),
        )?;
        Ok(())
    }

    fn delete_repo(&self, owner: &str, repo: &str) -> Result<(), ForgeError> {
        // https://docs.github.com/en/rest/repos/repos#delete-a-repository
        self.send(Method::DELETE, &format!("/repos/{owner}/{repo}"), None)?;
        Ok(())
    }

    fn get_user(&self, login: &str) -> Result<User, ForgeError> {
        self.request_json(Method::GET, &format!("/users/{login}"), None)
    }

    fn create_org_invitation(
        &self,
        org: &str,
        invitee_id: u64,
        role: &str,
    ) -> Result<(), ForgeError> {
        // https://docs.github.com/en/rest/orgs/members#create-an-organization-invitation
        let body = json!({
            "invitee_id": invitee_id,
            "role": role,
            "team_ids": [],
        });
        self.send(Method::POST, &format!("/orgs/{org}/invitations"), Some(&body))?;
        Ok(())
    }

    fn list_pending_invitations(&self, org: &str) -> Result<Vec<Invitation>, ForgeError> {
        self.get_all(&format!("/orgs/{org}/invitations"))
    }

    fn get_branch_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BaseCommit, ForgeError> {
        // https://docs.github.com/en/rest/commits/commits#get-a-commit
        let text = self
            .send(
                Method::GET,
                &format!("/repos/{owner}/{repo}/commits/{branch}"),
                None,
            )?
            .text()?;
        base_commit(&text)
    }

    fn create_blob(&self, owner: &str, repo: &str, content: &[u8]) -> Result<String, ForgeError> {
        // https://docs.github.com/en/rest/git/blobs#create-a-blob
        let body = json!({
            "content": Base64::encode_string(content),
            "encoding": "base64",
        });
        let data: ShaOnly = self.request_json(
            Method::POST,
            &format!("/repos/{owner}/{repo}/git/blobs"),
            Some(&body),
        )?;
        data.sha.ok_or(ForgeError::MissingField("blob.sha"))
    }

    fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, ForgeError> {
        // https://docs.github.com/en/rest/git/trees#create-a-tree
        let body = json!({
            "base_tree": base_tree,
            "tree": entries,
        });
        let data: ShaOnly = self.request_json(
            Method::POST,
            &format!("/repos/{owner}/{repo}/git/trees"),
            Some(&body),
        )?;
        data.sha.ok_or(ForgeError::MissingField("tree.sha"))
    }

    fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<NewCommit, ForgeError> {
        // https://docs.github.com/en/rest/git/commits#create-a-commit
        #[derive(Deserialize)]
        struct CommitResponse {
            sha: Option<String>,
            message: Option<String>,
            author: Option<Author>,
        }
        #[derive(Deserialize)]
        struct Author {
            name: Option<String>,
        }

        let body = json!({
            "message": message,
            "tree": tree,
            "parents": parents,
        });
        let data: CommitResponse = self.request_json(
            Method::POST,
            &format!("/repos/{owner}/{repo}/git/commits"),
            Some(&body),
        )?;

        Ok(NewCommit {
            sha: data.sha.ok_or(ForgeError::MissingField("commit.sha"))?,
            message: data.message.unwrap_or_else(|| message.to_string()),
            author_name: data.author.and_then(|a| a.name),
        })
    }

    fn update_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        // https://docs.github.com/en/rest/git/refs#update-a-reference
        let body = json!({ "sha": sha, "force": false });
        self.send(
            Method::PATCH,
            &format!("/repos/{owner}/{repo}/git/refs/heads/{branch}"),
            Some(&body),
        )?;
        Ok(())
    }
}
