//! In-memory [`Forge`] used by unit tests

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::{
    BaseCommit, Forge, ForgeError, Invitation, Member, NewCommit, Repository, TreeEntry, User,
};

/// A recorded mutating call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateRepo(String),
    CreateFile { repo: String, path: String, content: Vec<u8> },
    DeleteRepo(String),
    Invite(u64),
    CreateBlob { repo: String, content: Vec<u8> },
    CreateTree { repo: String, base_tree: String, entries: Vec<TreeEntry> },
    CreateCommit { repo: String, message: String, tree: String, parents: Vec<String> },
    UpdateBranch { repo: String, branch: String, sha: String },
}

#[derive(Default)]
pub struct MemoryForge {
    pub members: Vec<String>,
    pub repos: RefCell<Vec<String>>,
    pub users: HashMap<String, u64>,
    pub pending: Vec<Invitation>,
    /// Head commits per repo; repos missing here fail `get_branch_commit`
    pub heads: HashMap<String, BaseCommit>,
    /// Repo names whose mutating calls fail with 422
    pub failing: HashSet<String>,
    pub calls: RefCell<Vec<Call>>,
    next_sha: Cell<u32>,
}

impl MemoryForge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(mut self, members: &[&str]) -> Self {
        self.members = members.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_repos(self, repos: &[&str]) -> Self {
        *self.repos.borrow_mut() = repos.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_user(mut self, login: &str, id: u64) -> Self {
        self.users.insert(login.to_string(), id);
        self
    }

    pub fn with_pending(mut self, login: &str) -> Self {
        let id = self.pending.len() as u64 + 1;
        self.pending.push(Invitation {
            id,
            login: Some(login.to_string()),
            email: None,
            role: Some("direct_member".to_string()),
        });
        self
    }

    pub fn with_head(mut self, repo: &str, sha: &str, tree_sha: Option<&str>) -> Self {
        self.heads.insert(
            repo.to_string(),
            BaseCommit {
                sha: sha.to_string(),
                tree_sha: tree_sha.map(str::to_string),
            },
        );
        self
    }

    pub fn failing_on(mut self, repo: &str) -> Self {
        self.failing.insert(repo.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn sha(&self, prefix: &str) -> String {
        let n = self.next_sha.get() + 1;
        self.next_sha.set(n);
        format!("{prefix}{n:04}")
    }

    fn check(&self, repo: &str, method: &str, path: String) -> Result<(), ForgeError> {
        if self.failing.contains(repo) {
            return Err(ForgeError::Status {
                method: method.to_string(),
                path,
                status: 422,
                message: "Validation Failed".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(method: &str, path: String) -> ForgeError {
        ForgeError::Status {
            method: method.to_string(),
            path,
            status: 404,
            message: "Not Found".to_string(),
        }
    }
}

impl Forge for MemoryForge {
    fn list_members(&self, _org: &str) -> Result<Vec<Member>, ForgeError> {
        Ok(self
            .members
            .iter()
            .map(|login| Member {
                login: login.clone(),
            })
            .collect())
    }

    fn list_org_repos(&self, _org: &str) -> Result<Vec<Repository>, ForgeError> {
        Ok(self
            .repos
            .borrow()
            .iter()
            .map(|name| Repository {
                name: name.clone(),
                private: true,
            })
            .collect())
    }

    fn create_repo(&self, org: &str, name: &str, private: bool) -> Result<Repository, ForgeError> {
        self.check(name, "POST", format!("/orgs/{org}/repos"))?;
        self.record(Call::CreateRepo(name.to_string()));
        self.repos.borrow_mut().push(name.to_string());
        Ok(Repository {
            name: name.to_string(),
            private,
        })
    }

    fn create_file(
        &self,
        _owner: &str,
        repo: &str,
        path: &str,
        _message: &str,
        content: &[u8],
    ) -> Result<(), ForgeError> {
        self.record(Call::CreateFile {
            repo: repo.to_string(),
            path: path.to_string(),
            content: content.to_vec(),
        });
        Ok(())
    }

    fn delete_repo(&self, owner: &str, repo: &str) -> Result<(), ForgeError> {
        self.check(repo, "DELETE", format!("/repos/{owner}/{repo}"))?;
        self.record(Call::DeleteRepo(repo.to_string()));
        self.repos.borrow_mut().retain(|r| r != repo);
        Ok(())
    }

    fn get_user(&self, login: &str) -> Result<User, ForgeError> {
        self.users
            .get(login)
            .map(|id| User {
                id: *id,
                login: login.to_string(),
            })
            .ok_or_else(|| Self::not_found("GET", format!("/users/{login}")))
    }

    fn create_org_invitation(
        &self,
        _org: &str,
        invitee_id: u64,
        _role: &str,
    ) -> Result<(), ForgeError> {
        self.record(Call::Invite(invitee_id));
        Ok(())
    }

    fn list_pending_invitations(&self, _org: &str) -> Result<Vec<Invitation>, ForgeError> {
        Ok(self.pending.clone())
    }

    fn get_branch_commit(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BaseCommit, ForgeError> {
        self.heads
            .get(repo)
            .cloned()
            .ok_or_else(|| Self::not_found("GET", format!("/repos/{owner}/{repo}/commits/{branch}")))
    }

    fn create_blob(&self, owner: &str, repo: &str, content: &[u8]) -> Result<String, ForgeError> {
        self.check(repo, "POST", format!("/repos/{owner}/{repo}/git/blobs"))?;
        self.record(Call::CreateBlob {
            repo: repo.to_string(),
            content: content.to_vec(),
        });
        Ok(self.sha("blob"))
    }

    fn create_tree(
        &self,
        _owner: &str,
        repo: &str,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, ForgeError> {
        self.record(Call::CreateTree {
            repo: repo.to_string(),
            base_tree: base_tree.to_string(),
            entries: entries.to_vec(),
        });
        Ok(self.sha("tree"))
    }

    fn create_commit(
        &self,
        _owner: &str,
        repo: &str,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<NewCommit, ForgeError> {
        self.record(Call::CreateCommit {
            repo: repo.to_string(),
            message: message.to_string(),
            tree: tree.to_string(),
            parents: parents.to_vec(),
        });
        Ok(NewCommit {
            sha: self.sha("commit"),
            message: message.to_string(),
            author_name: Some("Krozek Bot".to_string()),
        })
    }

    fn update_branch(
        &self,
        _owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        self.record(Call::UpdateBranch {
            repo: repo.to_string(),
            branch: branch.to_string(),
            sha: sha.to_string(),
        });
        Ok(())
    }
}
