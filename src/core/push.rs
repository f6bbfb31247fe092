//! Single-commit content push through the Git data API
//!
//! Steps per repository:
//! 1. read the branch head to get the parent commit and its tree
//! 2. upload one blob per file
//! 3. create a tree layered on the parent's tree
//! 4. create a commit pointing at that tree
//! 5. fast-forward the branch ref to the new commit
//!
//! Nothing is written remotely until step 1 has produced a base tree.

use thiserror::Error;
use tracing::{debug, info};

use crate::core::content::ContentFile;
use crate::core::forge::{Forge, ForgeError, TreeEntry};

/// Errors that can occur while pushing content to one repository
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Nothing to push")]
    NoFiles,

    #[error("No tree SHA found for head commit {commit} of branch '{branch}'")]
    MissingTree { branch: String, commit: String },

    #[error(transparent)]
    Forge(#[from] ForgeError),
}

/// What a successful push produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub parent_sha: String,
    pub tree_sha: String,
    pub commit_sha: String,
    pub paths: Vec<String>,
}

/// Target of a push
#[derive(Debug, Clone, Copy)]
pub struct PushTarget<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub branch: &'a str,
}

/// Commit `files` on top of the branch head as a single commit
pub fn push_content(
    forge: &dyn Forge,
    target: PushTarget<'_>,
    files: &[ContentFile],
    message: &str,
) -> Result<PushOutcome, PushError> {
    let PushTarget {
        owner,
        repo,
        branch,
    } = target;

    if files.is_empty() {
        return Err(PushError::NoFiles);
    }

    let head = forge.get_branch_commit(owner, repo, branch)?;
    let base_tree = head.tree_sha.ok_or_else(|| PushError::MissingTree {
        branch: branch.to_string(),
        commit: head.sha.clone(),
    })?;
    debug!(repo, commit = %head.sha, tree = %base_tree, "resolved branch head");

    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let sha = forge.create_blob(owner, repo, &file.bytes)?;
        debug!(repo, path = %file.path, %sha, "created blob");
        entries.push(TreeEntry::blob(file.path.clone(), sha));
    }

    let tree_sha = forge.create_tree(owner, repo, &base_tree, &entries)?;
    info!(repo, tree = %tree_sha, "created tree");

    let parents = vec![head.sha.clone()];
    let commit = forge.create_commit(owner, repo, message, &tree_sha, &parents)?;
    info!(
        repo,
        commit = %commit.sha,
        message = %commit.message,
        author = commit.author_name.as_deref().unwrap_or("unknown"),
        "created commit"
    );

    forge.update_branch(owner, repo, branch, &commit.sha)?;
    info!(repo, branch, "updated ref");

    Ok(PushOutcome {
        parent_sha: head.sha,
        tree_sha,
        commit_sha: commit.sha,
        paths: entries.into_iter().map(|e| e.path).collect(),
    })
}
