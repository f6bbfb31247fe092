//! Student roster derived from organization membership
//!
//! A student is any org member whose login is not whitelisted. A student
//! repository is an org repository named exactly after a student login.

use serde::Serialize;
use std::collections::HashSet;

use crate::core::forge::{Forge, ForgeError, Invitation, Member, Repository};
use crate::core::Config;

/// Logins of members that are not on the whitelist, in member order
pub fn students(members: &[Member], whitelist: &[String]) -> Vec<String> {
    let whitelist: HashSet<&str> = whitelist.iter().map(String::as_str).collect();
    members
        .iter()
        .filter(|m| !whitelist.contains(m.login.as_str()))
        .map(|m| m.login.clone())
        .collect()
}

/// Names of repositories that match a student login, in repository order
pub fn student_repositories(repos: &[Repository], students: &[String]) -> Vec<String> {
    let students: HashSet<&str> = students.iter().map(String::as_str).collect();
    repos
        .iter()
        .filter(|r| students.contains(r.name.as_str()))
        .map(|r| r.name.clone())
        .collect()
}

/// List the org's students
pub fn fetch_students(forge: &dyn Forge, config: &Config) -> Result<Vec<String>, ForgeError> {
    let members = forge.list_members(&config.org_name)?;
    tracing::debug!(members = members.len(), org = %config.org_name, "fetched org members");
    Ok(students(&members, &config.whitelisted_members))
}

/// List the org repositories that belong to students
pub fn fetch_student_repositories(
    forge: &dyn Forge,
    config: &Config,
) -> Result<Vec<String>, ForgeError> {
    let students = fetch_students(forge, config)?;
    let repos = forge.list_org_repos(&config.org_name)?;
    tracing::debug!(repos = repos.len(), org = %config.org_name, "fetched org repositories");
    Ok(student_repositories(&repos, &students))
}

/// Lookup key for a GitHub login; logins are case-insensitive
pub fn login_key(login: &str) -> String {
    login.to_ascii_lowercase()
}

/// Where an invitee stands with respect to the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    Accepted,
    Pending,
    NotInvited,
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InviteStatus::Accepted => write!(f, "accepted"),
            InviteStatus::Pending => write!(f, "pending"),
            InviteStatus::NotInvited => write!(f, "not invited"),
        }
    }
}

/// Status of each invitee. Membership wins over a stale pending invitation.
pub fn invitation_status(
    invitees: &[String],
    members: &[Member],
    pending: &[Invitation],
) -> Vec<(String, InviteStatus)> {
    let members: HashSet<String> = members.iter().map(|m| login_key(&m.login)).collect();
    let pending: HashSet<String> = pending
        .iter()
        .filter_map(|i| i.login.as_deref())
        .map(login_key)
        .collect();

    invitees
        .iter()
        .map(|login| {
            let key = login_key(login);
            let status = if members.contains(&key) {
                InviteStatus::Accepted
            } else if pending.contains(&key) {
                InviteStatus::Pending
            } else {
                InviteStatus::NotInvited
            };
            (login.clone(), status)
        })
        .collect()
}
