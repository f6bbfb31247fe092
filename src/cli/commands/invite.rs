//! `krozek invite-students` and `krozek check-invitations` commands

use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::collections::HashSet;
use tabled::{builder::Builder, settings::Style};

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::cli::helpers::{format_list, BatchReport};
use crate::cli::session::{run_with, Session};
use crate::core::forge::INVITE_ROLE;
use crate::core::roster::{self, InviteStatus};

pub fn run_invite(global: &GlobalOpts) -> Result<()> {
    run_with(global, |session| {
        let report = invite(session)?;
        if !report.is_empty() {
            println!();
            println!("{}", report.summary());
        }
        Ok(())
    })
}

pub fn run_check(global: &GlobalOpts) -> Result<()> {
    run_with(global, |session| check(session).map(|_| ()))
}

/// Invite every configured login that is neither a member nor already invited
pub fn invite(session: &mut Session<'_>) -> Result<BatchReport> {
    let config = session.config;
    let org = config.org_name.as_str();

    if config.invite_to.is_empty() {
        println!("No students listed in invite_to.");
        return Ok(BatchReport::default());
    }

    if !session.confirm(&format!(
        "Are you sure you want to invite students {} to the {} organization?",
        format_list(&config.invite_to),
        org
    ))? {
        return Ok(BatchReport::default());
    }

    let members: HashSet<String> = session
        .forge
        .list_members(org)
        .into_diagnostic()?
        .into_iter()
        .map(|m| roster::login_key(&m.login))
        .collect();
    let pending: HashSet<String> = session
        .forge
        .list_pending_invitations(org)
        .into_diagnostic()?
        .into_iter()
        .filter_map(|i| i.login)
        .map(|login| roster::login_key(&login))
        .collect();

    let mut report = BatchReport::default();
    for login in &config.invite_to {
        let key = roster::login_key(login);
        if members.contains(&key) {
            report.skip(login, format!("{} is already a member of {}", login, org));
            continue;
        }
        if pending.contains(&key) {
            report.skip(login, format!("{} already has a pending invitation", login));
            continue;
        }

        let user = match session.forge.get_user(login) {
            Ok(user) => user,
            Err(e) => {
                report.fail(login, format!("Error looking up user {}", login), e);
                continue;
            }
        };
        tracing::debug!(id = user.id, login = %user.login, "resolved user");

        match session.forge.create_org_invitation(org, user.id, INVITE_ROLE) {
            Ok(()) => report.ok(login, format!("Invited {} to {}", login, org)),
            Err(e) => report.fail(login, format!("Error inviting {} to {}", login, org), e),
        }
    }

    Ok(report)
}

/// Show pending invitations and where each configured invitee stands
pub fn check(session: &mut Session<'_>) -> Result<Vec<(String, InviteStatus)>> {
    let config = session.config;
    let org = config.org_name.as_str();

    let pending = session
        .forge
        .list_pending_invitations(org)
        .into_diagnostic()?;
    let members = session.forge.list_members(org).into_diagnostic()?;
    let status = roster::invitation_status(&config.invite_to, &members, &pending);

    match session.format {
        OutputFormat::Json => {
            let invitees: Vec<_> = status
                .iter()
                .map(|(login, status)| json!({ "login": login, "status": status }))
                .collect();
            let body = json!({
                "org": org,
                "pending": pending,
                "invitees": invitees,
            });
            println!("{}", serde_json::to_string_pretty(&body).into_diagnostic()?);
        }
        OutputFormat::Auto => {
            if pending.is_empty() {
                println!("No pending invitations found for {}", org);
            }
            for invitation in &pending {
                println!("Found pending invitation for {}", invitation.invitee());
            }

            if !status.is_empty() {
                println!();
                let mut table = Builder::default();
                table.push_record(["Login", "Status"]);
                for (login, state) in &status {
                    table.push_record([login.clone(), state.to_string()]);
                }
                println!("{}", table.build().with(Style::markdown()));

                let accepted = status
                    .iter()
                    .filter(|(_, s)| *s == InviteStatus::Accepted)
                    .count();
                println!("\n{}/{} students have joined {}", accepted, status.len(), org);
            }
        }
    }

    Ok(status)
}
