//! `krozek push` command - push course content to student repositories

use clap::Args;
use console::style;
use miette::{bail, IntoDiagnostic, Result};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{format_list, print_heading, BatchReport};
use crate::cli::session::{run_with, Session};
use crate::core::{content, push_content, roster, PushTarget};

/// Push course content to student repositories as a single commit
#[derive(Debug, Args)]
pub struct PushArgs {
    /// Commit message (prompted for when omitted)
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

pub fn run(args: PushArgs, global: &GlobalOpts) -> Result<()> {
    run_with(global, |session| {
        let report = execute(session, &args)?;
        if report.has_failures() {
            bail!("Push failed for {} repositories ({})", report.failed.len(), report.summary());
        }
        Ok(())
    })
}

pub fn execute(session: &mut Session<'_>, args: &PushArgs) -> Result<BatchReport> {
    let config = session.config;

    let repos = roster::fetch_student_repositories(session.forge, config).into_diagnostic()?;
    if repos.is_empty() {
        bail!("No student repositories to push content to");
    }

    let selected_repos = session
        .prompter
        .multi_select("Which repositories do you want to push content to?", &repos)?;
    if selected_repos.is_empty() {
        bail!("No repositories selected");
    }

    let entries = content::list_entries(&config.content_dir).into_diagnostic()?;
    if entries.is_empty() {
        bail!(
            "No directories found in content directory {}",
            config.content_dir.display()
        );
    }

    let selected_entries = session
        .prompter
        .multi_select("Which directories do you want to push?", &entries)?;
    if selected_entries.is_empty() {
        bail!("No content selected");
    }

    let message = match &args.message {
        Some(message) => message.trim().to_string(),
        None => session.prompter.input("Enter commit message")?,
    };
    if message.is_empty() {
        bail!("Commit message cannot be empty");
    }

    if !session.confirm(&format!(
        "Are you sure you want to push {} to {} with commit message: {}?",
        format_list(&selected_entries),
        format_list(&selected_repos),
        message
    ))? {
        return Ok(BatchReport::default());
    }

    let files = content::collect(&config.content_dir, &selected_entries).into_diagnostic()?;
    if files.is_empty() {
        bail!("No files found in the selected content");
    }
    tracing::debug!(files = files.len(), "collected content");

    let mut report = BatchReport::default();
    for repo in &selected_repos {
        print_heading(&format!("Pushing content to {}", repo));

        let target = PushTarget {
            owner: config.org_name.as_str(),
            repo: repo.as_str(),
            branch: config.branch.as_str(),
        };
        match push_content(session.forge, target, &files, &message) {
            Ok(outcome) => {
                for path in &outcome.paths {
                    println!("  {} {}", style("+").green(), path);
                }
                report.ok(
                    repo,
                    format!(
                        "Pushed {} files to {} ({})",
                        outcome.paths.len(),
                        repo,
                        short_sha(&outcome.commit_sha)
                    ),
                );
            }
            Err(e) => report.fail(repo, format!("Error pushing to {}", repo), e),
        }
    }

    Ok(report)
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::OutputFormat;
    use crate::cli::prompt::ScriptedPrompter;
    use crate::cli::session::testing;
    use crate::core::forge::memory::{Call, MemoryForge};
    use crate::core::Config;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Config) {
        let tmp = TempDir::new().unwrap();
        let content = tmp.path().join("content");
        fs::create_dir_all(content.join("week1")).unwrap();
        fs::create_dir_all(content.join("week2")).unwrap();
        fs::write(content.join("week1/task.md"), "do it").unwrap();
        fs::write(content.join("week2/task.md"), "do more").unwrap();
        let config = testing::config(&content, &tmp.path().join("README.md"));
        (tmp, config)
    }

    fn forge() -> MemoryForge {
        MemoryForge::new()
            .with_members(&["teacher", "alice", "bob"])
            .with_repos(&["alice", "bob", "course-site"])
            .with_head("alice", "a-head", Some("a-tree"))
            .with_head("bob", "b-head", Some("b-tree"))
    }

    fn no_message() -> PushArgs {
        PushArgs { message: None }
    }

    #[test]
    fn test_push_to_selected_repos() {
        let (_tmp, config) = setup();
        let forge = forge();
        let mut prompter = ScriptedPrompter::new()
            .select(&["alice", "bob"])
            .select(&["week1"])
            .type_text("Add week 1")
            .answer(true);
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let report = execute(&mut session, &no_message()).unwrap();

        assert_eq!(report.succeeded, vec!["alice", "bob"]);
        let updates: Vec<Call> = forge
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::UpdateBranch { .. }))
            .collect();
        assert_eq!(updates.len(), 2);
        let trees: Vec<Call> = forge
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::CreateTree { .. }))
            .collect();
        match &trees[0] {
            Call::CreateTree { entries, .. } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].path, "week1/task.md");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_empty_repo_selection_aborts() {
        let (_tmp, config) = setup();
        let forge = forge();
        let mut prompter = ScriptedPrompter::new().select(&[]);
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let err = execute(&mut session, &no_message()).unwrap_err();

        assert!(err.to_string().contains("No repositories selected"));
        assert!(forge.calls().is_empty());
    }

    #[test]
    fn test_empty_content_selection_aborts() {
        let (_tmp, config) = setup();
        let forge = forge();
        let mut prompter = ScriptedPrompter::new().select(&["alice"]).select(&[]);
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        assert!(execute(&mut session, &no_message()).is_err());
        assert!(forge.calls().is_empty());
    }

    #[test]
    fn test_empty_commit_message_aborts() {
        let (_tmp, config) = setup();
        let forge = forge();
        let mut prompter = ScriptedPrompter::new()
            .select(&["alice"])
            .select(&["week1"])
            .type_text("");
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let err = execute(&mut session, &no_message()).unwrap_err();

        assert!(err.to_string().contains("Commit message cannot be empty"));
        assert!(forge.calls().is_empty());
        // never reached the confirmation
        assert!(prompter.confirms.is_empty());
        assert_eq!(prompter.asked.len(), 3);
    }

    #[test]
    fn test_message_flag_skips_prompt() {
        let (_tmp, config) = setup();
        let forge = forge();
        let mut prompter = ScriptedPrompter::new()
            .select(&["bob"])
            .select(&["week2"])
            .answer(true);
        let args = PushArgs {
            message: Some("Week 2".into()),
        };
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let report = execute(&mut session, &args).unwrap();

        assert_eq!(report.succeeded, vec!["bob"]);
        assert!(forge.calls().iter().any(
            |c| matches!(c, Call::CreateCommit { message, .. } if message == "Week 2")
        ));
    }

    #[test]
    fn test_missing_tree_fails_repo_but_continues() {
        let (_tmp, config) = setup();
        let forge = forge().with_head("alice", "a-head", None);
        let mut prompter = ScriptedPrompter::new()
            .select(&["alice", "bob"])
            .select(&["week1"])
            .type_text("Add week 1")
            .answer(true);
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let report = execute(&mut session, &no_message()).unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "alice");
        assert_eq!(report.succeeded, vec!["bob"]);
        assert!(!forge.calls().iter().any(|c| match c {
            Call::CreateBlob { repo, .. } => repo == "alice",
            _ => false,
        }));
    }

    #[test]
    fn test_declined_push_makes_no_calls() {
        let (_tmp, config) = setup();
        let forge = forge();
        let mut prompter = ScriptedPrompter::new()
            .select(&["alice"])
            .select(&["week1"])
            .type_text("Add week 1")
            .answer(false);
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let report = execute(&mut session, &no_message()).unwrap();

        assert_eq!(report, BatchReport::default());
        assert!(forge.calls().is_empty());
    }

    #[test]
    fn test_only_empty_directories_aborts_before_any_call() {
        let (tmp, config) = setup();
        fs::create_dir_all(tmp.path().join("content/week3")).unwrap();
        let forge = forge();
        let mut prompter = ScriptedPrompter::new()
            .select(&["alice", "bob"])
            .select(&["week3"])
            .type_text("Add week 3")
            .answer(true);
        let mut session = Session::new(&config, &forge, &mut prompter, OutputFormat::Auto);

        let err = execute(&mut session, &no_message()).unwrap_err();

        assert!(err.to_string().contains("No files found in the selected content"));
        assert!(forge.calls().is_empty());
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456");
        assert_eq!(short_sha("abc"), "abc");
    }
}
