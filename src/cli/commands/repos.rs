//! `krozek create-repos` and `krozek delete-repos` commands

use miette::{bail, IntoDiagnostic, Result, WrapErr};

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{format_list, print_heading, BatchReport};
use crate::cli::session::{run_with, Session};
use crate::core::roster;

/// Name of the file committed to new repositories
pub const README_PATH: &str = "README.md";
pub const README_MESSAGE: &str = "Initial commit";

pub fn run_create(global: &GlobalOpts) -> Result<()> {
    run_with(global, |session| finish(create(session)?))
}

pub fn run_delete(global: &GlobalOpts) -> Result<()> {
    run_with(global, |session| finish(delete(session)?))
}

fn finish(report: BatchReport) -> Result<()> {
    if report.is_empty() {
        return Ok(());
    }
    println!();
    println!("{}", report.summary());
    Ok(())
}

/// Create a private repository with the configured README for each selected student
pub fn create(session: &mut Session<'_>) -> Result<BatchReport> {
    let config = session.config;
    let org = config.org_name.as_str();

    let students = roster::fetch_students(session.forge, config).into_diagnostic()?;
    if students.is_empty() {
        bail!("No students found in {}", org);
    }

    let selected = session
        .prompter
        .multi_select("For which students do you want to create repositories?", &students)?;
    if selected.is_empty() {
        bail!("No students selected");
    }

    if !session.confirm(&format!(
        "Are you sure you want to create repositories for {}?",
        format_list(&selected)
    ))? {
        return Ok(BatchReport::default());
    }

    let readme = std::fs::read(&config.init_readme)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read README {}", config.init_readme.display()))?;

    print_heading(&format!("Creating {} repositories in {}", selected.len(), org));
    let mut report = BatchReport::default();

    for student in &selected {
        if let Err(e) = session.forge.create_repo(org, student, true) {
            report.fail(
                student,
                format!("Error creating repository for {}", student),
                e,
            );
            continue;
        }
        tracing::info!(org, repo = %student, "created repository");

        match session
            .forge
            .create_file(org, student, README_PATH, README_MESSAGE, &readme)
        {
            Ok(()) => report.ok(
                student,
                format!("Successfully created repository and README for {}", student),
            ),
            Err(e) => report.fail(student, format!("Error creating README for {}", student), e),
        }
    }

    Ok(report)
}

/// Delete the selected student repositories
pub fn delete(session: &mut Session<'_>) -> Result<BatchReport> {
    let config = session.config;
    let org = config.org_name.as_str();

    let repos = roster::fetch_student_repositories(session.forge, config).into_diagnostic()?;
    if repos.is_empty() {
        bail!("No student repositories found");
    }

    let selected = session
        .prompter
        .multi_select("Which repositories do you want to delete?", &repos)?;
    if selected.is_empty() {
        bail!("No repositories selected");
    }

    if !session.confirm(&format!(
        "Are you sure you want to delete {}?",
        format_list(&selected)
    ))? {
        return Ok(BatchReport::default());
    }

    let mut report = BatchReport::default();
    for repo in &selected {
        match session.forge.delete_repo(org, repo) {
            Ok(()) => report.ok(repo, format!("Successfully deleted repository {}", repo)),
            Err(e) => report.fail(repo, format!("Error deleting repository {}", repo), e),
        }
    }

    Ok(report)
}
