//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{completions::CompletionsArgs, init::InitArgs, push::PushArgs};

#[derive(Parser)]
#[command(name = "krozek")]
#[command(author, version, about = "Classroom administration for GitHub organizations")]
#[command(long_about = "Manage student repositories, course content pushes and organization invitations for a classroom GitHub organization.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Only log errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every API call
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (default: ./.env.toml, ./.env, then the user config dir)
    #[arg(long, short = 'c', global = true, env = "KROZEK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all the students in the organization
    #[command(visible_alias = "ls")]
    ListStudents,

    /// Create repositories for selected students
    #[command(visible_alias = "cr")]
    CreateRepos,

    /// Delete selected student repositories
    #[command(visible_alias = "del")]
    DeleteRepos,

    /// Push course content to student repositories as a single commit
    #[command(visible_alias = "p")]
    Push(PushArgs),

    /// Invite the configured students to the organization
    #[command(visible_alias = "inv")]
    InviteStudents,

    /// Check which students have accepted their invitation
    #[command(visible_alias = "ci")]
    CheckInvitations,

    /// Write a starter config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Auto,
    /// JSON (for scripting)
    Json,
}
