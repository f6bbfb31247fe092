//! `krozek init` command - write a starter config file

use console::style;
use miette::{bail, IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::config::{Config, LOCAL_CONFIG_FILES};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Where to write the config (default: ./.env.toml)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILES[0]));

    if path.exists() && !args.force {
        bail!(
            "Config file already exists at {}\n\
             Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    std::fs::write(&path, Config::template()).into_diagnostic()?;

    println!(
        "{} Created config at {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    println!();
    println!("Next steps:");
    println!("  Fill in {} and {}", style("org_name").yellow(), style("token").yellow());
    println!(
        "  {} List the students in your organization",
        style("krozek list-students").yellow()
    );

    Ok(())
}
