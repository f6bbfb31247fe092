//! Per-invocation command context

use miette::{IntoDiagnostic, Result};

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::cli::prompt::{Prompter, TerminalPrompter};
use crate::core::{Config, Forge, GithubClient};

/// Everything a classroom command needs: config, API and prompts
pub struct Session<'a> {
    pub config: &'a Config,
    pub forge: &'a dyn Forge,
    pub prompter: &'a mut dyn Prompter,
    pub format: OutputFormat,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &'a Config,
        forge: &'a dyn Forge,
        prompter: &'a mut dyn Prompter,
        format: OutputFormat,
    ) -> Self {
        Self {
            config,
            forge,
            prompter,
            format,
        }
    }

    /// Ask for confirmation, printing "Aborted." when declined
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let yes = self.prompter.confirm(prompt)?;
        if !yes {
            println!("Aborted.");
        }
        Ok(yes)
    }
}

/// Load config, authenticate and run `f` with a terminal session
pub fn run_with<F>(global: &GlobalOpts, f: F) -> Result<()>
where
    F: FnOnce(&mut Session<'_>) -> Result<()>,
{
    let config = Config::load(global.config.as_deref()).into_diagnostic()?;
    tracing::debug!(?config, "config loaded");

    let client = GithubClient::new(&config.token, &config.api_url).into_diagnostic()?;
    let mut prompter = TerminalPrompter::new(global.yes);

    let mut session = Session::new(&config, &client, &mut prompter, global.format);
    f(&mut session)
}
