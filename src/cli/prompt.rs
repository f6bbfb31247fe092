//! Interactive prompts
//!
//! Commands ask questions through [`Prompter`] so the flows can be driven by
//! a script in tests instead of a terminal.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect};
use miette::{IntoDiagnostic, Result};

pub trait Prompter {
    /// Pick any number of items; returns the chosen items in list order
    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Vec<String>>;

    /// Free-form line of text, may be empty
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no question, defaulting to no
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Terminal prompts rendered with dialoguer
pub struct TerminalPrompter {
    theme: ColorfulTheme,
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            assume_yes,
        }
    }
}

impl Prompter for TerminalPrompter {
    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Vec<String>> {
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .interact()
            .into_diagnostic()?;
        Ok(picked.into_iter().map(|i| items[i].clone()).collect())
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        let text = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        Ok(text.trim().to_string())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.assume_yes {
            tracing::debug!(prompt, "confirmation skipped (--yes)");
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic()
    }
}

/// Prompter that replays canned answers, for tests
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedPrompter {
    pub selections: std::collections::VecDeque<Vec<String>>,
    pub inputs: std::collections::VecDeque<String>,
    pub confirms: std::collections::VecDeque<bool>,
    /// Every prompt shown, in order
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, items: &[&str]) -> Self {
        self.selections
            .push_back(items.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn type_text(mut self, text: &str) -> Self {
        self.inputs.push_back(text.to_string());
        self
    }

    pub fn answer(mut self, yes: bool) -> Self {
        self.confirms.push_back(yes);
        self
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn multi_select(&mut self, prompt: &str, items: &[String]) -> Result<Vec<String>> {
        self.asked.push(prompt.to_string());
        let wanted = self
            .selections
            .pop_front()
            .ok_or_else(|| miette::miette!("unexpected selection prompt: {}", prompt))?;
        Ok(items.iter().filter(|i| wanted.contains(i)).cloned().collect())
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        self.inputs
            .pop_front()
            .ok_or_else(|| miette::miette!("unexpected input prompt: {}", prompt))
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.asked.push(prompt.to_string());
        self.confirms
            .pop_front()
            .ok_or_else(|| miette::miette!("unexpected confirmation: {}", prompt))
    }
}
